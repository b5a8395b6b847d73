use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Successful response of the OAuth 2.0 token endpoint
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AccessCredential {
    /// Bearer token for REST API calls
    pub access_token: String,
    /// Base URL of the org the token is valid for
    pub instance_url: String,
    /// Token type, normally "Bearer"
    #[serde(default)]
    pub token_type: Option<String>,
    /// Issue time in milliseconds since the Unix epoch, as sent by Salesforce
    #[serde(default)]
    pub issued_at: Option<String>,
    /// Identity URL of the integration user
    #[serde(default)]
    pub id: Option<String>,
}

/// Field values written to an Account by an upsert.
/// Absent fields (`None`) are omitted from the request and stay untouched in Salesforce;
/// an explicit `null` is sent as-is and clears the field.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct AccountFields {
    #[serde(
        rename = "Name",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<Value>,
    #[serde(
        rename = "Phone",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub phone: Option<Value>,
    #[serde(
        rename = "Industry",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub industry: Option<Value>,
}

/// Deserialize a field that is present in the input, keeping `null` as `Some(Value::Null)`.
/// Combined with `#[serde(default)]` only a missing key yields `None`.
pub fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// An Account addressed by its external identifier
#[derive(Debug, Clone, PartialEq)]
pub struct AccountRecord {
    pub external_id: String,
    pub fields: AccountFields,
}
