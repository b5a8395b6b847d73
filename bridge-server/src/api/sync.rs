use crate::errors::ApiError;
use crate::openapi::SYNC_TAG;
use crate::salesforce::models::present;
use crate::salesforce::{AccountFields, AccountRecord};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Json, State},
    response::{IntoResponse, Response},
};
use log::{error, warn};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Upsert an Account in Salesforce, addressed by its external ID.
///
/// Salesforce creates the account when no record carries the external ID
/// and updates it otherwise. Exactly one attempt is made per request.
#[utoipa::path(
    post,
    path = "/sync/account",
    tag = SYNC_TAG,
    request_body = AccountSyncRequest,
    responses(
        (status = 201, description = "Account created", body = AccountSyncResult),
        (status = 204, description = "Account updated", body = AccountSyncResult),
        (status = 400, description = "Missing External_Id__c or invalid payload"),
        (status = 500, description = "Token exchange or Salesforce call failed without a response")
    )
)]
pub(super) async fn sync_account(
    State(state): State<AppState>,
    payload: Result<Json<AccountSyncRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!("Rejected account sync payload: {}", rejection.body_text());
            return ApiError::bad_request("Invalid request body")
                .with_detail(json!(rejection.body_text()))
                .into_response();
        }
    };

    let record = match AccountRecord::try_from(request) {
        Ok(record) => record,
        Err(err) => return err.into_response(),
    };

    match state.salesforce.upsert_account(&record).await {
        Ok(status) => (
            status,
            Json(AccountSyncResult {
                upserted: true,
                sf_status: status.as_u16(),
            }),
        )
            .into_response(),
        Err(err) => {
            error!("Failed to upsert account {}: {}", record.external_id, err);
            ApiError::from(err).into_response()
        }
    }
}

/// Account fields sent by the external system.
/// Values are forwarded to Salesforce unchanged, `null` included.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default, PartialEq)]
pub(crate) struct AccountSyncRequest {
    /// External ID used as the upsert key (required, string or number)
    #[serde(rename = "External_Id__c", default)]
    external_id: Option<Value>,
    #[serde(rename = "Name", default, deserialize_with = "present")]
    name: Option<Value>,
    #[serde(rename = "Phone", default, deserialize_with = "present")]
    phone: Option<Value>,
    #[serde(rename = "Industry", default, deserialize_with = "present")]
    industry: Option<Value>,
}

/// Path value for the external ID. Numbers are written in their JSON form.
fn external_id_of(value: Option<Value>) -> Result<String, ApiError> {
    match value {
        Some(Value::String(id)) if !id.is_empty() => Ok(id),
        Some(Value::Number(number)) => Ok(number.to_string()),
        None | Some(Value::Null) | Some(Value::String(_)) => {
            Err(ApiError::bad_request("External_Id__c is required"))
        }
        Some(_) => Err(ApiError::bad_request(
            "External_Id__c must be a string or a number",
        )),
    }
}

impl TryFrom<AccountSyncRequest> for AccountRecord {
    type Error = ApiError;

    fn try_from(request: AccountSyncRequest) -> Result<Self, Self::Error> {
        Ok(AccountRecord {
            external_id: external_id_of(request.external_id)?,
            fields: AccountFields {
                name: request.name,
                phone: request.phone,
                industry: request.industry,
            },
        })
    }
}

/// Response of a successful upsert
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub(crate) struct AccountSyncResult {
    upserted: bool,
    /// Status code Salesforce answered with
    #[serde(rename = "sfStatus")]
    sf_status: u16,
}

pub(super) fn router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(sync_account))
}
