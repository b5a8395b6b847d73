use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Connection settings for the Salesforce org, read from `SF_*` variables
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SalesforceConfig {
    /// Authorization domain, also used as the assertion audience
    /// (default: https://login.salesforce.com, use https://test.salesforce.com for sandboxes)
    #[serde(default = "default_domain")]
    pub domain: String,

    /// Connected App consumer key, the assertion issuer
    #[serde(default)]
    pub client_id: String,

    /// Login name of the integration user, the assertion subject
    #[serde(default)]
    pub username: String,

    /// Path to the PEM encoded RSA private key registered with the Connected App
    #[serde(default = "default_private_key_path")]
    pub private_key_path: PathBuf,

    /// REST API version used for sobject calls
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Timeout for the token exchange in seconds
    #[serde(default = "default_token_timeout")]
    pub token_timeout: u64,

    /// Timeout for REST API calls in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Timeout for establishing connections in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

fn default_domain() -> String {
    "https://login.salesforce.com".to_string()
}

fn default_private_key_path() -> PathBuf {
    PathBuf::from("./private.key")
}

fn default_api_version() -> String {
    "v61.0".to_string()
}

fn default_token_timeout() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    5
}

impl Default for SalesforceConfig {
    fn default() -> Self {
        Self {
            domain: default_domain(),
            client_id: String::new(),
            username: String::new(),
            private_key_path: default_private_key_path(),
            api_version: default_api_version(),
            token_timeout: default_token_timeout(),
            request_timeout: default_request_timeout(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

impl SalesforceConfig {
    /// Reads the configuration from the process environment
    pub fn from_env() -> Result<Self, String> {
        Self::from_source(Environment::with_prefix("SF"))
    }

    pub(crate) fn from_source(source: Environment) -> Result<Self, String> {
        Config::builder()
            .add_source(source.prefix_separator("_").separator("__"))
            .build()
            .map_err(|e: ConfigError| e.to_string())?
            .try_deserialize()
            .map_err(|e| e.to_string())
    }

    /// Checks the values the token exchange cannot work without
    pub fn validate(&self) -> Result<(), String> {
        if self.client_id.trim().is_empty() {
            return Err("SF_CLIENT_ID is required".to_string());
        }
        if self.username.trim().is_empty() {
            return Err("SF_USERNAME is required".to_string());
        }

        let domain = Url::parse(&self.domain)
            .map_err(|e| format!("SF_DOMAIN is not a valid URL ({}): {e}", self.domain))?;
        if !matches!(domain.scheme(), "http" | "https") {
            return Err(format!("SF_DOMAIN must be an http(s) URL: {}", self.domain));
        }

        if self.api_version.trim().is_empty() {
            return Err("SF_API_VERSION must not be empty".to_string());
        }
        if self.token_timeout == 0 || self.request_timeout == 0 || self.connect_timeout == 0 {
            return Err("Salesforce timeouts must be greater than zero".to_string());
        }
        Ok(())
    }

    /// Token endpoint of the authorization domain
    pub fn token_url(&self) -> String {
        format!("{}/services/oauth2/token", self.domain.trim_end_matches('/'))
    }

    pub fn token_timeout(&self) -> Duration {
        Duration::from_secs(self.token_timeout)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }
}
