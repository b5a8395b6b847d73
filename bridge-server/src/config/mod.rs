pub(crate) use crate::config::salesforce::SalesforceConfig;
use config::{Config, ConfigError, Environment};
use serde::Deserialize;

pub mod salesforce;

/// Main configuration structure for the bridge server
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// The port the server will listen on (default: 3000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Salesforce connection settings, read from the `SF_` prefix
    #[serde(skip)]
    pub salesforce: SalesforceConfig,
}

fn default_port() -> u16 {
    3000
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: default_port(),
            salesforce: SalesforceConfig::default(),
        }
    }
}

impl Settings {
    /// Creates the settings from `BRIDGE_*` and `SF_*` environment variables
    pub fn new() -> Result<Self, String> {
        let mut settings = Self::from_source(Environment::with_prefix("BRIDGE"))?;
        settings.salesforce = SalesforceConfig::from_env()?;
        Ok(settings)
    }

    fn from_source(source: Environment) -> Result<Self, String> {
        Config::builder()
            .add_source(source.prefix_separator("_").separator("__"))
            .build()
            .map_err(|e: ConfigError| e.to_string())?
            .try_deserialize()
            .map_err(|e| e.to_string())
    }

    /// Fails fast on configuration the service cannot run without
    pub fn validate(&self) -> Result<(), String> {
        self.salesforce.validate()
    }

    #[cfg(test)]
    pub fn for_test_with_mocks(login_mock: &wiremock::MockServer) -> Self {
        Self {
            port: 0, // Let the OS choose a port
            salesforce: SalesforceConfig {
                domain: login_mock.uri(),
                client_id: "test-client-id".to_string(),
                username: "integration@example.com".to_string(),
                private_key_path: crate::test_utils::private_key_path(),
                token_timeout: 2,
                request_timeout: 2,
                connect_timeout: 1,
                ..Default::default()
            },
        }
    }
}
