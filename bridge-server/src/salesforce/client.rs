use crate::config::SalesforceConfig;
use crate::salesforce::assertion::AssertionSigner;
use crate::salesforce::error::{error_body, SalesforceError};
use crate::salesforce::models::{AccessCredential, AccountRecord};
use crate::salesforce::token::exchange_assertion;
use log::{debug, error, info};
use reqwest::{Client, StatusCode};
use url::Url;

/// sObject type written by the account sync
pub const ACCOUNT_SOBJECT: &str = "Account";
/// External ID field used to address accounts
pub const EXTERNAL_ID_FIELD: &str = "External_Id__c";

/// Salesforce REST client for the integration user
#[derive(Debug)]
pub struct SalesforceClient {
    http: Client,
    signer: AssertionSigner,
    config: SalesforceConfig,
}

impl SalesforceClient {
    /// Create a client, loading the private key from `config.private_key_path`
    pub fn new(config: SalesforceConfig) -> Result<Self, SalesforceError> {
        let signer = AssertionSigner::from_config(&config)?;
        Self::with_signer(config, signer)
    }

    pub fn with_signer(
        config: SalesforceConfig,
        signer: AssertionSigner,
    ) -> Result<Self, SalesforceError> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .pool_max_idle_per_host(10)
            .build()?;
        Ok(Self {
            http,
            signer,
            config,
        })
    }

    /// Sign a new assertion and exchange it for an access token.
    /// Every call performs a fresh exchange.
    pub async fn access_credential(&self) -> Result<AccessCredential, SalesforceError> {
        let assertion = self.signer.sign()?;
        exchange_assertion(
            &self.http,
            &self.config.token_url(),
            &assertion,
            self.config.token_timeout(),
        )
        .await
    }

    /// Create or update the account with the record's external ID.
    /// Returns the status Salesforce answered with (201 created, 204 updated).
    pub async fn upsert_account(&self, record: &AccountRecord) -> Result<StatusCode, SalesforceError> {
        let credential = self.access_credential().await?;
        let url = self.upsert_url(&credential.instance_url, &record.external_id)?;

        debug!("Upserting {} {}", ACCOUNT_SOBJECT, record.external_id);

        let response = self
            .http
            .patch(url)
            .bearer_auth(&credential.access_token)
            .json(&record.fields)
            .send()
            .await
            .map_err(SalesforceError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(response.text().await);
            error!("Salesforce upsert error {}: {}", status, body);
            return Err(SalesforceError::Upstream { status, body });
        }

        info!(
            "Upserted {} {} with HTTP {}",
            ACCOUNT_SOBJECT, record.external_id, status
        );
        Ok(status)
    }

    /// `{instance_url}/services/data/{version}/sobjects/Account/External_Id__c/{id}`,
    /// with the external ID encoded as a single path segment
    fn upsert_url(&self, instance_url: &str, external_id: &str) -> Result<Url, SalesforceError> {
        let mut url = Url::parse(instance_url).map_err(|e| {
            SalesforceError::InvalidResponse(format!("invalid instance_url {instance_url}: {e}"))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                SalesforceError::InvalidResponse(format!(
                    "instance_url cannot be a base: {instance_url}"
                ))
            })?
            .pop_if_empty()
            .extend([
                "services",
                "data",
                self.config.api_version.as_str(),
                "sobjects",
                ACCOUNT_SOBJECT,
                EXTERNAL_ID_FIELD,
                external_id,
            ]);
        Ok(url)
    }
}
