//! Exchange of a signed assertion for an access token

use crate::salesforce::error::{error_body, SalesforceError};
use crate::salesforce::models::AccessCredential;
use log::{debug, error};
use reqwest::Client;
use std::time::Duration;

/// Grant type of the OAuth 2.0 JWT bearer flow (RFC 7523)
pub const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// POST the assertion to the token endpoint and return the issued credential.
/// Failures are returned to the caller as-is, nothing is retried.
pub async fn exchange_assertion(
    client: &Client,
    token_url: &str,
    assertion: &str,
    timeout: Duration,
) -> Result<AccessCredential, SalesforceError> {
    debug!("Requesting access token from {}", token_url);

    let response = client
        .post(token_url)
        .timeout(timeout)
        .form(&[("grant_type", JWT_BEARER_GRANT_TYPE), ("assertion", assertion)])
        .send()
        .await
        .map_err(SalesforceError::Http)?;

    let status = response.status();
    if !status.is_success() {
        let body = error_body(response.text().await);
        error!("Token exchange error {}: {}", status, body);
        return Err(SalesforceError::Exchange { status, body });
    }

    let credential: AccessCredential = response
        .json()
        .await
        .map_err(|e| SalesforceError::InvalidResponse(format!("token response: {e}")))?;

    debug!(
        "Obtained {} token for {} (user {}, issued at {})",
        credential.token_type.as_deref().unwrap_or("access"),
        credential.instance_url,
        credential.id.as_deref().unwrap_or("unknown"),
        credential.issued_at.as_deref().unwrap_or("unknown")
    );
    Ok(credential)
}
