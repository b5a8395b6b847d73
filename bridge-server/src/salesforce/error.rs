use log::debug;
use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while talking to Salesforce
#[derive(Debug, Error)]
pub enum SalesforceError {
    #[error("Failed to read private key {}: {source}", .path.display())]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid private key: {0}")]
    InvalidKey(#[source] jsonwebtoken::errors::Error),
    #[error("Failed to sign assertion: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
    #[error("Token exchange rejected with HTTP {status}")]
    Exchange { status: StatusCode, body: String },
    #[error("Salesforce API returned HTTP {status}")]
    Upstream { status: StatusCode, body: String },
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl SalesforceError {
    /// Status code and body returned by the remote side, if it answered at all
    pub fn upstream_response(&self) -> Option<(StatusCode, &str)> {
        match self {
            SalesforceError::Exchange { status, body }
            | SalesforceError::Upstream { status, body } => Some((*status, body.as_str())),
            _ => None,
        }
    }
}

/// Body of an error response. A body that cannot be read is logged and reported as empty.
pub(crate) fn error_body(body: Result<String, reqwest::Error>) -> String {
    body.unwrap_or_else(|e| {
        debug!("Failed to read error response body: {}", e);
        String::new()
    })
}
