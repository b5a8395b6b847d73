//! Signed JWT bearer assertions for the OAuth 2.0 JWT bearer flow

use crate::config::SalesforceConfig;
use crate::salesforce::error::SalesforceError;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use log::debug;
use serde::{Deserialize, Serialize};

/// Lifetime of an assertion, counted from the moment it is signed
pub const ASSERTION_TTL_SECS: i64 = 180;

/// Claim set presented to the authorization server
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AssertionClaims {
    /// Connected App consumer key
    pub iss: String,
    /// Login name of the integration user
    pub sub: String,
    /// Authorization domain
    pub aud: String,
    /// Expiry as seconds since the Unix epoch
    pub exp: i64,
}

/// Signs assertions with a private key parsed once at startup
pub struct AssertionSigner {
    key: EncodingKey,
    issuer: String,
    subject: String,
    audience: String,
}

impl std::fmt::Debug for AssertionSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssertionSigner")
            .field("issuer", &self.issuer)
            .field("subject", &self.subject)
            .field("audience", &self.audience)
            .finish_non_exhaustive()
    }
}

impl AssertionSigner {
    /// Create a signer from PEM encoded RSA key material
    pub fn new(
        private_key_pem: &[u8],
        issuer: impl Into<String>,
        subject: impl Into<String>,
        audience: impl Into<String>,
    ) -> Result<Self, SalesforceError> {
        let key = EncodingKey::from_rsa_pem(private_key_pem).map_err(SalesforceError::InvalidKey)?;
        Ok(Self {
            key,
            issuer: issuer.into(),
            subject: subject.into(),
            audience: audience.into(),
        })
    }

    /// Load the key file named in the configuration.
    /// The audience is the authorization domain itself.
    pub fn from_config(config: &SalesforceConfig) -> Result<Self, SalesforceError> {
        let pem = std::fs::read(&config.private_key_path).map_err(|source| {
            SalesforceError::KeyRead {
                path: config.private_key_path.clone(),
                source,
            }
        })?;
        debug!(
            "Loaded private key from {}",
            config.private_key_path.display()
        );
        Self::new(
            &pem,
            config.client_id.as_str(),
            config.username.as_str(),
            config.domain.as_str(),
        )
    }

    /// Sign a fresh assertion valid for [`ASSERTION_TTL_SECS`]
    pub fn sign(&self) -> Result<String, SalesforceError> {
        self.sign_at(Utc::now().timestamp())
    }

    /// Sign an assertion as if the current time were `now` (Unix seconds)
    pub fn sign_at(&self, now: i64) -> Result<String, SalesforceError> {
        let claims = self.claims_at(now);
        encode(&Header::new(Algorithm::RS256), &claims, &self.key).map_err(SalesforceError::Signing)
    }

    /// Claim set an assertion signed at `now` carries
    pub fn claims_at(&self, now: i64) -> AssertionClaims {
        AssertionClaims {
            iss: self.issuer.clone(),
            sub: self.subject.clone(),
            aud: self.audience.clone(),
            exp: now + ASSERTION_TTL_SECS,
        }
    }
}
