//! Salesforce integration: JWT bearer token exchange and Account upserts
//!
//! ## Flow
//! 1. [`assertion::AssertionSigner`] signs a short-lived RS256 claim set
//!    (issuer = consumer key, subject = integration user, audience = login domain)
//! 2. [`token::exchange_assertion`] trades it for an access token and instance URL
//! 3. [`client::SalesforceClient::upsert_account`] PATCHes the Account addressed by
//!    its external ID, letting Salesforce decide between create and update

pub mod assertion;
pub mod client;
pub mod error;
pub mod models;
pub mod token;

pub use client::SalesforceClient;
pub use error::SalesforceError;
pub use models::{AccountFields, AccountRecord};
