use crate::config::Settings;
use crate::salesforce::{SalesforceClient, SalesforceError};
use crate::webhook::{LogSink, WebhookSink};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub salesforce: Arc<SalesforceClient>,
    pub webhook_sink: Arc<dyn WebhookSink>,
}

impl AppState {
    /// Build the state once at startup. Loading the private key happens here,
    /// so a missing or unreadable key fails before the server binds.
    pub fn new(settings: Settings) -> Result<Self, SalesforceError> {
        let salesforce = SalesforceClient::new(settings.salesforce.clone())?;
        Ok(Self {
            settings: Arc::new(settings),
            salesforce: Arc::new(salesforce),
            webhook_sink: Arc::new(LogSink),
        })
    }

    /// Replace the sink that receives webhook notifications
    pub fn with_webhook_sink(mut self, sink: Arc<dyn WebhookSink>) -> Self {
        self.webhook_sink = sink;
        self
    }
}
