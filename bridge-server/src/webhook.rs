//! Delivery of inbound Salesforce notifications to downstream systems

use async_trait::async_trait;
use log::info;
use serde_json::Value;
use thiserror::Error;

/// Errors a sink may report; they never change the acknowledgement sent to Salesforce
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// A notification exactly as Salesforce sent it
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookNotification {
    pub payload: Value,
}

/// Destination for received notifications (storage, queues, other systems)
#[async_trait]
pub trait WebhookSink: Send + Sync {
    async fn deliver(&self, notification: &WebhookNotification) -> Result<(), WebhookError>;
}

/// Default sink, writes every notification to the log
#[derive(Debug, Clone, Default)]
pub struct LogSink;

#[async_trait]
impl WebhookSink for LogSink {
    async fn deliver(&self, notification: &WebhookNotification) -> Result<(), WebhookError> {
        info!("Received from Salesforce: {}", notification.payload);
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;
    use tokio::sync::Mutex;

    /// Sink that keeps every notification in memory
    #[derive(Default)]
    pub(crate) struct RecordingSink {
        pub(crate) received: Mutex<Vec<Value>>,
    }

    #[async_trait]
    impl WebhookSink for RecordingSink {
        async fn deliver(&self, notification: &WebhookNotification) -> Result<(), WebhookError> {
            self.received.lock().await.push(notification.payload.clone());
            Ok(())
        }
    }

    /// Sink whose downstream is always unavailable
    pub(crate) struct FailingSink;

    #[async_trait]
    impl WebhookSink for FailingSink {
        async fn deliver(&self, _notification: &WebhookNotification) -> Result<(), WebhookError> {
            Err(WebhookError::Delivery("downstream unavailable".to_string()))
        }
    }

    #[tokio::test]
    async fn test_log_sink_accepts_any_payload() {
        let sink = LogSink;
        for payload in [json!({"Id": "001xx"}), json!([1, 2, 3]), json!("text"), json!(null)] {
            assert!(sink.deliver(&WebhookNotification { payload }).await.is_ok());
        }
    }

    #[tokio::test]
    async fn test_recording_sink_keeps_order() {
        let sink = RecordingSink::default();
        sink.deliver(&WebhookNotification { payload: json!(1) })
            .await
            .unwrap();
        sink.deliver(&WebhookNotification { payload: json!(2) })
            .await
            .unwrap();
        assert_eq!(*sink.received.lock().await, vec![json!(1), json!(2)]);
    }
}
