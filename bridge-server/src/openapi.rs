use utoipa::OpenApi;

pub(crate) const HEALTH_TAG: &str = "Health API";
pub(crate) const SYNC_TAG: &str = "Sync API";
pub(crate) const WEBHOOK_TAG: &str = "Webhook API";

#[derive(OpenApi)]
#[openapi(
    tags(
        (name = HEALTH_TAG, description = "Health check endpoints"),
        (name = SYNC_TAG, description = "External system to Salesforce synchronization"),
        (name = WEBHOOK_TAG, description = "Salesforce to external system notifications"),
    ),
    info(
        title = "Salesforce Bridge API",
        description = "Bidirectional integration bridge between an external system and Salesforce",
        version = "0.1.0"
    )
)]
pub(crate) struct ApiDoc;
