use crate::openapi::WEBHOOK_TAG;
use crate::state::AppState;
use crate::webhook::WebhookNotification;
use axum::{
    body::Bytes,
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use log::{error, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Receive a notification from Salesforce.
///
/// The payload is handed to the configured sink and always acknowledged with 200,
/// so Salesforce does not redeliver. The body is accepted whatever its content type;
/// sink failures are only logged.
/// Authentication of the sender (signatures, auth headers, IP allowlists)
/// is left to the deployment in front of this service.
#[utoipa::path(
    post,
    path = "/webhook/salesforce",
    tag = WEBHOOK_TAG,
    request_body = Value,
    responses(
        (status = 200, description = "Notification received", body = WebhookAck)
    )
)]
pub(super) async fn receive_salesforce(
    State(state): State<AppState>,
    body: Bytes,
) -> impl IntoResponse {
    let notification = WebhookNotification {
        payload: parse_payload(&body),
    };
    if let Err(e) = state.webhook_sink.deliver(&notification).await {
        error!("Failed to deliver Salesforce notification: {}", e);
    }

    (StatusCode::OK, Json(WebhookAck { ok: true }))
}

/// JSON bodies are kept as parsed; an empty body becomes `null`
/// and anything else is kept as text.
fn parse_payload(body: &[u8]) -> Value {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(body).unwrap_or_else(|e| {
        warn!("Salesforce notification is not JSON ({}), keeping it as text", e);
        Value::String(String::from_utf8_lossy(body).into_owned())
    })
}

/// Acknowledgement returned to Salesforce
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub(crate) struct WebhookAck {
    ok: bool,
}

pub(super) fn router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(receive_salesforce))
}
