use crate::salesforce::SalesforceError;
use axum::response::IntoResponse;
use axum::Json;
use http::StatusCode;
use serde_json::{json, Value};

/// Error message returned when the account sync fails past validation
pub const UPSERT_FAILED: &str = "Salesforce upsert failed";

#[derive(Debug, Clone)]
pub struct ApiError {
    pub error: String,
    pub detail: Option<Value>,
    pub status_code: StatusCode,
}

impl ApiError {
    /// Create a new ApiError with a message and status code
    pub fn new<S: ToString>(error: S, status_code: StatusCode) -> Self {
        Self {
            error: error.to_string(),
            detail: None,
            status_code,
        }
    }

    /// Attach diagnostic detail to the error body
    pub fn with_detail(mut self, detail: Value) -> Self {
        self.detail = Some(detail);
        self
    }

    /// Create new Bad Request Error (400) with a message
    pub fn bad_request<S: ToString>(error: S) -> Self {
        Self::new(error, StatusCode::BAD_REQUEST)
    }
}

impl From<SalesforceError> for ApiError {
    /// Upstream answers keep their status and body; everything else becomes a 500
    fn from(err: SalesforceError) -> Self {
        match err.upstream_response() {
            Some((status, body)) => {
                // Parse body as JSON when possible so it is passed on unmodified
                let detail = serde_json::from_str::<Value>(body)
                    .unwrap_or_else(|_| Value::String(body.to_string()));
                ApiError::new(UPSERT_FAILED, status).with_detail(detail)
            }
            None => ApiError::new(UPSERT_FAILED, StatusCode::INTERNAL_SERVER_ERROR)
                .with_detail(json!({ "message": err.to_string() })),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status_code = self.status_code;
        let body = match self.detail {
            Some(detail) => json!({ "error": self.error, "detail": detail }),
            None => json!({ "error": self.error }),
        };
        (status_code, Json(body)).into_response()
    }
}
