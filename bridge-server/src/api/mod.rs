pub(crate) mod health;
pub(crate) mod sync;
pub(crate) mod webhook;

use crate::state::AppState;
use utoipa_axum::router::OpenApiRouter;

/// Combines all API routes into a single router
pub(super) fn router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .merge(health::router())
        .merge(sync::router())
        .merge(webhook::router())
}
