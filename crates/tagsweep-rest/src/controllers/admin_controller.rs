//! Administrative controller.

use crate::{
    responses::{ok, ApiResult},
    state::AppState,
};
use axum::{extract::State, routing::post, Router};
use serde::{Deserialize, Serialize};
use tagsweep_core::TagsweepError;
use tracing::warn;
use utoipa::ToSchema;

/// Flush result.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FlushResponse {
    /// Whether the store acknowledged the flush.
    pub flushed: bool,
}

/// Creates the admin router.
pub fn router() -> Router<AppState> {
    Router::new().route("/admin/flush", post(flush))
}

/// Remove every association in the store.
#[utoipa::path(
    post,
    path = "/admin/flush",
    tag = "admin",
    responses(
        (status = 200, description = "Flush attempted", body = FlushResponse),
        (status = 401, description = "Missing or wrong secret", body = tagsweep_core::ErrorResponse),
        (status = 403, description = "Flush disabled", body = tagsweep_core::ErrorResponse)
    ),
    security(("webhook_secret" = []))
)]
pub async fn flush(State(state): State<AppState>) -> ApiResult<FlushResponse> {
    if !state.allow_flush {
        return Err(TagsweepError::Forbidden("Flush is disabled".to_string()).into());
    }

    warn!(backend = state.store.backend_name(), "Flushing association store");
    let flushed = state.store.clear().await;
    ok(FlushResponse { flushed })
}
