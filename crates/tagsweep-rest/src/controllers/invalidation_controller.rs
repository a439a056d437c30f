//! Invalidation webhook controller.

use crate::{
    extractors::ValidatedJson,
    responses::{ok, ApiResult},
    state::AppState,
};
use axum::{extract::State, routing::post, Router};
use serde::Deserialize;
use tagsweep_core::{rules, CacheTag, NonEmptyTags, TagsweepError, TagsweepResult};
use tagsweep_service::InvalidationOutcome;
use utoipa::ToSchema;
use validator::Validate;

/// Change event posted by the source of truth.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct InvalidationRequest {
    /// Tags whose data changed.
    #[validate(
        length(min = 1, message = "At least one tag is required"),
        custom(function = "rules::no_blank_tags")
    )]
    pub tags: Vec<String>,
}

impl InvalidationRequest {
    fn into_tags(self) -> TagsweepResult<NonEmptyTags> {
        NonEmptyTags::try_from(self.tags.into_iter().map(CacheTag::new).collect::<Vec<_>>())
    }
}

/// Creates the invalidation router.
pub fn router() -> Router<AppState> {
    Router::new().route("/invalidations", post(invalidate))
}

/// Handle a change event: purge every query tagged with any of its tags.
///
/// The event is handled on its own task, so a client disconnect or request
/// timeout does not cut the purge short.
#[utoipa::path(
    post,
    path = "/invalidations",
    tag = "invalidation",
    request_body = InvalidationRequest,
    responses(
        (status = 200, description = "Event handled", body = InvalidationOutcome),
        (status = 400, description = "Malformed body", body = tagsweep_core::ErrorResponse),
        (status = 401, description = "Missing or wrong secret", body = tagsweep_core::ErrorResponse),
        (status = 422, description = "Validation error", body = tagsweep_core::ErrorResponse)
    ),
    security(("webhook_secret" = []))
)]
pub async fn invalidate(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<InvalidationRequest>,
) -> ApiResult<InvalidationOutcome> {
    let tags = request.into_tags()?;
    let outcome = state
        .coordinator
        .spawn_handle(tags)
        .await
        .map_err(|e| TagsweepError::internal(format!("Invalidation task failed: {}", e)))?;
    ok(outcome)
}
