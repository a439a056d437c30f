//! Index ingress controller.
//!
//! The query-execution path reports each executed query here. The tags come
//! from the JSON body, the tags header, or both; the write itself happens in
//! the background so the caller never waits on the store.

use crate::{extractors::ValidatedJson, responses::accepted, state::AppState};
use axum::{
    extract::State,
    http::HeaderMap,
    response::IntoResponse,
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use tagsweep_core::{parse_tag_header, rules, CacheTag, QueryId};
use tracing::debug;
use utoipa::ToSchema;
use validator::Validate;

/// An executed query and the tags its result depends on.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IndexRequest {
    /// Identifier of the executed query.
    #[validate(length(min = 1, message = "queryId is required"))]
    pub query_id: String,
    /// Tags the query depends on, in addition to any in the tags header.
    #[serde(default)]
    #[validate(custom(function = "rules::no_blank_tags"))]
    pub tags: Vec<String>,
}

/// Index ingress acknowledgement.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IndexResponse {
    /// Whether an index job was scheduled.
    pub queued: bool,
    /// Number of tags in the job.
    pub tag_count: usize,
}

/// Creates the index router.
pub fn router() -> Router<AppState> {
    Router::new().route("/index", post(index_query))
}

/// Schedule an executed query to be indexed under its tags.
#[utoipa::path(
    post,
    path = "/index",
    tag = "index",
    request_body = IndexRequest,
    params(
        ("x-cache-tags" = Option<String>, Header, description = "Comma-separated cache tags; the header name follows `indexer.tags_header`")
    ),
    responses(
        (status = 202, description = "Accepted for indexing", body = IndexResponse),
        (status = 400, description = "Malformed body", body = tagsweep_core::ErrorResponse),
        (status = 401, description = "Missing or wrong secret", body = tagsweep_core::ErrorResponse),
        (status = 422, description = "Validation error", body = tagsweep_core::ErrorResponse)
    ),
    security(("webhook_secret" = []))
)]
pub async fn index_query(
    State(state): State<AppState>,
    headers: HeaderMap,
    ValidatedJson(request): ValidatedJson<IndexRequest>,
) -> impl IntoResponse {
    let mut tags: Vec<CacheTag> = request.tags.into_iter().map(CacheTag::new).collect();
    for value in headers.get_all(&state.tags_header) {
        if let Ok(value) = value.to_str() {
            tags.extend(parse_tag_header(value));
        }
    }

    let tag_count = tags.len();
    let queued = tag_count > 0 && state.index_queue.enqueue(QueryId::new(request.query_id), tags);
    debug!(tag_count, queued, "Index request handled");

    accepted(IndexResponse { queued, tag_count })
}
