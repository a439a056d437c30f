//! Application state for Axum.

use axum::http::HeaderName;
use std::sync::Arc;
use tagsweep_core::{TagsweepError, TagsweepResult};
use tagsweep_service::{IndexQueue, InvalidationCoordinator};
use tagsweep_store::AssociationStore;

/// Header carrying comma-separated cache tags on index requests.
pub const DEFAULT_TAGS_HEADER: &str = "x-cache-tags";

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<InvalidationCoordinator>,
    pub index_queue: IndexQueue,
    pub store: Arc<AssociationStore>,
    pub tags_header: HeaderName,
    pub allow_flush: bool,
}

impl AppState {
    /// Creates a new application state with the default tags header and flush disabled.
    pub fn new(
        coordinator: Arc<InvalidationCoordinator>,
        index_queue: IndexQueue,
        store: Arc<AssociationStore>,
    ) -> Self {
        Self {
            coordinator,
            index_queue,
            store,
            tags_header: HeaderName::from_static(DEFAULT_TAGS_HEADER),
            allow_flush: false,
        }
    }

    /// Read index tags from `header` instead of the default.
    #[must_use]
    pub fn with_tags_header(mut self, header: HeaderName) -> Self {
        self.tags_header = header;
        self
    }

    /// Enable or disable the admin flush endpoint.
    #[must_use]
    pub fn with_flush(mut self, allow_flush: bool) -> Self {
        self.allow_flush = allow_flush;
        self
    }
}

/// Parses a configured header name.
pub fn header_name(value: &str) -> TagsweepResult<HeaderName> {
    HeaderName::try_from(value)
        .map_err(|e| TagsweepError::Configuration(format!("invalid header name '{}': {}", value, e)))
}
