//! Fault-isolating association store.

use crate::{metrics, with_timeout, AssociationBackend};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tagsweep_core::{CacheTag, NonEmptyTags, QueryId};
use tracing::{debug, error, info, warn};

/// Shared handle to the tag association index.
///
/// Constructed once at startup and passed to the indexer and the coordinator.
/// Every call is bounded by `operation_timeout`; a failed or timed-out call
/// is logged and turned into a neutral value (`false`, empty set, `0`).
///
/// `union` returning an empty set is therefore ambiguous: either no query
/// depends on the tags, or the backend could not be read. The caller cannot
/// tell the two apart.
#[derive(Clone)]
pub struct AssociationStore {
    backend: Arc<dyn AssociationBackend>,
    operation_timeout: Duration,
}

impl AssociationStore {
    /// Create a store over `backend`, bounding each call by `operation_timeout`.
    pub fn new(backend: Arc<dyn AssociationBackend>, operation_timeout: Duration) -> Self {
        Self {
            backend,
            operation_timeout,
        }
    }

    /// Name of the underlying backend.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Adds `query_id` to the set of `tag`.
    ///
    /// Returns whether the backend acknowledged the write.
    pub async fn add(&self, tag: &CacheTag, query_id: &QueryId) -> bool {
        match with_timeout(self.operation_timeout, || self.backend.add(tag, query_id)).await {
            Ok(()) => true,
            Err(e) => {
                metrics::record_failure("add");
                warn!(tag = %tag, query_id = %query_id, error = %e, "Failed to index query under tag");
                false
            }
        }
    }

    /// Returns every query that depends on any of `tags`.
    pub async fn union(&self, tags: &NonEmptyTags) -> BTreeSet<QueryId> {
        match with_timeout(self.operation_timeout, || self.backend.union(tags)).await {
            Ok(ids) => {
                debug!(tags = tags.len(), queries = ids.len(), "Resolved tags to queries");
                ids
            }
            Err(e) => {
                metrics::record_failure("union");
                error!(tags = ?tags.as_slice(), error = %e, "Failed to resolve tags; treating as no dependents");
                BTreeSet::new()
            }
        }
    }

    /// Removes the association of each tag; returns how many tags existed.
    pub async fn delete(&self, tags: &NonEmptyTags) -> u64 {
        match with_timeout(self.operation_timeout, || self.backend.delete(tags)).await {
            Ok(deleted) => deleted,
            Err(e) => {
                metrics::record_failure("delete");
                error!(tags = ?tags.as_slice(), error = %e, "Failed to delete tag associations");
                0
            }
        }
    }

    /// Flushes every association. Irreversible; meant for tests and resets.
    pub async fn clear(&self) -> bool {
        match with_timeout(self.operation_timeout, || self.backend.clear()).await {
            Ok(()) => {
                info!(backend = self.backend.name(), "Association store cleared");
                true
            }
            Err(e) => {
                metrics::record_failure("clear");
                error!(error = %e, "Failed to clear association store");
                false
            }
        }
    }

    /// Checks that the backend answers within the operation timeout.
    pub async fn ping(&self) -> bool {
        match with_timeout(self.operation_timeout, || self.backend.ping()).await {
            Ok(()) => true,
            Err(e) => {
                metrics::record_failure("ping");
                warn!(backend = self.backend.name(), error = %e, "Association store ping failed");
                false
            }
        }
    }
}
