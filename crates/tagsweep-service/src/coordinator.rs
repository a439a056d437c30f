//! Invalidation coordinator.

use crate::{DownstreamCache, InvalidationOutcome};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tagsweep_core::{NonEmptyTags, QueryId};
use tagsweep_store::{with_timeout, AssociationStore};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Turns an invalidation event into downstream purges and index pruning.
///
/// Handling an event runs three steps:
/// 1. union the member sets of the event's tags;
/// 2. invalidate every resolved query downstream, concurrently;
/// 3. delete the event's tags from the index.
///
/// Step 3 starts only after every step-2 call has finished, successfully or
/// not. If the process dies in between, the tags survive and the next
/// delivery of the same event redoes the work. Duplicate delivery can cause
/// extra purges but never a missed one.
#[derive(Clone)]
pub struct InvalidationCoordinator {
    store: Arc<AssociationStore>,
    downstream: Arc<dyn DownstreamCache>,
    downstream_timeout: Duration,
}

impl InvalidationCoordinator {
    /// Create a coordinator; each downstream call is bounded by `downstream_timeout`.
    pub fn new(
        store: Arc<AssociationStore>,
        downstream: Arc<dyn DownstreamCache>,
        downstream_timeout: Duration,
    ) -> Self {
        Self {
            store,
            downstream,
            downstream_timeout,
        }
    }

    /// Handles one invalidation event. Never retries and never fails.
    pub async fn handle(&self, tags: &NonEmptyTags) -> InvalidationOutcome {
        let query_ids = self.store.union(tags).await;

        let results = join_all(query_ids.iter().map(|id| self.invalidate(id))).await;
        let failed = results.iter().filter(|ok| !**ok).count();

        let deleted_count = self.store.delete(tags).await;

        crate::metrics::record_invalidation(query_ids.len() - failed, failed, deleted_count);
        info!(
            tags = ?tags.as_slice(),
            queries = query_ids.len(),
            failed,
            deleted = deleted_count,
            "Invalidation event handled"
        );

        InvalidationOutcome {
            query_ids,
            deleted_count,
        }
    }

    /// Handles one event on its own task.
    ///
    /// The event runs to completion even if the returned handle is dropped,
    /// for example when the request that carried it is abandoned.
    #[must_use = "dropping the handle detaches the task; await it for the outcome"]
    pub fn spawn_handle(&self, tags: NonEmptyTags) -> JoinHandle<InvalidationOutcome> {
        let coordinator = self.clone();
        tokio::spawn(async move { coordinator.handle(&tags).await })
    }

    async fn invalidate(&self, query_id: &QueryId) -> bool {
        match with_timeout(self.downstream_timeout, || self.downstream.invalidate(query_id)).await {
            Ok(()) => true,
            Err(e) => {
                warn!(query_id = %query_id, error = %e, "Downstream invalidation failed");
                false
            }
        }
    }
}
