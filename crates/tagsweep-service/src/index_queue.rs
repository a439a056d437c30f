//! Bounded background queue for index writes.

use crate::QueryTagIndexer;
use tagsweep_core::{CacheTag, QueryId};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// One pending index write.
#[derive(Debug, Clone)]
pub struct IndexJob {
    pub query_id: QueryId,
    pub tags: Vec<CacheTag>,
}

/// Handle used by the query-execution path to schedule index writes.
///
/// Enqueuing never waits on the store: a query is *eventually* indexed, not
/// indexed by the time `enqueue` returns. When the queue is full the job is
/// dropped and logged, which leaves the query unindexed just like a failed
/// store write.
#[derive(Clone)]
pub struct IndexQueue {
    sender: mpsc::Sender<IndexJob>,
}

/// The task draining an [`IndexQueue`].
pub struct IndexWorker {
    handle: JoinHandle<()>,
}

impl IndexQueue {
    /// Spawn the drain task and return the queue handle plus the worker.
    ///
    /// The worker exits once every `IndexQueue` clone has been dropped and
    /// the remaining jobs are written.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn spawn(indexer: QueryTagIndexer, capacity: usize) -> (Self, IndexWorker) {
        let (sender, mut receiver) = mpsc::channel::<IndexJob>(capacity);

        let handle = tokio::spawn(async move {
            debug!(capacity, "Index worker started");
            while let Some(job) = receiver.recv().await {
                indexer.store(&job.query_id, &job.tags).await;
            }
            info!("Index worker drained and stopped");
        });

        (Self { sender }, IndexWorker { handle })
    }

    /// Schedules `query_id` to be indexed under `tags`.
    ///
    /// Returns `false` when the job could not be queued. An empty `tags`
    /// list is accepted and does nothing.
    pub fn enqueue(&self, query_id: QueryId, tags: Vec<CacheTag>) -> bool {
        if tags.is_empty() {
            return true;
        }

        match self.sender.try_send(IndexJob { query_id, tags }) {
            Ok(()) => true,
            Err(TrySendError::Full(job)) => {
                crate::metrics::record_dropped_job();
                warn!(query_id = %job.query_id, tags = job.tags.len(), "Index queue full; dropping index job");
                false
            }
            Err(TrySendError::Closed(job)) => {
                crate::metrics::record_dropped_job();
                warn!(query_id = %job.query_id, "Index queue closed; dropping index job");
                false
            }
        }
    }

    /// Free slots left in the queue.
    #[must_use]
    pub fn remaining_capacity(&self) -> usize {
        self.sender.capacity()
    }
}

impl IndexWorker {
    /// Waits for the worker to write every queued job and stop.
    pub async fn join(self) {
        if let Err(e) = self.handle.await {
            warn!(error = %e, "Index worker terminated abnormally");
        }
    }
}
