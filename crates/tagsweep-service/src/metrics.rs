//! Metrics for indexing and invalidation.

use metrics::{counter, describe_counter};

/// Metric names for the service layer.
pub mod names {
    /// Tag associations written successfully.
    pub const INDEX_WRITES_TOTAL: &str = "tagsweep_index_writes_total";
    /// Tag associations that could not be written.
    pub const INDEX_FAILURES_TOTAL: &str = "tagsweep_index_failures_total";
    /// Index jobs rejected because the queue was full or closed.
    pub const INDEX_JOBS_DROPPED_TOTAL: &str = "tagsweep_index_jobs_dropped_total";
    /// Invalidation events handled.
    pub const INVALIDATION_EVENTS_TOTAL: &str = "tagsweep_invalidation_events_total";
    /// Queries invalidated downstream.
    pub const INVALIDATIONS_TOTAL: &str = "tagsweep_invalidations_total";
    /// Downstream invalidations that failed or timed out.
    pub const INVALIDATION_FAILURES_TOTAL: &str = "tagsweep_invalidation_failures_total";
    /// Tag associations deleted after invalidation.
    pub const TAGS_DELETED_TOTAL: &str = "tagsweep_tags_deleted_total";
}

/// Register all metric descriptions, including the store's.
pub fn register_metrics() {
    describe_counter!(names::INDEX_WRITES_TOTAL, "Tag associations written");
    describe_counter!(names::INDEX_FAILURES_TOTAL, "Tag associations that failed to write");
    describe_counter!(
        names::INDEX_JOBS_DROPPED_TOTAL,
        "Index jobs rejected by a full or closed queue"
    );
    describe_counter!(names::INVALIDATION_EVENTS_TOTAL, "Invalidation events handled");
    describe_counter!(names::INVALIDATIONS_TOTAL, "Queries invalidated downstream");
    describe_counter!(
        names::INVALIDATION_FAILURES_TOTAL,
        "Downstream invalidations that failed"
    );
    describe_counter!(names::TAGS_DELETED_TOTAL, "Tag associations deleted");
    tagsweep_store::metrics::register_metrics();
}

/// Record the outcome of indexing one query.
pub fn record_index(written: usize, failed: usize) {
    counter!(names::INDEX_WRITES_TOTAL).increment(written as u64);
    if failed > 0 {
        counter!(names::INDEX_FAILURES_TOTAL).increment(failed as u64);
    }
}

/// Record an index job the queue could not accept.
pub fn record_dropped_job() {
    counter!(names::INDEX_JOBS_DROPPED_TOTAL).increment(1);
}

/// Record the outcome of one invalidation event.
pub fn record_invalidation(invalidated: usize, failed: usize, deleted: u64) {
    counter!(names::INVALIDATION_EVENTS_TOTAL).increment(1);
    counter!(names::INVALIDATIONS_TOTAL).increment(invalidated as u64);
    if failed > 0 {
        counter!(names::INVALIDATION_FAILURES_TOTAL).increment(failed as u64);
    }
    counter!(names::TAGS_DELETED_TOTAL).increment(deleted);
}
