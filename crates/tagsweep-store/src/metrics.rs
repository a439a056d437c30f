//! Metrics emitted by the association store.

use metrics::{counter, describe_counter};

/// Metric names for the association store.
pub mod names {
    /// Backend calls that failed or timed out, labelled by operation.
    pub const STORE_FAILURES_TOTAL: &str = "tagsweep_store_failures_total";
}

/// Register store metric descriptions.
pub fn register_metrics() {
    describe_counter!(
        names::STORE_FAILURES_TOTAL,
        "Association store calls that failed or timed out"
    );
}

/// Record a failed backend call.
pub fn record_failure(operation: &'static str) {
    counter!(names::STORE_FAILURES_TOTAL, "operation" => operation).increment(1);
}
