//! Timeout wrapper for backend calls.

use std::time::Duration;
use tagsweep_core::TagsweepError;

/// Wraps an async operation with a timeout.
///
/// Expiry maps to [`TagsweepError::Timeout`], which the store treats exactly
/// like a backend failure.
pub async fn with_timeout<F, Fut, T>(duration: Duration, f: F) -> Result<T, TagsweepError>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<T, TagsweepError>>,
{
    tokio::time::timeout(duration, f())
        .await
        .map_err(|_| TagsweepError::Timeout(format!("Operation timed out after {:?}", duration)))?
}
