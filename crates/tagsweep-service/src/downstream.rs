//! Downstream cache collaborators.

use async_trait::async_trait;
use serde::Serialize;
use tagsweep_core::{QueryId, TagsweepError, TagsweepResult};
use tracing::{debug, info};

/// The caching layer that serves query results and must be told what is stale.
///
/// `invalidate` is idempotent: marking an already stale entry again is
/// harmless. The coordinator may call it concurrently for distinct IDs.
#[async_trait]
pub trait DownstreamCache: Send + Sync {
    /// Marks every cached entry derived from `query_id` as stale.
    async fn invalidate(&self, query_id: &QueryId) -> TagsweepResult<()>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PurgeRequest<'a> {
    query_id: &'a str,
}

/// Downstream cache reached over HTTP.
///
/// Each invalidation is a `POST` of `{"queryId": "..."}` to the purge URL;
/// any non-success status is an error.
pub struct HttpDownstreamCache {
    client: reqwest::Client,
    purge_url: String,
}

impl HttpDownstreamCache {
    /// Create a client posting to `purge_url`.
    pub fn new(purge_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), purge_url)
    }

    /// Create a client reusing an existing `reqwest::Client`.
    pub fn with_client(client: reqwest::Client, purge_url: impl Into<String>) -> Self {
        Self {
            client,
            purge_url: purge_url.into(),
        }
    }
}

#[async_trait]
impl DownstreamCache for HttpDownstreamCache {
    async fn invalidate(&self, query_id: &QueryId) -> TagsweepResult<()> {
        let response = self
            .client
            .post(&self.purge_url)
            .json(&PurgeRequest {
                query_id: query_id.as_str(),
            })
            .send()
            .await
            .map_err(|e| TagsweepError::downstream(format!("purge request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TagsweepError::downstream(format!(
                "purge of '{}' returned {}",
                query_id, status
            )));
        }

        debug!(query_id = %query_id, "Downstream purge acknowledged");
        Ok(())
    }
}

/// Downstream cache used when no purge endpoint is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDownstreamCache;

#[async_trait]
impl DownstreamCache for NoopDownstreamCache {
    async fn invalidate(&self, query_id: &QueryId) -> TagsweepResult<()> {
        info!(query_id = %query_id, "No downstream cache configured; skipping purge");
        Ok(())
    }
}
