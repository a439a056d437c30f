//! Backend primitives for the tag association index.

use async_trait::async_trait;
use std::collections::BTreeSet;
use tagsweep_core::{CacheTag, NonEmptyTags, QueryId, TagsweepResult};

/// Raw key-value primitives the association index is built on.
///
/// Implementations report failures as errors; policy (logging, defaults,
/// timeouts) lives in [`crate::AssociationStore`].
#[async_trait]
pub trait AssociationBackend: Send + Sync {
    /// Short backend name for logs and health output.
    fn name(&self) -> &'static str;

    /// Inserts `query_id` into the member set of `tag`. Idempotent.
    async fn add(&self, tag: &CacheTag, query_id: &QueryId) -> TagsweepResult<()>;

    /// Returns the union of the member sets of all `tags`.
    async fn union(&self, tags: &NonEmptyTags) -> TagsweepResult<BTreeSet<QueryId>>;

    /// Removes each tag's member set; returns how many tags existed.
    async fn delete(&self, tags: &NonEmptyTags) -> TagsweepResult<u64>;

    /// Removes every association.
    async fn clear(&self) -> TagsweepResult<()>;

    /// Checks that the backend is reachable.
    async fn ping(&self) -> TagsweepResult<()>;
}
