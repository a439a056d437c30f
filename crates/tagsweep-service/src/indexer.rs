//! Query tag indexer.

use futures::future::join_all;
use std::sync::Arc;
use tagsweep_core::{CacheTag, QueryId};
use tagsweep_store::AssociationStore;
use tracing::{debug, warn};

/// Records which tags an executed query depends on.
///
/// Every tag is written independently and concurrently; there is no
/// multi-key transaction. A failed write leaves the query under-indexed for
/// that tag, so a later change to the tag will not purge it. That gap is
/// logged and accepted rather than retried.
///
/// An index write racing with an invalidation sweep over the same tag can be
/// lost in the same way. The association stays stale until the next change
/// event for the tag.
#[derive(Clone)]
pub struct QueryTagIndexer {
    store: Arc<AssociationStore>,
}

impl QueryTagIndexer {
    /// Create an indexer writing to `store`.
    pub fn new(store: Arc<AssociationStore>) -> Self {
        Self { store }
    }

    /// Indexes `query_id` under each of `tags`.
    ///
    /// Never fails: per-tag errors are logged by the store and summarised
    /// here. An empty `tags` slice issues no store call.
    pub async fn store(&self, query_id: &QueryId, tags: &[CacheTag]) {
        if tags.is_empty() {
            return;
        }

        let results = join_all(tags.iter().map(|tag| self.store.add(tag, query_id))).await;

        let failed: Vec<&CacheTag> = tags
            .iter()
            .zip(&results)
            .filter(|(_, ok)| !**ok)
            .map(|(tag, _)| tag)
            .collect();
        let written = tags.len() - failed.len();
        crate::metrics::record_index(written, failed.len());

        if failed.is_empty() {
            debug!(query_id = %query_id, tags = tags.len(), "Indexed query");
        } else {
            warn!(
                query_id = %query_id,
                failed = failed.len(),
                total = tags.len(),
                failed_tags = ?failed,
                "Query partially indexed; failed tags will not invalidate it"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::BTreeSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tagsweep_core::{NonEmptyTags, TagsweepError, TagsweepResult};
    use tagsweep_store::{AssociationBackend, InMemoryBackend};

    /// Backend counting calls and failing writes for one tag.
    struct FlakyBackend {
        inner: InMemoryBackend,
        failing_tag: Option<CacheTag>,
        calls: AtomicUsize,
    }

    impl FlakyBackend {
        fn new(failing_tag: Option<&str>) -> Self {
            Self {
                inner: InMemoryBackend::new(),
                failing_tag: failing_tag.map(CacheTag::from),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl AssociationBackend for FlakyBackend {
        fn name(&self) -> &'static str {
            "flaky"
        }

        async fn add(&self, tag: &CacheTag, query_id: &QueryId) -> TagsweepResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing_tag.as_ref() == Some(tag) {
                return Err(TagsweepError::backend("write refused"));
            }
            self.inner.add(tag, query_id).await
        }

        async fn union(&self, tags: &NonEmptyTags) -> TagsweepResult<BTreeSet<QueryId>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.union(tags).await
        }

        async fn delete(&self, tags: &NonEmptyTags) -> TagsweepResult<u64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.delete(tags).await
        }

        async fn clear(&self) -> TagsweepResult<()> {
            self.inner.clear().await
        }

        async fn ping(&self) -> TagsweepResult<()> {
            Ok(())
        }
    }

    fn setup(failing_tag: Option<&str>) -> (Arc<FlakyBackend>, Arc<AssociationStore>) {
        let backend = Arc::new(FlakyBackend::new(failing_tag));
        let store = Arc::new(AssociationStore::new(backend.clone(), Duration::from_secs(1)));
        (backend, store)
    }

    fn tag_list(values: &[&str]) -> Vec<CacheTag> {
        values.iter().copied().map(CacheTag::from).collect()
    }

    #[tokio::test]
    async fn test_store_indexes_every_tag() {
        let (backend, store) = setup(None);
        let indexer = QueryTagIndexer::new(store);

        indexer.store(&QueryId::from("q1"), &tag_list(&["tagA", "tagB"])).await;

        let expected: BTreeSet<QueryId> = [QueryId::from("q1")].into_iter().collect();
        assert_eq!(backend.inner.members(&CacheTag::from("tagA")), expected);
        assert_eq!(backend.inner.members(&CacheTag::from("tagB")), expected);
    }

    #[tokio::test]
    async fn test_empty_tags_issue_no_store_call() {
        let (backend, store) = setup(None);
        let indexer = QueryTagIndexer::new(store);

        indexer.store(&QueryId::from("q1"), &[]).await;

        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_tag_does_not_block_others() {
        let (backend, store) = setup(Some("tagB"));
        let indexer = QueryTagIndexer::new(store);

        indexer
            .store(&QueryId::from("q1"), &tag_list(&["tagA", "tagB", "tagC"]))
            .await;

        assert_eq!(backend.calls.load(Ordering::SeqCst), 3);
        assert_eq!(backend.inner.members(&CacheTag::from("tagA")).len(), 1);
        assert!(backend.inner.members(&CacheTag::from("tagB")).is_empty());
        assert_eq!(backend.inner.members(&CacheTag::from("tagC")).len(), 1);
    }

    #[tokio::test]
    async fn test_one_query_under_many_tags_and_many_queries_under_one_tag() {
        let (backend, store) = setup(None);
        let indexer = QueryTagIndexer::new(store);

        indexer.store(&QueryId::from("q1"), &tag_list(&["tagA", "tagB"])).await;
        indexer.store(&QueryId::from("q2"), &tag_list(&["tagA"])).await;

        assert_eq!(backend.inner.members(&CacheTag::from("tagA")).len(), 2);
        assert_eq!(backend.inner.members(&CacheTag::from("tagB")).len(), 1);
    }
}
