//! In-memory association backend.

use crate::AssociationBackend;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap, HashSet};
use tagsweep_core::{CacheTag, NonEmptyTags, QueryId, TagsweepResult};

/// Process-local association backend.
///
/// Used by tests and single-node local runs. Empty sets are never kept, so a
/// tag whose members were all removed is indistinguishable from one that was
/// never written.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    sets: RwLock<HashMap<CacheTag, HashSet<QueryId>>>,
}

impl InMemoryBackend {
    /// Create an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tags currently holding at least one query.
    #[must_use]
    pub fn tag_count(&self) -> usize {
        self.sets.read().len()
    }

    /// Members of a single tag, for assertions in tests.
    #[must_use]
    pub fn members(&self, tag: &CacheTag) -> BTreeSet<QueryId> {
        self.sets
            .read()
            .get(tag)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl AssociationBackend for InMemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn add(&self, tag: &CacheTag, query_id: &QueryId) -> TagsweepResult<()> {
        self.sets
            .write()
            .entry(tag.clone())
            .or_default()
            .insert(query_id.clone());
        Ok(())
    }

    async fn union(&self, tags: &NonEmptyTags) -> TagsweepResult<BTreeSet<QueryId>> {
        let sets = self.sets.read();
        Ok(tags
            .iter()
            .filter_map(|tag| sets.get(tag))
            .flat_map(|set| set.iter().cloned())
            .collect())
    }

    async fn delete(&self, tags: &NonEmptyTags) -> TagsweepResult<u64> {
        let mut sets = self.sets.write();
        let removed = tags.iter().filter(|tag| sets.remove(*tag).is_some()).count();
        Ok(removed as u64)
    }

    async fn clear(&self) -> TagsweepResult<()> {
        self.sets.write().clear();
        Ok(())
    }

    async fn ping(&self) -> TagsweepResult<()> {
        Ok(())
    }
}
