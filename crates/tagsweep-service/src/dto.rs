//! Data transfer objects for the service layer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tagsweep_core::QueryId;
use utoipa::ToSchema;

/// Result of handling one invalidation event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvalidationOutcome {
    /// Queries that depended on any of the event's tags.
    #[schema(value_type = Vec<String>)]
    pub query_ids: BTreeSet<QueryId>,
    /// Number of tag associations that existed and were removed.
    pub deleted_count: u64,
}

impl InvalidationOutcome {
    /// Returns true when the event touched nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.query_ids.is_empty() && self.deleted_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_wire_format() {
        let outcome = InvalidationOutcome {
            query_ids: [QueryId::from("q2"), QueryId::from("q1")].into_iter().collect(),
            deleted_count: 1,
        };

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json, serde_json::json!({ "queryIds": ["q1", "q2"], "deletedCount": 1 }));
    }

    #[test]
    fn test_default_outcome_is_empty() {
        assert!(InvalidationOutcome::default().is_empty());
    }
}
