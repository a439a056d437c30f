//! Typed identifiers for tags and queries.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt::{self, Display};

/// A content cache tag.
///
/// Opaque and immutable; equality is exact string match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(transparent)]
pub struct CacheTag(String);

impl CacheTag {
    /// Creates a new cache tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Returns the tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CacheTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheTag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CacheTag {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<String> for CacheTag {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for CacheTag {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Identifier of one executed query (content plus variables).
///
/// Minted by the upstream content service; Tagsweep only stores and returns it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(transparent)]
pub struct QueryId(String);

impl QueryId {
    /// Creates a new query ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for QueryId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for QueryId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<String> for QueryId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for QueryId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_tag_equality_is_exact() {
        assert_eq!(CacheTag::from("Post:1"), CacheTag::new("Post:1"));
        assert_ne!(CacheTag::from("Post:1"), CacheTag::from("post:1"));
        assert_ne!(CacheTag::from("Post:1"), CacheTag::from("Post:1 "));
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let json = serde_json::to_string(&QueryId::new("q1")).unwrap();
        assert_eq!(json, "\"q1\"");

        let tag: CacheTag = serde_json::from_str("\"tagA\"").unwrap();
        assert_eq!(tag.as_str(), "tagA");
    }

    #[test]
    fn test_borrow_allows_str_lookup() {
        let set: HashSet<QueryId> = [QueryId::from("q1")].into_iter().collect();
        assert!(set.contains("q1"));
    }
}
