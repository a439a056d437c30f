//! Tag sequences and tag header parsing.

use crate::{CacheTag, TagsweepError};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// A non-empty ordered sequence of cache tags.
///
/// Store operations that address several keys at once (`union`, `delete`)
/// take this type, so they can never be issued with zero keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CacheTag>", into = "Vec<CacheTag>")]
pub struct NonEmptyTags(Vec<CacheTag>);

impl NonEmptyTags {
    /// Builds a sequence from the given tags, returning `None` when empty.
    #[must_use]
    pub fn new(tags: Vec<CacheTag>) -> Option<Self> {
        if tags.is_empty() {
            None
        } else {
            Some(Self(tags))
        }
    }

    /// Builds a sequence holding exactly one tag.
    #[must_use]
    pub fn single(tag: impl Into<CacheTag>) -> Self {
        Self(vec![tag.into()])
    }

    /// Returns the tags as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[CacheTag] {
        &self.0
    }
}

impl Deref for NonEmptyTags {
    type Target = [CacheTag];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<Vec<CacheTag>> for NonEmptyTags {
    type Error = TagsweepError;

    fn try_from(tags: Vec<CacheTag>) -> Result<Self, Self::Error> {
        Self::new(tags).ok_or_else(|| TagsweepError::validation("At least one tag is required"))
    }
}

impl From<NonEmptyTags> for Vec<CacheTag> {
    fn from(tags: NonEmptyTags) -> Self {
        tags.0
    }
}

impl<'a> IntoIterator for &'a NonEmptyTags {
    type Item = &'a CacheTag;
    type IntoIter = std::slice::Iter<'a, CacheTag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Parses a comma-separated cache tag header value.
///
/// Segments are trimmed and empty segments dropped. Order is preserved and
/// duplicates are kept, since indexing the same tag twice is harmless.
#[must_use]
pub fn parse_tag_header(value: &str) -> Vec<CacheTag> {
    value
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(CacheTag::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(values: &[&str]) -> Vec<CacheTag> {
        values.iter().copied().map(CacheTag::from).collect()
    }

    #[test]
    fn test_parse_tag_header_trims_and_drops_empty() {
        assert_eq!(parse_tag_header(" Post:1 , ,User:2,, "), tags(&["Post:1", "User:2"]));
    }

    #[test]
    fn test_parse_tag_header_preserves_order_and_duplicates() {
        assert_eq!(parse_tag_header("b,a,b"), tags(&["b", "a", "b"]));
    }

    #[test]
    fn test_parse_tag_header_empty_input() {
        assert!(parse_tag_header("").is_empty());
        assert!(parse_tag_header(" , ,").is_empty());
    }

    #[test]
    fn test_non_empty_tags_rejects_empty() {
        assert!(NonEmptyTags::new(Vec::new()).is_none());
        assert!(NonEmptyTags::try_from(Vec::new()).is_err());
        assert_eq!(NonEmptyTags::single("tagA").len(), 1);
    }

    #[test]
    fn test_non_empty_tags_deserialize() {
        let parsed: NonEmptyTags = serde_json::from_str(r#"["tagA","tagB"]"#).unwrap();
        assert_eq!(parsed.as_slice(), tags(&["tagA", "tagB"]).as_slice());

        let empty: Result<NonEmptyTags, _> = serde_json::from_str("[]");
        assert!(empty.is_err());
    }
}
