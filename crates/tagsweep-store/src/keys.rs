//! Redis key builder for tag sets.

use tagsweep_core::CacheTag;

/// Builds namespaced keys for tag association sets.
#[derive(Debug, Clone)]
pub struct TagKeys {
    prefix: String,
}

impl TagKeys {
    /// Create a new key builder with the given prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Set key holding the query IDs that depend on `tag`.
    #[must_use]
    pub fn tag(&self, tag: &CacheTag) -> String {
        format!("{}:tag:{}", self.prefix, tag)
    }

    /// Keys for several tags, in input order.
    #[must_use]
    pub fn tags<'a>(&self, tags: impl IntoIterator<Item = &'a CacheTag>) -> Vec<String> {
        tags.into_iter().map(|tag| self.tag(tag)).collect()
    }
}

impl Default for TagKeys {
    fn default() -> Self {
        Self::new("tagsweep")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_key() {
        let keys = TagKeys::new("edge");
        assert_eq!(keys.tag(&CacheTag::from("Post:1")), "edge:tag:Post:1");
    }

    #[test]
    fn test_tags_keep_order() {
        let keys = TagKeys::default();
        let tags = [CacheTag::from("b"), CacheTag::from("a")];
        assert_eq!(keys.tags(&tags), vec!["tagsweep:tag:b", "tagsweep:tag:a"]);
    }
}
