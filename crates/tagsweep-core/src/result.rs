//! Result type aliases for Tagsweep.

use crate::TagsweepError;

/// A specialized `Result` type for Tagsweep operations.
pub type TagsweepResult<T> = Result<T, TagsweepError>;
