//! # Tagsweep Core
//!
//! Core types and error definitions for Tagsweep.
//! This crate holds the typed identifiers shared by the association store,
//! the indexer and the invalidation coordinator.

pub mod error;
pub mod id;
pub mod result;
pub mod tags;
pub mod validation;

pub use error::*;
pub use id::*;
pub use result::*;
pub use tags::*;
pub use validation::*;
