//! # Tagsweep Service
//!
//! The two writers of the tag association index:
//! - [`QueryTagIndexer`] records which tags a freshly executed query depends on,
//!   usually through the bounded background [`IndexQueue`].
//! - [`InvalidationCoordinator`] resolves an invalidation event to the affected
//!   queries, purges them downstream, then prunes the processed tags.

pub mod coordinator;
pub mod downstream;
pub mod dto;
pub mod index_queue;
pub mod indexer;
pub mod metrics;

pub use coordinator::*;
pub use downstream::*;
pub use dto::*;
pub use index_queue::*;
pub use indexer::*;
