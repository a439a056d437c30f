//! # Tagsweep Store
//!
//! Reverse index from cache tags to the queries that depend on them.
//!
//! [`AssociationBackend`] is the raw primitive set (set-add, multi-key
//! union, multi-key delete, flush) with Redis and in-memory implementations.
//! [`AssociationStore`] wraps a backend, bounds every call by a timeout, and
//! absorbs failures: they are logged and replaced by a neutral default so
//! callers never see a backend error.

mod backend;
pub mod keys;
mod memory;
pub mod metrics;
mod redis_backend;
mod store;
mod timeout;

pub use backend::AssociationBackend;
pub use memory::InMemoryBackend;
pub use redis_backend::{create_pool, RedisBackend};
pub use store::AssociationStore;
pub use timeout::with_timeout;
