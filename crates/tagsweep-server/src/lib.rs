//! # Tagsweep Server Library
//!
//! Wiring for the Tagsweep server: builds the association store, the index
//! queue and the invalidation coordinator from configuration and serves the
//! REST router.

pub mod app;
pub mod startup;
