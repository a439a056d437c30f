//! # Tagsweep Config
//!
//! Configuration management for Tagsweep.
//! Supports layered configuration from files and environment variables.

mod app_config;
mod loader;

pub use app_config::*;
pub use loader::*;
