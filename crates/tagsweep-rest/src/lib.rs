//! # Tagsweep REST
//!
//! HTTP surface for Tagsweep: the authenticated invalidation webhook, the
//! indexing ingress used by the query-execution path, and health checks.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

pub use middleware::WebhookAuthState;
pub use router::*;
pub use state::*;
