//! HTTP middleware.

mod logging;
mod webhook_auth;

pub use logging::*;
pub use webhook_auth::*;
