//! REST API controllers.

pub mod admin_controller;
pub mod health_controller;
pub mod index_controller;
pub mod invalidation_controller;
