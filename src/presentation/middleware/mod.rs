//! Middleware
//!
//! Tower middleware for request processing.

pub mod auth;
pub mod cors;
pub mod logging;

pub use auth::{auth_middleware, AuthState};
pub use cors::create_cors_layer;
pub use logging::create_trace_layer;
