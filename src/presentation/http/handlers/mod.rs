//! HTTP Handlers
//!
//! Request handlers for all HTTP endpoints.

pub mod entity;
pub mod health;
pub mod verification;

pub use entity::{entity_handlers, EntityHandlerState};
