//! Presentation Layer
//!
//! HTTP routing, entity handlers and middleware.

pub mod http;
pub mod middleware;
