//! Data Transfer Objects
//!
//! DTOs for entity request bodies.

pub mod request;

pub use request::*;
