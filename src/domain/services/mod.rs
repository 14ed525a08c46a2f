//! # Domain Services
//!
//! Contracts the dispatcher is written against.
//!
//! ## Services
//!
//! - **EntityCollection**: Capability set every served resource implements
//! - **Authenticator**: Resolves request credentials to a requestor

mod auth;
mod collection;

pub use auth::*;
pub use collection::*;
