//! # Domain Layer
//!
//! The core of the dispatcher: how requests are resolved against resources,
//! independent of HTTP framing and of storage.
//!
//! ## Structure
//!
//! - **entities**: Served entities (User, Thread, Message) and repository traits
//! - **value_objects**: Collection filters, path resolution, requestors
//! - **services**: The entity collection and authenticator contracts
//!
//! ## Design Principles
//!
//! - No dependencies on infrastructure or presentation layers
//! - Repository traits define data access contracts
//! - The dispatcher never touches entity state directly

pub mod entities;
pub mod services;
pub mod value_objects;

// Re-export commonly used types
pub use entities::*;
pub use services::*;
pub use value_objects::*;
