//! Application Services
//!
//! Entity collections and the credential check behind the auth middleware.
//!
//! ## Available Services
//!
//! - **PasswordAuthenticator**: Basic credentials against stored Argon2 hashes
//! - **UserCollection**: `/users`
//! - **ThreadCollection**: `/threads`
//! - **MessageCollection**: `/threads/<id>/messages`

pub mod auth_service;
pub mod user_collection;
pub mod thread_collection;
pub mod message_collection;

pub use auth_service::{hash_password, verify_password, PasswordAuthenticator};
pub use user_collection::UserCollection;
pub use thread_collection::ThreadCollection;
pub use message_collection::MessageCollection;
