//! Repository Implementations
//!
//! In-memory and SQLite implementations of the domain repository traits.
//!
//! ## Available Repositories
//!
//! - **Memory{User,Thread,Message}Repository** - process-local tables
//! - **SqliteUserRepository** - `users` table
//! - **SqliteThreadRepository** - `threads` table
//! - **SqliteMessageRepository** - `messages` table, listed per thread
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use sqlx::SqlitePool;
//! use crate::infrastructure::repositories::{SqliteThreadRepository, SqliteMessageRepository};
//!
//! fn setup_repositories(pool: SqlitePool) {
//!     let threads = SqliteThreadRepository::new(pool.clone());
//!     let messages = SqliteMessageRepository::new(pool);
//! }
//! ```

mod listing;
pub mod memory;
pub mod user_repository;
pub mod thread_repository;
pub mod message_repository;

pub use memory::{MemoryMessageRepository, MemoryTable, MemoryThreadRepository, MemoryUserRepository};
pub use user_repository::SqliteUserRepository;
pub use thread_repository::SqliteThreadRepository;
pub use message_repository::SqliteMessageRepository;
