//! Infrastructure Layer
//!
//! Storage behind the domain repository traits:
//! - SQLite pool and migrations
//! - In-memory and SQLite repositories

pub mod database;
pub mod repositories;
