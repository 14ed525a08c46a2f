//! REST API tests, driven through the full router.

mod auth_tests;
mod collection_tests;
mod dispatch_tests;
mod health_tests;
mod message_tests;
mod sqlite_tests;
mod user_tests;
