//! HTTP surface: route table, root dispatcher and handlers.

pub mod dispatcher;
pub mod handlers;
pub mod routes;

pub use dispatcher::{dispatch, RegistrationError, RouteTable, RouteTableBuilder};
pub use routes::create_router;
