//! # entitycoll
//!
//! A generic REST dispatcher exposing nested entity collections over HTTP:
//! - `GET/POST /<resource>` and `GET/PUT/DELETE /<resource>/<id>`, nested as
//!   `/<parent>/<parentId>/<resource>[/<id>]`
//! - Paging, sorting and property filters in the query string
//! - HTTP Basic authentication and CORS around every resource
//! - In-memory or SQLite storage
//!
//! ## Architecture
//!
//! - **Domain Layer**: Entities, the collection contract, filter and path parsing
//! - **Application Layer**: Collection implementations, request DTOs, authentication
//! - **Infrastructure Layer**: Repository implementations
//! - **Presentation Layer**: Route table, dispatcher, handlers and middleware
//!
//! ## Module Structure
//!
//! ```text
//! entitycoll/
//! +-- config/         Configuration management
//! +-- domain/         Entities, value objects, contracts
//! +-- application/    Collections and DTOs
//! +-- infrastructure/ In-memory and SQLite storage
//! +-- presentation/   HTTP routing and middleware
//! +-- shared/         Common utilities (errors, validation)
//! ```

// Configuration module
pub mod config;

// Domain layer - Core business logic
pub mod domain;

// Application layer - Business services
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup
pub mod startup;

// Telemetry and observability
pub mod telemetry;
