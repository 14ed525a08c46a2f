//! # Domain Value Objects
//!
//! Immutable value types that represent domain concepts without identity.
//!
//! ## Value Objects
//!
//! - **Field / FieldValue**: Typed fields that filters address
//! - **CollectionFilter**: Paging, sort keys and property comparisons of a list request
//! - **ParentIds / PathResolver**: Ancestor identifiers inferred from a request path
//! - **Requestor**: The authenticated caller of a request

mod field;
mod filter;
mod path;
mod requestor;

pub use field::*;
pub use filter::*;
pub use path::*;
pub use requestor::*;
