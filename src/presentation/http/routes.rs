//! Route Configuration
//!
//! Fixed endpoints plus the root dispatcher as fallback for every
//! registered collection.

use axum::{middleware, routing::get, Router};
use tower_http::cors::CorsLayer;

use super::dispatcher::{dispatch, RouteTable};
use super::handlers;
use crate::presentation::middleware::{auth_middleware, create_trace_layer, AuthState};

/// Create the main router around a built route table.
pub fn create_router(table: RouteTable, auth: AuthState, cors: CorsLayer) -> Router {
    let verification = get(handlers::verification::verify)
        .layer::<_, std::convert::Infallible>(middleware::from_fn_with_state(auth, auth_middleware))
        .layer(cors);

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/verification", verification)
        .fallback(dispatch)
        .layer(create_trace_layer())
        .with_state(table)
}
