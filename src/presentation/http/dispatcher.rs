//! Route Table and Root Dispatcher
//!
//! Registration stores the handler pair of each collection under
//! `/<name>` (plural) and `/<name>/` (singular). The table is built once at
//! startup and is read-only afterwards.
//!
//! Resource names and identifiers look alike in a path, so the dispatcher
//! tries two readings: the last segment as a resource name, then the
//! second-to-last segment as a resource name followed by an identifier.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::MethodRouter,
};
use tower::ServiceExt;
use tower_http::cors::CorsLayer;

use super::handlers::entity_handlers;
use crate::domain::{split_path, EntityCollection};
use crate::presentation::middleware::{auth_middleware, AuthState};
use crate::shared::error::AppError;

/// Paths served outside the route table.
pub const RESERVED_NAMES: &[&str] = &["health", "verification"];

#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("resource '{0}' is already registered")]
    Duplicate(String),

    #[error("'{0}' is not a valid resource name")]
    InvalidName(String),

    #[error("resource name '{0}' is reserved")]
    Reserved(String),
}

/// Collects collections into a [`RouteTable`].
pub struct RouteTableBuilder {
    routes: HashMap<String, MethodRouter>,
    auth: AuthState,
    cors: CorsLayer,
    body_limit: usize,
}

impl RouteTableBuilder {
    pub fn new(auth: AuthState, cors: CorsLayer, body_limit: usize) -> Self {
        Self {
            routes: HashMap::new(),
            auth,
            cors,
            body_limit,
        }
    }

    /// Register `collection`, wrapping both of its handlers with
    /// authentication and, outermost, CORS.
    pub fn register(
        mut self,
        collection: Arc<dyn EntityCollection>,
    ) -> Result<Self, RegistrationError> {
        let name = collection.rest_name().to_string();
        if name.is_empty() || name.contains('/') || uuid::Uuid::parse_str(&name).is_ok() {
            return Err(RegistrationError::InvalidName(name));
        }
        if RESERVED_NAMES.contains(&name.as_str()) {
            return Err(RegistrationError::Reserved(name));
        }
        let plural_key = format!("/{}", name);
        let singular_key = format!("/{}/", name);
        if self.routes.contains_key(&plural_key) {
            return Err(RegistrationError::Duplicate(name));
        }

        let (singular, plural) = entity_handlers(collection, self.body_limit);
        let (singular, plural) = (self.wrap(singular), self.wrap(plural));
        self.routes.insert(singular_key, singular);
        self.routes.insert(plural_key, plural);
        tracing::info!(resource = %name, "registered collection");
        Ok(self)
    }

    fn wrap(&self, handler: MethodRouter) -> MethodRouter {
        handler
            .layer::<_, std::convert::Infallible>(from_fn_with_state(self.auth.clone(), auth_middleware))
            .layer(self.cors.clone())
    }

    pub fn build(self) -> RouteTable {
        RouteTable {
            routes: Arc::new(self.routes),
        }
    }
}

/// Immutable map from route key to wrapped handler.
#[derive(Clone)]
pub struct RouteTable {
    routes: Arc<HashMap<String, MethodRouter>>,
}

impl RouteTable {
    /// Handler for `path`: the plural route named by the last segment,
    /// else the singular route named by the second-to-last one.
    pub fn lookup(&self, path: &str) -> Option<&MethodRouter> {
        let segments = split_path(path);
        let mut names = segments.iter().rev();

        let last = names.next()?;
        if let Some(route) = self.routes.get(&format!("/{}", last)) {
            return Some(route);
        }
        let parent = names.next()?;
        self.routes.get(&format!("/{}/", parent))
    }

    pub fn len(&self) -> usize {
        self.routes.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Fallback handler forwarding every request to its registered route.
pub async fn dispatch(State(table): State<RouteTable>, request: Request) -> Response {
    let Some(route) = table.lookup(request.uri().path()) else {
        tracing::debug!(path = %request.uri().path(), "no route for path");
        return AppError::NotFound(format!("no resource at {}", request.uri().path()))
            .into_response();
    };

    match route.clone().oneshot(request).await {
        Ok(response) => response,
        Err(infallible) => match infallible {},
    }
}
