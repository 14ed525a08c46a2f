//! Entity Handlers
//!
//! The singular (`/<resource>/<id>`) and plural (`/<resource>`) handler of a
//! registered collection. Each call resolves the path before anything else,
//! reads the body at most once and invokes at most one contract operation.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body, Bytes},
    extract::{Request, State},
    http::{header, request::Parts, Extensions, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, MethodRouter},
    Json,
};

use crate::domain::{
    ancestry, CollectionFilter, EntityCollection, PathError, PathResolver, RequestContext,
    Requestor,
};
use crate::shared::error::AppError;

/// State of the handler pair of one collection.
#[derive(Clone)]
pub struct EntityHandlerState {
    collection: Arc<dyn EntityCollection>,
    resolver: Arc<PathResolver>,
    body_limit: usize,
}

impl EntityHandlerState {
    pub fn new(collection: Arc<dyn EntityCollection>, body_limit: usize) -> Self {
        let resolver = PathResolver::new(collection.rest_name(), ancestry(collection.as_ref()));
        Self {
            collection,
            resolver: Arc::new(resolver),
            body_limit,
        }
    }

    pub fn collection(&self) -> &Arc<dyn EntityCollection> {
        &self.collection
    }
}

/// Build the `(singular, plural)` handlers for `collection`.
pub fn entity_handlers(
    collection: Arc<dyn EntityCollection>,
    body_limit: usize,
) -> (MethodRouter, MethodRouter) {
    let state = EntityHandlerState::new(collection, body_limit);
    (
        any(singular).with_state(state.clone()),
        any(plural).with_state(state),
    )
}

/// `GET` / `PUT` / `DELETE` on one entity.
pub async fn singular(
    State(state): State<EntityHandlerState>,
    request: Request,
) -> Result<Response, AppError> {
    let (parts, body) = request.into_parts();
    let (_, id) = state
        .resolver
        .resolve_entity(parts.uri.path())
        .map_err(|e| rejected_path(&parts, e))?;
    let Parts {
        method, extensions, ..
    } = parts;

    match method {
        Method::GET => {
            let ctx = context(extensions)?;
            let entity = state.collection.get(&ctx, id).await?;
            Ok(Json(entity).into_response())
        }
        Method::PUT => {
            let ctx = context(extensions)?;
            let body = read_body(body, state.body_limit).await?;
            state.collection.edit(&ctx, id, &body).await?;
            Ok(StatusCode::OK.into_response())
        }
        Method::DELETE => {
            let ctx = context(extensions)?;
            state.collection.delete(&ctx, id).await?;
            Ok(StatusCode::OK.into_response())
        }
        other => Ok(method_not_allowed(&other, "GET, PUT, DELETE")),
    }
}

/// `GET` / `POST` on a collection.
pub async fn plural(
    State(state): State<EntityHandlerState>,
    request: Request,
) -> Result<Response, AppError> {
    let (parts, body) = request.into_parts();
    let parents = state
        .resolver
        .resolve_collection(parts.uri.path())
        .map_err(|e| rejected_path(&parts, e))?;
    let Parts {
        method,
        uri,
        extensions,
        ..
    } = parts;

    match method {
        Method::GET => {
            let ctx = context(extensions)?;
            let filter = CollectionFilter::from_uri(&uri);
            let collection = state.collection.list(&ctx, &parents, &filter).await?;
            Ok(Json(collection).into_response())
        }
        Method::POST => {
            let ctx = context(extensions)?;
            let body = read_body(body, state.body_limit).await?;
            let location = state.collection.create(&ctx, &parents, &body).await?;
            Ok((StatusCode::CREATED, [(header::LOCATION, location)]).into_response())
        }
        other => Ok(method_not_allowed(&other, "GET, POST")),
    }
}

/// Context for a contract call, from the extensions of an authenticated
/// request.
fn context(mut extensions: Extensions) -> Result<RequestContext, AppError> {
    let requestor = extensions
        .remove::<Requestor>()
        .ok_or_else(|| AppError::Unauthorized("request was not authenticated".into()))?;
    Ok(RequestContext::new(requestor, extensions))
}

async fn read_body(body: Body, limit: usize) -> Result<Bytes, AppError> {
    to_bytes(body, limit)
        .await
        .map_err(|e| AppError::BadRequest(format!("failed to read request body: {}", e)))
}

fn rejected_path(parts: &Parts, err: PathError) -> AppError {
    tracing::debug!(path = %parts.uri.path(), error = %err, "rejected request path");
    err.into()
}

fn method_not_allowed(method: &Method, allow: &'static str) -> Response {
    let mut response =
        AppError::MethodNotAllowed(format!("{} is not supported here", method)).into_response();
    response
        .headers_mut()
        .insert(header::ALLOW, header::HeaderValue::from_static(allow));
    response
}
