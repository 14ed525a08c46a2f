//! Entity collection contract.
//!
//! Every resource served by the dispatcher implements [`EntityCollection`].
//! The dispatcher owns routing, framing and filter parsing; the collection
//! owns storage, validation and authorization of its entities.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::Extensions;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{CollectionFilter, Entity, Page, ParentIds, Requestor};
use crate::shared::error::AppError;

/// Per-request context handed to every contract operation.
///
/// Carries the requestor and, opaquely, whatever the protocol layer attached
/// to the request (deadlines, request ids, ...).
#[derive(Debug, Clone)]
pub struct RequestContext {
    requestor: Requestor,
    extensions: Extensions,
}

impl RequestContext {
    pub fn new(requestor: Requestor, extensions: Extensions) -> Self {
        Self {
            requestor,
            extensions,
        }
    }

    /// Context for in-process calls made on behalf of the system itself.
    pub fn system() -> Self {
        Self::new(Requestor::System, Extensions::new())
    }

    pub fn requestor(&self) -> &Requestor {
        &self.requestor
    }

    /// Request extensions as attached by the protocol layer.
    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }
}

/// Response shape of a list request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    /// Size of the whole matching set, independent of paging
    pub total_entities: u64,

    /// The requested page
    pub entities: Vec<Entity>,
}

impl<T: Into<Entity>> From<Page<T>> for Collection {
    fn from(page: Page<T>) -> Self {
        Self {
            total_entities: page.total,
            entities: page.items.into_iter().map(Into::into).collect(),
        }
    }
}

/// Capability set of a resource exposed over HTTP.
#[async_trait]
pub trait EntityCollection: Send + Sync {
    /// URL component naming this resource, e.g. `threads`.
    fn rest_name(&self) -> &str;

    /// The collection whose path precedes this one, if nested.
    fn parent_collection(&self) -> Option<Arc<dyn EntityCollection>>;

    /// Validate and store a new entity scoped to `parents`. Returns the
    /// canonical path of the new entity.
    async fn create(
        &self,
        ctx: &RequestContext,
        parents: &ParentIds,
        body: &[u8],
    ) -> Result<String, AppError>;

    /// Fetch one entity. Fails with `NotFound` if absent.
    async fn get(&self, ctx: &RequestContext, id: Uuid) -> Result<Entity, AppError>;

    /// Entities under `parents` selected by `filter`. The total count covers
    /// the whole matching set, not only the page.
    async fn list(
        &self,
        ctx: &RequestContext,
        parents: &ParentIds,
        filter: &CollectionFilter,
    ) -> Result<Collection, AppError>;

    /// Partial update: fields absent from `body` are left untouched.
    async fn edit(&self, ctx: &RequestContext, id: Uuid, body: &[u8]) -> Result<(), AppError>;

    async fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), AppError>;
}

/// Ancestor resource names of `collection`, outermost first.
pub fn ancestry(collection: &dyn EntityCollection) -> Vec<String> {
    let mut names = Vec::new();
    let mut current = collection.parent_collection();
    while let Some(parent) = current {
        names.push(parent.rest_name().to_string());
        current = parent.parent_collection();
    }
    names.reverse();
    names
}

/// Canonical path of entity `id` of `collection`, e.g.
/// `/threads/<tid>/messages/<mid>`.
pub fn canonical_path(
    collection: &dyn EntityCollection,
    parents: &ParentIds,
    id: Uuid,
) -> Result<String, AppError> {
    let mut path = String::new();
    for name in ancestry(collection) {
        let parent_id = parents
            .get(&name)
            .ok_or_else(|| AppError::BadRequest(format!("no {} ID supplied", name)))?;
        path.push_str(&format!("/{}/{}", name, parent_id));
    }
    path.push_str(&format!("/{}/{}", collection.rest_name(), id));
    Ok(path)
}
