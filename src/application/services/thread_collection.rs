//! Thread Collection
//!
//! Top-level `threads` resource.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::application::dto::{parse_thread_create, parse_thread_edit};
use crate::config::CollectionSettings;
use crate::domain::{
    canonical_path, Collection, CollectionFilter, Entity, EntityCollection, MessageRepository,
    ParentIds, RequestContext, Thread, ThreadPatch, ThreadRepository,
};
use crate::shared::error::AppError;

pub struct ThreadCollection {
    threads: Arc<dyn ThreadRepository>,
    messages: Arc<dyn MessageRepository>,
    paging: CollectionSettings,
}

impl ThreadCollection {
    pub const REST_NAME: &'static str = "threads";

    pub fn new(
        threads: Arc<dyn ThreadRepository>,
        messages: Arc<dyn MessageRepository>,
        paging: CollectionSettings,
    ) -> Self {
        Self {
            threads,
            messages,
            paging,
        }
    }

    async fn find(&self, id: Uuid) -> Result<Thread, AppError> {
        self.threads
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("thread {} not found", id)))
    }

    /// Fetch a thread the requestor is allowed to change.
    async fn find_owned(&self, ctx: &RequestContext, id: Uuid) -> Result<Thread, AppError> {
        let thread = self.find(id).await?;
        if !ctx.requestor().may_act_for(thread.author_id) {
            return Err(AppError::Forbidden(
                "only the author may change a thread".into(),
            ));
        }
        Ok(thread)
    }
}

#[async_trait]
impl EntityCollection for ThreadCollection {
    fn rest_name(&self) -> &str {
        Self::REST_NAME
    }

    fn parent_collection(&self) -> Option<Arc<dyn EntityCollection>> {
        None
    }

    async fn create(
        &self,
        ctx: &RequestContext,
        parents: &ParentIds,
        body: &[u8],
    ) -> Result<String, AppError> {
        let author_id = ctx
            .requestor()
            .user_id()
            .ok_or_else(|| AppError::Forbidden("threads must be created by a user".into()))?;
        let request = parse_thread_create(body)?;

        let thread = Thread {
            id: Uuid::new_v4(),
            title: request.title,
            author_id,
            created_at: Utc::now(),
        };
        self.threads.create(&thread).await?;
        tracing::info!(thread_id = %thread.id, author_id = %author_id, "Thread created");

        canonical_path(self, parents, thread.id)
    }

    async fn get(&self, _ctx: &RequestContext, id: Uuid) -> Result<Entity, AppError> {
        self.find(id).await.map(Entity::from)
    }

    async fn list(
        &self,
        _ctx: &RequestContext,
        _parents: &ParentIds,
        filter: &CollectionFilter,
    ) -> Result<Collection, AppError> {
        let window = filter.window(self.paging.default_page_size, self.paging.max_page_size);
        let page = self.threads.list(filter, window).await?;
        Ok(page.into())
    }

    async fn edit(&self, ctx: &RequestContext, id: Uuid, body: &[u8]) -> Result<(), AppError> {
        self.find_owned(ctx, id).await?;
        let edit = parse_thread_edit(body)?;

        let patch = ThreadPatch { title: edit.title };
        if patch.is_empty() {
            return Ok(());
        }

        if !self.threads.update(id, &patch).await? {
            return Err(AppError::NotFound(format!("thread {} not found", id)));
        }
        Ok(())
    }

    async fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), AppError> {
        self.find_owned(ctx, id).await?;

        // Thread first: a message create that lands in between sees the
        // thread gone and withdraws its row.
        if !self.threads.delete(id).await? {
            return Err(AppError::NotFound(format!("thread {} not found", id)));
        }
        let removed = self.messages.delete_by_thread(id).await?;
        tracing::info!(thread_id = %id, messages_removed = removed, "Thread deleted");
        Ok(())
    }
}
