//! Message Collection
//!
//! `messages` resource, nested under `threads`:
//! `/threads/<threadId>/messages[/<messageId>]`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::application::dto::{parse_message_create, parse_message_edit};
use crate::config::CollectionSettings;
use crate::domain::{
    canonical_path, Collection, CollectionFilter, Entity, EntityCollection, Message,
    MessagePatch, MessageRepository, ParentIds, RequestContext, ThreadRepository,
};
use crate::shared::error::AppError;

pub struct MessageCollection {
    messages: Arc<dyn MessageRepository>,
    threads: Arc<dyn ThreadRepository>,
    parent: Arc<dyn EntityCollection>,
    paging: CollectionSettings,
}

impl MessageCollection {
    pub const REST_NAME: &'static str = "messages";

    /// `parent` is the collection serving threads; its rest name keys the
    /// thread id in parent identifier maps.
    pub fn new(
        messages: Arc<dyn MessageRepository>,
        threads: Arc<dyn ThreadRepository>,
        parent: Arc<dyn EntityCollection>,
        paging: CollectionSettings,
    ) -> Self {
        Self {
            messages,
            threads,
            parent,
            paging,
        }
    }

    /// Id of the existing thread named in `parents`.
    async fn parent_thread(&self, parents: &ParentIds) -> Result<Uuid, AppError> {
        let name = self.parent.rest_name();
        let thread_id = parents
            .get(name)
            .ok_or_else(|| AppError::BadRequest(format!("no {} ID supplied", name)))?;

        if self.threads.find_by_id(thread_id).await?.is_none() {
            return Err(AppError::NotFound(format!("thread {} not found", thread_id)));
        }
        Ok(thread_id)
    }

    async fn find(&self, id: Uuid) -> Result<Message, AppError> {
        self.messages
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("message {} not found", id)))
    }

    async fn find_owned(&self, ctx: &RequestContext, id: Uuid) -> Result<Message, AppError> {
        let message = self.find(id).await?;
        if !ctx.requestor().may_act_for(message.author_id) {
            return Err(AppError::Forbidden(
                "only the author may change a message".into(),
            ));
        }
        Ok(message)
    }
}

#[async_trait]
impl EntityCollection for MessageCollection {
    fn rest_name(&self) -> &str {
        Self::REST_NAME
    }

    fn parent_collection(&self) -> Option<Arc<dyn EntityCollection>> {
        Some(self.parent.clone())
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
            .ok_or_else(|| AppError::Forbidden("messages must be posted by a user".into()))?;
        let thread_id = self.parent_thread(parents).await?;
        let request = parse_message_create(body)?;

        let message = Message {
            id: Uuid::new_v4(),
            thread_id,
            author_id,
            content: request.content,
            created_at: Utc::now(),
        };
        self.messages.create(&message).await?;

        // The thread may have been deleted since it was looked up; its
        // cascade could have run before this row existed.
        if self.threads.find_by_id(thread_id).await?.is_none() {
            self.messages.delete(message.id).await?;
            return Err(AppError::NotFound(format!("thread {} not found", thread_id)));
        }
        tracing::info!(
            message_id = %message.id,
            thread_id = %thread_id,
            author_id = %author_id,
            "Message created"
        );

        canonical_path(self, parents, message.id)
    }

    async fn get(&self, _ctx: &RequestContext, id: Uuid) -> Result<Entity, AppError> {
        self.find(id).await.map(Entity::from)
    }

    async fn list(
        &self,
        _ctx: &RequestContext,
        parents: &ParentIds,
        filter: &CollectionFilter,
    ) -> Result<Collection, AppError> {
        let thread_id = self.parent_thread(parents).await?;
        let window = filter.window(self.paging.default_page_size, self.paging.max_page_size);
        let page = self.messages.list_by_thread(thread_id, filter, window).await?;
        Ok(page.into())
    }

    async fn edit(&self, ctx: &RequestContext, id: Uuid, body: &[u8]) -> Result<(), AppError> {
        self.find_owned(ctx, id).await?;
        let edit = parse_message_edit(body)?;

        let patch = MessagePatch {
            content: edit.content,
        };
        if patch.is_empty() {
            return Ok(());
        }

        if !self.messages.update(id, &patch).await? {
            return Err(AppError::NotFound(format!("message {} not found", id)));
        }
        Ok(())
    }

    async fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), AppError> {
        self.find_owned(ctx, id).await?;
        if !self.messages.delete(id).await? {
            return Err(AppError::NotFound(format!("message {} not found", id)));
        }
        tracing::info!(message_id = %id, "Message deleted");
        Ok(())
    }
}
