//! User Collection
//!
//! Top-level `users` resource. Accounts are provisioned by the system
//! (startup seeding); users may only edit themselves and are never deleted.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::auth_service::hash_password;
use crate::application::dto::{parse_user_create, parse_user_edit};
use crate::config::CollectionSettings;
use crate::domain::{
    canonical_path, Collection, CollectionFilter, Entity, EntityCollection, ParentIds,
    RequestContext, Requestor, User, UserPatch, UserRepository,
};
use crate::shared::error::AppError;

pub struct UserCollection {
    users: Arc<dyn UserRepository>,
    paging: CollectionSettings,
}

impl UserCollection {
    pub const REST_NAME: &'static str = "users";

    pub fn new(users: Arc<dyn UserRepository>, paging: CollectionSettings) -> Self {
        Self { users, paging }
    }

    async fn find(&self, id: Uuid) -> Result<User, AppError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {} not found", id)))
    }
}

#[async_trait]
impl EntityCollection for UserCollection {
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
        if !matches!(ctx.requestor(), Requestor::System) {
            return Err(AppError::Forbidden("users cannot be created over HTTP".into()));
        }
        let request = parse_user_create(body)?;

        let user = User {
            id: Uuid::new_v4(),
            first_name: request.first_name,
            second_name: request.second_name,
            username: request.username,
            password_hash: hash_password(&request.password).await?,
            created_at: Utc::now(),
        };
        self.users.create(&user).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "User created");

        canonical_path(self, parents, user.id)
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
        let page = self.users.list(filter, window).await?;
        Ok(page.into())
    }

    async fn edit(&self, ctx: &RequestContext, id: Uuid, body: &[u8]) -> Result<(), AppError> {
        let user = self.find(id).await?;
        if !ctx.requestor().may_act_for(user.id) {
            return Err(AppError::Forbidden("users may only edit themselves".into()));
        }
        let edit = parse_user_edit(body)?;

        let password_hash = match edit.password {
            Some(password) => Some(hash_password(&password).await?),
            None => None,
        };
        let patch = UserPatch {
            first_name: edit.first_name,
            second_name: edit.second_name,
            password_hash,
        };
        if patch.is_empty() {
            return Ok(());
        }

        if !self.users.update(id, &patch).await? {
            return Err(AppError::NotFound(format!("user {} not found", id)));
        }
        tracing::info!(user_id = %id, "User updated");
        Ok(())
    }

    async fn delete(&self, _ctx: &RequestContext, _id: Uuid) -> Result<(), AppError> {
        Err(AppError::MethodNotAllowed("users cannot be deleted".into()))
    }
}
