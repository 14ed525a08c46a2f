//! Message Repository Implementation
//!
//! SQLite implementation of message storage. Listings are always scoped to
//! one thread.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::listing::{Column, Table};
use crate::domain::{
    CollectionFilter, Field, Message, MessagePatch, MessageRepository, Page, PageWindow,
};
use crate::shared::error::AppError;

const MESSAGES: Table = Table {
    name: "messages",
    select: "id, thread_id, author_id, content, created_at",
    columns: &[
        Column::new(Field::uuid("id"), "id"),
        Column::new(Field::uuid("threadId"), "thread_id"),
        Column::new(Field::uuid("authorId"), "author_id"),
        Column::new(Field::text("content"), "content"),
        Column::new(Field::timestamp("createdAt"), "created_at"),
    ],
};

/// Internal row type for message queries.
#[derive(Debug, sqlx::FromRow)]
struct MessageRow {
    id: Uuid,
    thread_id: Uuid,
    author_id: Uuid,
    content: String,
    created_at: DateTime<Utc>,
}

impl MessageRow {
    fn into_message(self) -> Message {
        Message {
            id: self.id,
            thread_id: self.thread_id,
            author_id: self.author_id,
            content: self.content,
            created_at: self.created_at,
        }
    }
}

pub struct SqliteMessageRepository {
    pool: SqlitePool,
}

impl SqliteMessageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for SqliteMessageRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Message>, AppError> {
        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, thread_id, author_id, content, created_at
            FROM messages
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(MessageRow::into_message))
    }

    async fn create(&self, message: &Message) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, thread_id, author_id, content, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(message.id)
        .bind(message.thread_id)
        .bind(message.author_id)
        .bind(&message.content)
        .bind(message.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, id: Uuid, patch: &MessagePatch) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE messages SET content = COALESCE(?, content) WHERE id = ?")
            .bind(patch.content.as_deref())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM messages WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_thread(&self, thread_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM messages WHERE thread_id = ?")
            .bind(thread_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn list_by_thread(
        &self,
        thread_id: Uuid,
        filter: &CollectionFilter,
        window: PageWindow,
    ) -> Result<Page<Message>, AppError> {
        let page = MESSAGES
            .list::<MessageRow>(&self.pool, Some(("thread_id", thread_id)), filter, window)
            .await?;
        Ok(page.map(MessageRow::into_message))
    }
}
