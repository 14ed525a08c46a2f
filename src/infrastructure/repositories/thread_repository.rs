//! Thread Repository Implementation
//!
//! SQLite implementation of the ThreadRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::listing::{Column, Table};
use crate::domain::{
    CollectionFilter, Field, Page, PageWindow, Thread, ThreadPatch, ThreadRepository,
};
use crate::shared::error::AppError;

const THREADS: Table = Table {
    name: "threads",
    select: "id, title, author_id, created_at",
    columns: &[
        Column::new(Field::uuid("id"), "id"),
        Column::new(Field::text("title"), "title"),
        Column::new(Field::uuid("authorId"), "author_id"),
        Column::new(Field::timestamp("createdAt"), "created_at"),
    ],
};

#[derive(Debug, sqlx::FromRow)]
struct ThreadRow {
    id: Uuid,
    title: String,
    author_id: Uuid,
    created_at: DateTime<Utc>,
}

impl ThreadRow {
    fn into_thread(self) -> Thread {
        Thread {
            id: self.id,
            title: self.title,
            author_id: self.author_id,
            created_at: self.created_at,
        }
    }
}

#[derive(Clone)]
pub struct SqliteThreadRepository {
    pool: SqlitePool,
}

impl SqliteThreadRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ThreadRepository for SqliteThreadRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Thread>, AppError> {
        let row = sqlx::query_as::<_, ThreadRow>(
            "SELECT id, title, author_id, created_at FROM threads WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ThreadRow::into_thread))
    }

    async fn create(&self, thread: &Thread) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO threads (id, title, author_id, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(thread.id)
        .bind(&thread.title)
        .bind(thread.author_id)
        .bind(thread.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, id: Uuid, patch: &ThreadPatch) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE threads SET title = COALESCE(?, title) WHERE id = ?")
            .bind(patch.title.as_deref())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Messages of the thread go with it (ON DELETE CASCADE).
    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM threads WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(
        &self,
        filter: &CollectionFilter,
        window: PageWindow,
    ) -> Result<Page<Thread>, AppError> {
        let page = THREADS
            .list::<ThreadRow>(&self.pool, None, filter, window)
            .await?;
        Ok(page.map(ThreadRow::into_thread))
    }
}
