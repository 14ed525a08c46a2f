//! Thread entity and repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{Page, Record};
use crate::domain::{CollectionFilter, Field, FieldValue, PageWindow};
use crate::shared::error::AppError;

/// A discussion thread.
///
/// Maps to the `threads` table:
/// - id: BLOB PRIMARY KEY (UUID)
/// - title: TEXT NOT NULL
/// - author_id: BLOB NOT NULL
/// - created_at: TEXT NOT NULL
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    pub id: Uuid,

    /// Thread title (1-200 characters)
    pub title: String,

    /// User who opened the thread
    pub author_id: Uuid,

    pub created_at: DateTime<Utc>,
}

impl Record for Thread {
    const FIELDS: &'static [Field] = &[
        Field::uuid("id"),
        Field::text("title"),
        Field::uuid("authorId"),
        Field::timestamp("createdAt"),
    ];

    fn id(&self) -> Uuid {
        self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(FieldValue::Uuid(self.id)),
            "title" => Some(FieldValue::Text(self.title.clone())),
            "authorId" => Some(FieldValue::Uuid(self.author_id)),
            "createdAt" => Some(FieldValue::Timestamp(self.created_at)),
            _ => None,
        }
    }
}

/// Changes to a thread; `None` leaves the stored value as it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThreadPatch {
    pub title: Option<String>,
}

impl ThreadPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
    }

    pub fn apply(&self, thread: &mut Thread) {
        if let Some(title) = &self.title {
            thread.title = title.clone();
        }
    }
}

/// Repository trait for Thread data access operations.
#[async_trait]
pub trait ThreadRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Thread>, AppError>;

    async fn create(&self, thread: &Thread) -> Result<(), AppError>;

    /// Apply `patch` in one step. Returns false if the thread does not exist.
    async fn update(&self, id: Uuid, patch: &ThreadPatch) -> Result<bool, AppError>;

    /// Delete a thread. Returns false if it does not exist.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;

    async fn list(&self, filter: &CollectionFilter, window: PageWindow)
        -> Result<Page<Thread>, AppError>;
}
