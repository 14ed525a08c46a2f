//! Message entity and repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{Page, Record};
use crate::domain::{CollectionFilter, Field, FieldValue, PageWindow};
use crate::shared::error::AppError;

/// A message posted in a thread.
///
/// Maps to the `messages` table:
/// - id: BLOB PRIMARY KEY (UUID)
/// - thread_id: BLOB NOT NULL REFERENCES threads(id)
/// - author_id: BLOB NOT NULL
/// - content: TEXT NOT NULL
/// - created_at: TEXT NOT NULL
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,

    /// Thread the message belongs to
    pub thread_id: Uuid,

    pub author_id: Uuid,

    /// Message body (1-4000 characters)
    pub content: String,

    pub created_at: DateTime<Utc>,
}

impl Record for Message {
    const FIELDS: &'static [Field] = &[
        Field::uuid("id"),
        Field::uuid("threadId"),
        Field::uuid("authorId"),
        Field::text("content"),
        Field::timestamp("createdAt"),
    ];

    fn id(&self) -> Uuid {
        self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(FieldValue::Uuid(self.id)),
            "threadId" => Some(FieldValue::Uuid(self.thread_id)),
            "authorId" => Some(FieldValue::Uuid(self.author_id)),
            "content" => Some(FieldValue::Text(self.content.clone())),
            "createdAt" => Some(FieldValue::Timestamp(self.created_at)),
            _ => None,
        }
    }
}

/// Changes to a message; `None` leaves the stored value as it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessagePatch {
    pub content: Option<String>,
}

impl MessagePatch {
    pub fn is_empty(&self) -> bool {
        self.content.is_none()
    }

    pub fn apply(&self, message: &mut Message) {
        if let Some(content) = &self.content {
            message.content = content.clone();
        }
    }
}

/// Repository trait for Message data access operations.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Message>, AppError>;

    async fn create(&self, message: &Message) -> Result<(), AppError>;

    /// Apply `patch` in one step. Returns false if the message does not exist.
    async fn update(&self, id: Uuid, patch: &MessagePatch) -> Result<bool, AppError>;

    /// Delete a message. Returns false if it does not exist.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;

    /// Delete every message of a thread, returning how many were removed.
    async fn delete_by_thread(&self, thread_id: Uuid) -> Result<u64, AppError>;

    /// Messages of one thread matching `filter`, windowed.
    async fn list_by_thread(
        &self,
        thread_id: Uuid,
        filter: &CollectionFilter,
        window: PageWindow,
    ) -> Result<Page<Message>, AppError>;
}
