//! User entity and repository trait.
//!
//! Maps to the `users` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{Page, Record};
use crate::domain::{CollectionFilter, Field, FieldValue, PageWindow, UserIdentity};
use crate::shared::error::AppError;

/// Represents a user account.
///
/// Maps to the `users` table:
/// - id: BLOB PRIMARY KEY (UUID)
/// - first_name: TEXT NOT NULL
/// - second_name: TEXT NOT NULL
/// - username: TEXT NOT NULL UNIQUE
/// - password_hash: TEXT NOT NULL
/// - created_at: TEXT NOT NULL
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// UUID (primary key)
    pub id: Uuid,

    pub first_name: String,

    pub second_name: String,

    /// Login name (unique)
    pub username: String,

    /// Argon2 password hash in PHC string format
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Identity attached to requests this user authenticates.
    pub fn identity(&self) -> UserIdentity {
        UserIdentity {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

impl Record for User {
    const FIELDS: &'static [Field] = &[
        Field::uuid("id"),
        Field::text("firstName"),
        Field::text("secondName"),
        Field::text("username"),
        Field::timestamp("createdAt"),
    ];

    fn id(&self) -> Uuid {
        self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(FieldValue::Uuid(self.id)),
            "firstName" => Some(FieldValue::Text(self.first_name.clone())),
            "secondName" => Some(FieldValue::Text(self.second_name.clone())),
            "username" => Some(FieldValue::Text(self.username.clone())),
            "createdAt" => Some(FieldValue::Timestamp(self.created_at)),
            _ => None,
        }
    }
}

/// Changes to a user; `None` leaves the stored value as it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub second_name: Option<String>,
    pub password_hash: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.second_name.is_none() && self.password_hash.is_none()
    }

    pub fn apply(&self, user: &mut User) {
        if let Some(first_name) = &self.first_name {
            user.first_name = first_name.clone();
        }
        if let Some(second_name) = &self.second_name {
            user.second_name = second_name.clone();
        }
        if let Some(password_hash) = &self.password_hash {
            user.password_hash = password_hash.clone();
        }
    }
}

/// Repository trait for User data access operations.
///
/// Implementations of this trait handle the actual storage interactions.
/// The trait is defined in the domain layer to maintain dependency inversion.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Find a user by username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Store a new user. Fails with `Conflict` if the username is taken.
    async fn create(&self, user: &User) -> Result<(), AppError>;

    /// Apply `patch` to a stored user in one step. Returns false if the
    /// user does not exist.
    async fn update(&self, id: Uuid, patch: &UserPatch) -> Result<bool, AppError>;

    /// Users matching `filter`, windowed.
    async fn list(&self, filter: &CollectionFilter, window: PageWindow)
        -> Result<Page<User>, AppError>;
}
