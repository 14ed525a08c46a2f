//! User Repository Implementation
//!
//! SQLite implementation of the UserRepository trait.
//! Maps between the `users` table and the domain User entity.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::listing::{conflict_on_unique, Column, Table};
use crate::domain::{CollectionFilter, Field, Page, PageWindow, User, UserPatch, UserRepository};
use crate::shared::error::AppError;

const USERS: Table = Table {
    name: "users",
    select: "id, first_name, second_name, username, password_hash, created_at",
    columns: &[
        Column::new(Field::uuid("id"), "id"),
        Column::new(Field::text("firstName"), "first_name"),
        Column::new(Field::text("secondName"), "second_name"),
        Column::new(Field::text("username"), "username"),
        Column::new(Field::timestamp("createdAt"), "created_at"),
    ],
};

/// Database row representation of the users table.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    first_name: String,
    second_name: String,
    username: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            id: self.id,
            first_name: self.first_name,
            second_name: self.second_name,
            username: self.username,
            password_hash: self.password_hash,
            created_at: self.created_at,
        }
    }
}

/// SQLite user repository implementation.
#[derive(Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, first_name, second_name, username, password_hash, created_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, first_name, second_name, username, password_hash, created_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn create(&self, user: &User) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, first_name, second_name, username, password_hash, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id)
        .bind(&user.first_name)
        .bind(&user.second_name)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(conflict_on_unique(format!(
            "username '{}' is already taken",
            user.username
        )))?;

        Ok(())
    }

    /// Columns the patch leaves out keep their stored value.
    async fn update(&self, id: Uuid, patch: &UserPatch) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET first_name = COALESCE(?, first_name),
                second_name = COALESCE(?, second_name),
                password_hash = COALESCE(?, password_hash)
            WHERE id = ?
            "#,
        )
        .bind(patch.first_name.as_deref())
        .bind(patch.second_name.as_deref())
        .bind(patch.password_hash.as_deref())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(
        &self,
        filter: &CollectionFilter,
        window: PageWindow,
    ) -> Result<Page<User>, AppError> {
        let page = USERS
            .list::<UserRow>(&self.pool, None, filter, window)
            .await?;
        Ok(page.map(UserRow::into_user))
    }
}
