//! Authentication Service
//!
//! Password hashing and credential verification against stored users.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;

use crate::domain::{Authenticator, Credentials, Requestor, UserRepository};
use crate::shared::error::AppError;

/// Hash a password using Argon2id.
///
/// Argon2 is deliberately slow, so the work runs on the blocking pool.
pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
    })
    .await
    .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
}

/// Verify a password against its hash, on the blocking pool.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let password = password.to_owned();
    let hash = hash.to_owned();
    tokio::task::spawn_blocking(move || {
        let parsed_hash = PasswordHash::new(&hash)
            .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    })
    .await
    .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))?
}

/// Authenticates username/password credentials against the user repository.
pub struct PasswordAuthenticator {
    users: Arc<dyn UserRepository>,
}

impl PasswordAuthenticator {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl Authenticator for PasswordAuthenticator {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Requestor, AppError> {
        let rejected = || AppError::Unauthorized("incorrect username or password".into());

        let Some(user) = self.users.find_by_username(&credentials.username).await? else {
            tracing::debug!(username = %credentials.username, "authentication failed: unknown user");
            return Err(rejected());
        };

        if !verify_password(&credentials.password, &user.password_hash).await? {
            tracing::debug!(username = %credentials.username, "authentication failed: wrong password");
            return Err(rejected());
        }

        Ok(Requestor::User(user.identity()))
    }
}
