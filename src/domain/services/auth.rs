//! Authentication contract.

use async_trait::async_trait;

use crate::domain::Requestor;
use crate::shared::error::AppError;

/// Username/password pair presented by a caller.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Resolves presented credentials to a requestor.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Fails with `Unauthorized` for unknown users or wrong passwords.
    async fn authenticate(&self, credentials: &Credentials) -> Result<Requestor, AppError>;
}
