//! Request originator identity.

use serde::Serialize;
use uuid::Uuid;

/// Identity of an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserIdentity {
    pub id: Uuid,
    pub username: String,
}

/// Who a request is performed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requestor {
    /// A user authenticated by the auth middleware.
    User(UserIdentity),
    /// In-process caller such as startup seeding. Bypasses ownership checks.
    System,
}

impl Requestor {
    /// User id of the requestor, if it is a user.
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Requestor::User(identity) => Some(identity.id),
            Requestor::System => None,
        }
    }

    /// Whether this requestor may act on something owned by `owner`.
    pub fn may_act_for(&self, owner: Uuid) -> bool {
        match self {
            Requestor::User(identity) => identity.id == owner,
            Requestor::System => true,
        }
    }
}
