//! # Domain Entities
//!
//! The concrete resources served by the dispatcher, each mapping to a table.
//!
//! - **User**: Account with credentials; the identity behind a requestor
//! - **Thread**: A discussion thread
//! - **Message**: A message posted in a thread (nested under threads)
//!
//! ## Repository Traits
//!
//! Each entity has an associated repository trait defining data access operations.
//! These traits are implemented in the infrastructure layer, following the
//! dependency inversion principle.

mod user;
mod thread;
mod message;

use serde::Serialize;
use uuid::Uuid;

use crate::domain::{Field, FieldValue};

pub use user::{User, UserPatch, UserRepository};
pub use thread::{Thread, ThreadPatch, ThreadRepository};
pub use message::{Message, MessagePatch, MessageRepository};

/// A stored entity that can be listed with a collection filter.
pub trait Record: Clone + Send + Sync + 'static {
    /// Fields that sort keys and property filters may reference.
    const FIELDS: &'static [Field];

    fn id(&self) -> Uuid;

    /// Typed value of one of [`Record::FIELDS`].
    fn field(&self, name: &str) -> Option<FieldValue>;
}

/// One window of a filtered listing together with the size of the whole
/// matching set.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub total: u64,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            total: self.total,
            items: self.items.into_iter().map(f).collect(),
        }
    }
}

/// Any entity a collection can return.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Entity {
    User(User),
    Thread(Thread),
    Message(Message),
}

impl Entity {
    pub fn id(&self) -> Uuid {
        match self {
            Entity::User(user) => user.id,
            Entity::Thread(thread) => thread.id,
            Entity::Message(message) => message.id,
        }
    }
}

impl From<User> for Entity {
    fn from(user: User) -> Self {
        Entity::User(user)
    }
}

impl From<Thread> for Entity {
    fn from(thread: Thread) -> Self {
        Entity::Thread(thread)
    }
}

impl From<Message> for Entity {
    fn from(message: Message) -> Self {
        Entity::Message(message)
    }
}
