//! In-memory repositories.
//!
//! Each table is a `Vec` behind a `parking_lot::RwLock`, kept in insertion
//! order. Filters and sort keys address the typed fields a record declares,
//! so literals are read the same way the SQLite backend reads them.

use std::cmp::Ordering;

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::domain::{
    CollectionFilter, Comparator, Field, FieldValue, Message, MessagePatch, MessageRepository,
    Page, PageWindow, Record, Thread, ThreadPatch, ThreadRepository, User, UserPatch,
    UserRepository,
};
use crate::shared::error::AppError;

/// A property filter with its literal read as the field's type.
#[derive(Debug)]
struct Condition {
    field: &'static str,
    comparator: Comparator,
    literal: FieldValue,
}

impl Condition {
    fn holds<T: Record>(&self, row: &T) -> bool {
        row.field(self.field)
            .is_some_and(|stored| self.comparator.holds(stored.cmp(&self.literal)))
    }
}

/// Check every referenced field against `T::FIELDS` and type the literals.
fn compile<T: Record>(filter: &CollectionFilter) -> Result<Vec<Condition>, AppError> {
    for key in &filter.sort {
        Field::lookup(T::FIELDS, &key.field)?;
    }
    filter
        .properties
        .iter()
        .map(|property| {
            let field = Field::lookup(T::FIELDS, &property.field)?;
            Ok(Condition {
                field: field.name,
                comparator: property.comparator,
                literal: field.parse(&property.value)?,
            })
        })
        .collect()
}

/// Insertion-ordered rows of one entity type.
pub struct MemoryTable<T> {
    rows: RwLock<Vec<T>>,
}

impl<T: Record> Default for MemoryTable<T> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }
}

impl<T: Record> MemoryTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find(&self, id: Uuid) -> Option<T> {
        self.find_by(|row| row.id() == id)
    }

    pub fn find_by(&self, predicate: impl Fn(&T) -> bool) -> Option<T> {
        self.rows.read().iter().find(|row| predicate(row)).cloned()
    }

    /// Append `row` unless an existing row satisfies `conflicts`.
    /// Check and insert happen under one write lock.
    pub fn insert_unless(&self, row: T, conflicts: impl Fn(&T) -> bool) -> bool {
        let mut rows = self.rows.write();
        if rows.iter().any(|existing| conflicts(existing)) {
            return false;
        }
        rows.push(row);
        true
    }

    pub fn insert(&self, row: T) {
        self.rows.write().push(row);
    }

    /// Change the row with `id` in place, under the write lock.
    pub fn modify(&self, id: Uuid, change: impl FnOnce(&mut T)) -> bool {
        let mut rows = self.rows.write();
        match rows.iter_mut().find(|row| row.id() == id) {
            Some(row) => {
                change(row);
                true
            }
            None => false,
        }
    }

    pub fn remove(&self, id: Uuid) -> bool {
        self.remove_where(|row| row.id() == id) > 0
    }

    pub fn remove_where(&self, predicate: impl Fn(&T) -> bool) -> u64 {
        let mut rows = self.rows.write();
        let before = rows.len();
        rows.retain(|row| !predicate(row));
        (before - rows.len()) as u64
    }

    /// Rows in `scope` matching `filter`, sorted and windowed. Ties keep
    /// insertion order.
    pub fn select(
        &self,
        scope: impl Fn(&T) -> bool,
        filter: &CollectionFilter,
        window: PageWindow,
    ) -> Result<Page<T>, AppError> {
        let conditions = compile::<T>(filter)?;

        let mut keyed: Vec<(T, Vec<Option<FieldValue>>)> = self
            .rows
            .read()
            .iter()
            .filter(|row| scope(row) && conditions.iter().all(|c| c.holds(*row)))
            .map(|row| {
                let keys = filter.sort.iter().map(|key| row.field(&key.field)).collect();
                (row.clone(), keys)
            })
            .collect();

        keyed.sort_by(|(_, a), (_, b)| {
            filter
                .sort
                .iter()
                .zip(a.iter().zip(b.iter()))
                .map(|(key, (a, b))| key.direct(a.cmp(b)))
                .find(|ordering| ordering.is_ne())
                .unwrap_or(Ordering::Equal)
        });

        let total = keyed.len() as u64;
        let (start, end) = window.bounds(keyed.len());
        let items = keyed
            .into_iter()
            .skip(start)
            .take(end - start)
            .map(|(row, _)| row)
            .collect();

        Ok(Page { total, items })
    }
}

#[derive(Default)]
pub struct MemoryUserRepository {
    table: MemoryTable<User>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.table.find(id))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self.table.find_by(|user| user.username == username))
    }

    async fn create(&self, user: &User) -> Result<(), AppError> {
        if !self
            .table
            .insert_unless(user.clone(), |existing| existing.username == user.username)
        {
            return Err(AppError::Conflict(format!(
                "username '{}' is already taken",
                user.username
            )));
        }
        Ok(())
    }

    async fn update(&self, id: Uuid, patch: &UserPatch) -> Result<bool, AppError> {
        Ok(self.table.modify(id, |user| patch.apply(user)))
    }

    async fn list(
        &self,
        filter: &CollectionFilter,
        window: PageWindow,
    ) -> Result<Page<User>, AppError> {
        self.table.select(|_| true, filter, window)
    }
}

#[derive(Default)]
pub struct MemoryThreadRepository {
    table: MemoryTable<Thread>,
}

impl MemoryThreadRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ThreadRepository for MemoryThreadRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Thread>, AppError> {
        Ok(self.table.find(id))
    }

    async fn create(&self, thread: &Thread) -> Result<(), AppError> {
        self.table.insert(thread.clone());
        Ok(())
    }

    async fn update(&self, id: Uuid, patch: &ThreadPatch) -> Result<bool, AppError> {
        Ok(self.table.modify(id, |thread| patch.apply(thread)))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.table.remove(id))
    }

    async fn list(
        &self,
        filter: &CollectionFilter,
        window: PageWindow,
    ) -> Result<Page<Thread>, AppError> {
        self.table.select(|_| true, filter, window)
    }
}

#[derive(Default)]
pub struct MemoryMessageRepository {
    table: MemoryTable<Message>,
}

impl MemoryMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageRepository for MemoryMessageRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Message>, AppError> {
        Ok(self.table.find(id))
    }

    async fn create(&self, message: &Message) -> Result<(), AppError> {
        self.table.insert(message.clone());
        Ok(())
    }

    async fn update(&self, id: Uuid, patch: &MessagePatch) -> Result<bool, AppError> {
        Ok(self.table.modify(id, |message| patch.apply(message)))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.table.remove(id))
    }

    async fn delete_by_thread(&self, thread_id: Uuid) -> Result<u64, AppError> {
        Ok(self.table.remove_where(|message| message.thread_id == thread_id))
    }

    async fn list_by_thread(
        &self,
        thread_id: Uuid,
        filter: &CollectionFilter,
        window: PageWindow,
    ) -> Result<Page<Message>, AppError> {
        self.table
            .select(|message| message.thread_id == thread_id, filter, window)
    }
}
