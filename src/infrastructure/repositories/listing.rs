//! Filtered, sorted and windowed SELECTs over SQLite.
//!
//! Filter fields are the camelCase names clients use; each table declares
//! which of them map to which column. Anything not declared is rejected
//! before a query is built, so only whitelisted identifiers reach the SQL.

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::domain::{CollectionFilter, Field, FieldValue, Page, PageWindow, SortOrder};
use crate::shared::error::AppError;

/// A filterable column.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    /// Field as serialized to clients
    pub field: Field,
    /// SQL column name
    pub name: &'static str,
}

impl Column {
    pub const fn new(field: Field, name: &'static str) -> Self {
        Self { field, name }
    }
}

/// Table a listing reads from.
pub struct Table {
    pub name: &'static str,
    /// Comma-separated column list of the SELECT
    pub select: &'static str,
    pub columns: &'static [Column],
}

#[derive(Debug)]
struct Condition {
    column: &'static str,
    operator: &'static str,
    literal: FieldValue,
}

impl Table {
    fn column(&self, field: &str) -> Result<&Column, AppError> {
        self.columns
            .iter()
            .find(|column| column.field.name == field)
            .ok_or_else(|| {
                AppError::BadRequest(format!("unknown field '{}' in collection filter", field))
            })
    }

    fn conditions(&self, filter: &CollectionFilter) -> Result<Vec<Condition>, AppError> {
        filter
            .properties
            .iter()
            .map(|property| {
                let column = self.column(&property.field)?;
                Ok(Condition {
                    column: column.name,
                    operator: property.comparator.sql_operator(),
                    literal: column.field.parse(&property.value)?,
                })
            })
            .collect()
    }

    fn order_by(&self, filter: &CollectionFilter) -> Result<String, AppError> {
        let mut terms = Vec::with_capacity(filter.sort.len() + 1);
        for key in &filter.sort {
            let column = self.column(&key.field)?;
            let direction = match key.order {
                SortOrder::Ascending => "ASC",
                SortOrder::Descending => "DESC",
            };
            terms.push(format!("{} {}", column.name, direction));
        }
        terms.push("rowid ASC".to_string());
        Ok(terms.join(", "))
    }

    /// Rows matching `filter`, optionally scoped to `scope` (`column = id`),
    /// with the size of the whole matching set.
    pub async fn list<R>(
        &self,
        pool: &SqlitePool,
        scope: Option<(&'static str, Uuid)>,
        filter: &CollectionFilter,
        window: PageWindow,
    ) -> Result<Page<R>, AppError>
    where
        R: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let conditions = self.conditions(filter)?;
        let order_by = self.order_by(filter)?;

        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM ");
        count.push(self.name);
        push_where(&mut count, scope, &conditions);
        let total = count.build_query_scalar::<i64>().fetch_one(pool).await?;

        let mut select = QueryBuilder::<Sqlite>::new("SELECT ");
        select.push(self.select).push(" FROM ").push(self.name);
        push_where(&mut select, scope, &conditions);
        select
            .push(" ORDER BY ")
            .push(order_by)
            .push(" LIMIT ")
            .push_bind(i64::try_from(window.limit).unwrap_or(i64::MAX))
            .push(" OFFSET ")
            .push_bind(i64::try_from(window.offset).unwrap_or(i64::MAX));
        let items = select.build_query_as::<R>().fetch_all(pool).await?;

        Ok(Page {
            total: u64::try_from(total).unwrap_or(0),
            items,
        })
    }
}

fn push_where(
    query: &mut QueryBuilder<'_, Sqlite>,
    scope: Option<(&'static str, Uuid)>,
    conditions: &[Condition],
) {
    let mut separator = " WHERE ";
    if let Some((column, id)) = scope {
        query.push(separator).push(column).push(" = ").push_bind(id);
        separator = " AND ";
    }
    for condition in conditions {
        query
            .push(separator)
            .push(condition.column)
            .push(" ")
            .push(condition.operator)
            .push(" ");
        match &condition.literal {
            FieldValue::Text(value) => query.push_bind(value.clone()),
            FieldValue::Uuid(value) => query.push_bind(*value),
            FieldValue::Timestamp(value) => query.push_bind(*value),
        };
        separator = " AND ";
    }
}

/// Map unique-constraint violations to `Conflict`.
pub fn conflict_on_unique(message: impl Into<String>) -> impl FnOnce(sqlx::Error) -> AppError {
    let message = message.into();
    move |e| match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => AppError::Conflict(message),
        _ => AppError::Database(e),
    }
}
