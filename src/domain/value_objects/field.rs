//! Typed entity fields.
//!
//! Filter literals arrive as strings; each field declares how its literals
//! are read so that every storage backend compares the same typed values.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::shared::error::AppError;

/// How values of a field are typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Uuid,
    Timestamp,
}

/// A field clients may sort and filter on, by its serialized name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl Field {
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
        }
    }

    pub const fn uuid(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Uuid,
        }
    }

    pub const fn timestamp(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Timestamp,
        }
    }

    /// Find `name` among `fields`; unknown names are a client error.
    pub fn lookup<'a>(fields: &'a [Field], name: &str) -> Result<&'a Field, AppError> {
        fields.iter().find(|field| field.name == name).ok_or_else(|| {
            AppError::BadRequest(format!("unknown field '{}' in collection filter", name))
        })
    }

    /// Read a filter literal as a value of this field.
    pub fn parse(&self, literal: &str) -> Result<FieldValue, AppError> {
        match self.kind {
            FieldKind::Text => Ok(FieldValue::Text(literal.to_string())),
            FieldKind::Uuid => Uuid::parse_str(literal).map(FieldValue::Uuid).map_err(|_| {
                AppError::BadRequest(format!(
                    "'{}' is not a valid ID for field '{}'",
                    literal, self.name
                ))
            }),
            FieldKind::Timestamp => DateTime::parse_from_rfc3339(literal)
                .map(|t| FieldValue::Timestamp(t.with_timezone(&Utc)))
                .map_err(|_| {
                    AppError::BadRequest(format!(
                        "'{}' is not an RFC 3339 timestamp for field '{}'",
                        literal, self.name
                    ))
                }),
        }
    }
}

/// A typed field value. Values of the same kind order naturally:
/// text lexically, timestamps chronologically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum FieldValue {
    Text(String),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
}
