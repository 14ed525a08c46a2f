//! Collection filter query language.
//!
//! Turns the query string of a collection request into paging, sort keys
//! and property comparisons:
//!
//! ```text
//! GET /threads?page=1&count=20&sort=asc.title,desc.createdAt&title=gteq.m
//! ```
//!
//! Parsing never fails. Malformed values are logged and the affected part of
//! the filter is left out, so a bad token never rejects the request.

use std::cmp::Ordering;

use axum::{extract::Query, http::Uri};

/// Direction of a sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// One `asc.<field>` / `desc.<field>` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub order: SortOrder,
}

impl SortKey {
    /// Apply this key's direction to an ascending comparison.
    pub fn direct(&self, ordering: Ordering) -> Ordering {
        match self.order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}

/// Comparison operator of a property filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    LessThan,
    LessOrEqual,
    Equal,
    GreaterThan,
    GreaterOrEqual,
}

impl Comparator {
    /// Value prefixes in the query string, paired with their comparator.
    const PREFIXES: [(&'static str, Comparator); 5] = [
        ("lt.", Comparator::LessThan),
        ("lteq.", Comparator::LessOrEqual),
        ("eq.", Comparator::Equal),
        ("gt.", Comparator::GreaterThan),
        ("gteq.", Comparator::GreaterOrEqual),
    ];

    /// Split a filter value such as `lteq.5` into its comparator and the
    /// literal that follows the prefix.
    pub fn split_prefix(value: &str) -> Option<(Comparator, &str)> {
        Self::PREFIXES
            .iter()
            .find_map(|(prefix, comparator)| value.strip_prefix(prefix).map(|rest| (*comparator, rest)))
    }

    /// Whether `stored <op> literal` holds, given `stored.cmp(literal)`.
    pub fn holds(&self, ordering: Ordering) -> bool {
        match self {
            Comparator::LessThan => ordering == Ordering::Less,
            Comparator::LessOrEqual => ordering != Ordering::Greater,
            Comparator::Equal => ordering == Ordering::Equal,
            Comparator::GreaterThan => ordering == Ordering::Greater,
            Comparator::GreaterOrEqual => ordering != Ordering::Less,
        }
    }

    /// SQL operator for this comparator.
    pub fn sql_operator(&self) -> &'static str {
        match self {
            Comparator::LessThan => "<",
            Comparator::LessOrEqual => "<=",
            Comparator::Equal => "=",
            Comparator::GreaterThan => ">",
            Comparator::GreaterOrEqual => ">=",
        }
    }
}

/// `<field>=<cmp>.<value>` comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyFilter {
    pub field: String,
    pub comparator: Comparator,
    pub value: String,
}

/// Offset/limit pair derived from `page` and `count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: u64,
    pub limit: u64,
}

impl PageWindow {
    /// Slice bounds of this window within `len` items.
    pub fn bounds(&self, len: usize) -> (usize, usize) {
        let start = usize::try_from(self.offset).unwrap_or(usize::MAX).min(len);
        let limit = usize::try_from(self.limit).unwrap_or(usize::MAX);
        (start, start.saturating_add(limit).min(len))
    }
}

/// Parsed paging, sort and property filters of a list request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionFilter {
    pub page: Option<u64>,
    pub count: Option<u64>,
    pub sort: Vec<SortKey>,
    pub properties: Vec<PropertyFilter>,
}

impl CollectionFilter {
    /// Parse the query string of `uri`.
    pub fn from_uri(uri: &Uri) -> Self {
        match Query::<Vec<(String, String)>>::try_from_uri(uri) {
            Ok(Query(pairs)) => Self::from_pairs(pairs),
            Err(e) => {
                tracing::warn!(error = %e, "failed to decode query string, ignoring filter");
                Self::default()
            }
        }
    }

    /// Parse decoded query parameters, in the order they appeared.
    ///
    /// `page`, `count` and `sort` are consumed first; every remaining
    /// parameter is read as a property filter.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut filter = Self::default();
        let mut page = None;
        let mut count = None;
        let mut sort = None;
        let mut rest = Vec::new();

        for (key, value) in pairs {
            let (key, value): (String, String) = (key.into(), value.into());
            if key == "page" {
                page.get_or_insert(value);
            } else if key == "count" {
                count.get_or_insert(value);
            } else if key == "sort" {
                sort.get_or_insert(value);
            } else {
                rest.push((key, value));
            }
        }

        filter.page = page.and_then(|v| parse_index("page", &v));
        filter.count = count.and_then(|v| parse_index("count", &v));
        if let Some(sort) = sort {
            filter.push_sort(&sort);
        }
        for (field, value) in rest {
            filter.push_property(field, &value);
        }

        filter
    }

    fn push_sort(&mut self, sort: &str) {
        for token in sort.split(',') {
            let key = if let Some(field) = token.strip_prefix("asc.") {
                (field, SortOrder::Ascending)
            } else if let Some(field) = token.strip_prefix("desc.") {
                (field, SortOrder::Descending)
            } else {
                tracing::warn!(token, "failed to parse 'sort' query parameter token");
                continue;
            };

            match key {
                ("", _) => tracing::warn!(token, "sort token names no field"),
                (field, order) => self.sort.push(SortKey {
                    field: field.to_string(),
                    order,
                }),
            }
        }
    }

    fn push_property(&mut self, field: String, value: &str) {
        match Comparator::split_prefix(value) {
            Some((comparator, literal)) => self.properties.push(PropertyFilter {
                field,
                comparator,
                value: literal.to_string(),
            }),
            None => {
                tracing::warn!(field = %field, value, "failed to parse filter query parameter");
            }
        }
    }

    /// Window selected by `page`/`count`, falling back to page 0 and
    /// `default_count`, with the size capped at `max_count`.
    pub fn window(&self, default_count: u64, max_count: u64) -> PageWindow {
        let limit = self.count.unwrap_or(default_count).min(max_count);
        let offset = self.page.unwrap_or(0).saturating_mul(limit);
        PageWindow { offset, limit }
    }

    /// Every field name referenced by a sort key or property filter.
    pub fn referenced_fields(&self) -> impl Iterator<Item = &str> {
        self.sort
            .iter()
            .map(|k| k.field.as_str())
            .chain(self.properties.iter().map(|p| p.field.as_str()))
    }
}

fn parse_index(name: &str, value: &str) -> Option<u64> {
    match value.parse::<u64>() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(parameter = name, value, "failed to parse query parameter as a non-negative integer");
            None
        }
    }
}
