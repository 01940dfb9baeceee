//! Trait definitions
//!
//! This module describes how an entity maps onto a database table.

use crate::errors::StoreError;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt::{self, Debug};

/// A column value, used for binding parameters and for in-memory sorting/filtering
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i32),
    BigInt(i64),
    Timestamp(DateTime<Utc>),
}

impl PartialOrd for FieldValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => a.partial_cmp(b),
            (FieldValue::Integer(a), FieldValue::Integer(b)) => a.partial_cmp(b),
            (FieldValue::BigInt(a), FieldValue::BigInt(b)) => a.partial_cmp(b),
            (FieldValue::Timestamp(a), FieldValue::Timestamp(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(v) => f.write_str(v),
            FieldValue::Integer(v) => write!(f, "{}", v),
            FieldValue::BigInt(v) => write!(f, "{}", v),
            FieldValue::Timestamp(v) => write!(f, "{}", v.to_rfc3339()),
        }
    }
}

/// Metadata about a table-backed entity.
///
/// Implemented by hand for every model. Records always carry a `BIGSERIAL`
/// primary key named `id` plus `created_at`/`updated_at` timestamps managed
/// by the database; `Draft` holds the writable columns.
///
/// ```ignore
/// impl TableMetadata for Animal {
///     type Draft = AnimalDraft;
///
///     fn table_name() -> &'static str { "animals" }
///     fn columns() -> &'static [&'static str] { &["name", "species", "age"] }
///     // ...
/// }
/// ```
pub trait TableMetadata:
    Clone
    + Send
    + Sync
    + Debug
    + Serialize
    + DeserializeOwned
    + Unpin
    + for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow>
    + 'static
{
    /// Writable fields used by create and update
    type Draft: Clone + Send + Sync + Debug + 'static;

    /// The table name in the database; also the cache entity namespace
    fn table_name() -> &'static str;

    /// Writable columns, in the order `draft_values` yields them
    fn columns() -> &'static [&'static str];

    /// Values of the writable columns
    fn draft_values(draft: &Self::Draft) -> Vec<FieldValue>;

    /// Reject a draft before it reaches any store
    fn validate_draft(_draft: &Self::Draft) -> Result<(), StoreError> {
        Ok(())
    }

    /// Fields a list can be ordered by
    fn sortable_fields() -> &'static [&'static str] {
        &["id", "created_at", "updated_at"]
    }

    /// Fields a list can be filtered on by equality
    fn filterable_fields() -> &'static [&'static str] {
        &[]
    }

    /// Primary key of this record
    fn id(&self) -> i64;

    /// Read a named field, `None` for unknown names
    fn field_value(&self, field: &str) -> Option<FieldValue>;

    /// Build a record from a draft; used by stores that assign ids themselves
    fn from_draft(
        id: i64,
        draft: &Self::Draft,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self;

    /// CREATE TABLE statement
    fn create_table_sql() -> String;

    /// CREATE INDEX statements
    fn create_indexes_sql() -> Vec<String> {
        Vec::new()
    }

    /// DROP TABLE statement
    fn drop_table_sql() -> String {
        format!("DROP TABLE IF EXISTS {} CASCADE", Self::table_name())
    }
}
