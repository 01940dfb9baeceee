//! Store Object - data access layer for Bestiary
//!
//! This crate provides the backing data-access trait, a PostgreSQL generic
//! store, an in-memory store, list/pagination parameters and the
//! cache-augmented repository that puts a look-aside cache in front of any
//! store.

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

pub mod cached_store;
pub mod errors;
pub mod generic_store;
pub mod memory_store;
pub mod prelude;
pub mod query;
pub mod traits;
pub mod validation;

#[cfg(test)]
mod test_support;

pub use cache_system::CacheParams;
pub use cached_store::{CacheStatus, CachedStore, Fetched};
pub use errors::StoreError;
pub use generic_store::GenericStore;
pub use memory_store::MemoryStore;
pub use query::{ListQuery, PageMeta, PageRequest, PaginationSettings, SortOrder, SortSpec};
pub use traits::{DraftOf, FieldValue, StoreObject, TableMetadata};
pub use validation::{ValidatedIdentifier, ValidationError};

use sqlx::PgPool;

pub type DbPool = PgPool;
