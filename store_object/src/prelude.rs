//! Convenience re-exports for common store-object usage

// Core traits
pub use crate::traits::{DraftOf, FieldValue, StoreObject, TableMetadata};

// Error types
pub use crate::errors::StoreError;

// Stores
pub use crate::cached_store::{CacheStatus, CachedStore, Fetched};
pub use crate::generic_store::GenericStore;
pub use crate::memory_store::MemoryStore;

// List parameters
pub use crate::query::{ListQuery, PageMeta, PageRequest, PaginationSettings, SortOrder};

// Cache params (re-exported from cache_system)
pub use crate::CacheParams;

// Common external dependencies that are frequently used
pub use async_trait::async_trait;
pub use serde::{Deserialize, Serialize};
pub use sqlx::{FromRow, PgPool};
