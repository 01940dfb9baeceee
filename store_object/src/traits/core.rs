//! Trait definitions
//!
//! This module defines the backing data-access interface.

use crate::query::PageRequest;
use crate::traits::table_metadata::TableMetadata;
use crate::StoreError;
use async_trait::async_trait;
use std::fmt::Debug;

/// Draft type of a store's model
pub type DraftOf<S> = <<S as StoreObject>::Model as TableMetadata>::Draft;

/// Canonical data access for one entity type.
///
/// Implementations report "no such row" as `Ok(None)` / `Ok(false)` /
/// `StoreError::NotFound` and every other failure as an error; they know
/// nothing about caching.
#[async_trait]
pub trait StoreObject: Clone + Send + Sync + Debug {
    /// The model type that this object represents
    type Model: TableMetadata;

    /// Get an object by its ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Self::Model>, StoreError>;

    /// One page of objects plus the total number of matching objects
    async fn find_page(
        &self,
        request: &PageRequest,
    ) -> Result<(Vec<Self::Model>, u64), StoreError>;

    /// Insert a new object, returning it with its assigned id and timestamps
    async fn create(&self, draft: DraftOf<Self>) -> Result<Self::Model, StoreError>;

    /// Replace the writable fields of an object; `NotFound` if it does not exist
    async fn update(&self, id: i64, draft: DraftOf<Self>) -> Result<Self::Model, StoreError>;

    /// Delete an object by its ID, returning whether a row was removed
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;

    /// Count total objects of this type
    async fn count(&self) -> Result<u64, StoreError>;
}
