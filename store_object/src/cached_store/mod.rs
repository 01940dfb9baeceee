//! Look-aside caching over a backing store
//!
//! `CachedStore` wraps any `StoreObject`: reads consult the cache first and
//! populate it on a miss, writes go to the backing store and then invalidate
//! the affected item key plus the entity's whole list namespace.
//!
//! The cache is advisory. Every cache failure is logged and absorbed; only
//! backing-store failures reach the caller.

use crate::errors::StoreError;
use crate::query::{ListQuery, PageMeta, PageRequest, PaginationSettings};
use crate::traits::{DraftOf, StoreObject, TableMetadata};
use cache_system::CacheParams;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

#[cfg(test)]
mod tests;

/// Default deadline for a single backing-store call
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Where a read was served from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStatus {
    Hit,
    Miss,
    /// Caching is off for this store, or the cache failed during this read
    Disabled,
}

/// Result of a read: the data plus informational cache metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fetched<T> {
    pub data: T,
    pub cache_status: CacheStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PageMeta>,
}

impl<T> Fetched<T> {
    fn new(data: T, cache_status: CacheStatus) -> Self {
        Self {
            data,
            cache_status,
            pagination: None,
        }
    }
}

/// A page and its metadata, cached together under one key
#[derive(Debug, Serialize, Deserialize)]
struct CachedPage<T> {
    items: Vec<T>,
    meta: PageMeta,
}

/// Cache location for one read
struct CacheSlot<'a> {
    cache: &'a CacheParams,
    key: String,
    ttl: u64,
}

/// Cache-augmented repository for one entity type
#[derive(Debug, Clone)]
pub struct CachedStore<S: StoreObject> {
    inner: S,
    cache: Option<CacheParams>,
    pagination: PaginationSettings,
    operation_timeout: Duration,
}

impl<S: StoreObject> CachedStore<S> {
    /// Wrap a backing store with caching disabled
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cache: None,
            pagination: PaginationSettings::default(),
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    /// Enable caching with the given parameters
    pub fn with_cache(mut self, cache: CacheParams) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_pagination(mut self, pagination: PaginationSettings) -> Self {
        self.pagination = pagination;
        self
    }

    /// Deadline applied to every backing-store call
    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache.is_some()
    }

    pub fn cache_params(&self) -> Option<&CacheParams> {
        self.cache.as_ref()
    }

    pub fn pagination(&self) -> &PaginationSettings {
        &self.pagination
    }

    /// The wrapped backing store
    pub fn backing(&self) -> &S {
        &self.inner
    }

    fn entity() -> &'static str {
        S::Model::table_name()
    }

    fn check_id(id: i64) -> Result<(), StoreError> {
        if id <= 0 {
            return Err(StoreError::invalid(format!(
                "{} id must be a positive integer, got {}",
                Self::entity(),
                id
            )));
        }
        Ok(())
    }

    /// Run a backing-store call under the operation deadline
    async fn bounded<V, F>(&self, operation: &'static str, call: F) -> Result<V, StoreError>
    where
        F: Future<Output = Result<V, StoreError>>,
    {
        tokio::time::timeout(self.operation_timeout, call)
            .await
            .map_err(|_| StoreError::Timeout {
                entity: Self::entity(),
                operation,
            })?
    }

    /// Check the cache, fall through to `fetch`, populate on a clean miss
    async fn read_through<V, F>(
        &self,
        slot: Option<CacheSlot<'_>>,
        fetch: F,
    ) -> Result<(V, CacheStatus), StoreError>
    where
        V: Serialize + DeserializeOwned,
        F: Future<Output = Result<V, StoreError>>,
    {
        let Some(slot) = slot else {
            return Ok((fetch.await?, CacheStatus::Disabled));
        };

        let status = match slot.cache.manager.get::<V>(&slot.key).await {
            Ok(value) => {
                crate::debug_log!(key = %slot.key, "cache hit");
                return Ok((value, CacheStatus::Hit));
            }
            Err(e) if e.is_miss() => CacheStatus::Miss,
            Err(e) if e.is_corrupt_entry() => {
                warn!(key = %slot.key, error = %e, "discarding undecodable cache entry");
                CacheStatus::Miss
            }
            Err(e) => {
                warn!(key = %slot.key, error = %e, "cache read failed, using backing store");
                CacheStatus::Disabled
            }
        };

        let value = fetch.await?;
        if status == CacheStatus::Miss {
            crate::debug_log!(key = %slot.key, ttl = slot.ttl, "cache miss, populating");
            slot.cache.manager.set(&slot.key, &value, slot.ttl).await;
        }
        Ok((value, status))
    }

    /// Fetch one record by id.
    ///
    /// A missing record is `StoreError::NotFound`; misses are not cached.
    pub async fn get_by_id(&self, id: i64) -> Result<Fetched<S::Model>, StoreError> {
        Self::check_id(id)?;

        let slot = self.cache.as_ref().map(|cache| CacheSlot {
            key: cache.keys.item_key(Self::entity(), id),
            ttl: cache.ttl,
            cache,
        });
        let fetch = async {
            self.bounded("get_by_id", self.inner.get_by_id(id))
                .await?
                .ok_or(StoreError::NotFound {
                    entity: Self::entity(),
                    id,
                })
        };

        let (record, status) = self.read_through(slot, fetch).await?;
        Ok(Fetched::new(record, status))
    }

    /// Fetch one page of records.
    ///
    /// Pages past the end come back empty with correct metadata.
    pub async fn list(&self, query: &ListQuery) -> Result<Fetched<Vec<S::Model>>, StoreError> {
        let request = query.resolve::<S::Model>(&self.pagination)?;

        let slot = self.cache.as_ref().map(|cache| CacheSlot {
            key: Self::list_key(cache, &request),
            ttl: cache.list_ttl,
            cache,
        });
        let fetch = async {
            let (items, total) = self
                .bounded("find_page", self.inner.find_page(&request))
                .await?;
            Ok::<_, StoreError>(CachedPage {
                items,
                meta: PageMeta::new(request.page, request.limit, total),
            })
        };

        let (page, status) = self.read_through(slot, fetch).await?;
        Ok(Fetched {
            data: page.items,
            cache_status: status,
            pagination: Some(page.meta),
        })
    }

    /// Plain lists get a readable key; filtered lists are hashed
    fn list_key(cache: &CacheParams, request: &PageRequest) -> String {
        if request.filters.is_empty() {
            cache.keys.list_key(
                Self::entity(),
                request.page,
                request.limit,
                request.sort.as_ref().map(|s| s.field.as_str()),
                request.sort.as_ref().map(|s| s.order.as_str()),
            )
        } else {
            cache.keys.hash_key(Self::entity(), request.cache_params())
        }
    }

    pub async fn create(&self, draft: DraftOf<S>) -> Result<S::Model, StoreError> {
        S::Model::validate_draft(&draft)?;
        let created = self.bounded("create", self.inner.create(draft)).await?;
        self.invalidate(created.id()).await;
        Ok(created)
    }

    pub async fn update(&self, id: i64, draft: DraftOf<S>) -> Result<S::Model, StoreError> {
        Self::check_id(id)?;
        S::Model::validate_draft(&draft)?;
        let updated = self.bounded("update", self.inner.update(id, draft)).await?;
        self.invalidate(id).await;
        Ok(updated)
    }

    /// Delete a record; deleting a missing id is `StoreError::NotFound`
    pub async fn delete(&self, id: i64) -> Result<(), StoreError> {
        Self::check_id(id)?;
        let removed = self.bounded("delete", self.inner.delete(id)).await?;
        if !removed {
            return Err(StoreError::NotFound {
                entity: Self::entity(),
                id,
            });
        }
        self.invalidate(id).await;
        Ok(())
    }

    /// Drop the item key and every cached page of this entity
    async fn invalidate(&self, id: i64) {
        let Some(cache) = &self.cache else {
            return;
        };
        let entity = Self::entity();

        let item_key = cache.keys.item_key(entity, id);
        if let Err(e) = cache.manager.delete(&item_key).await {
            warn!(entity, key = %item_key, error = %e, "cache invalidation failed");
        }

        let pattern = cache.keys.list_pattern(entity);
        match cache.manager.delete_pattern(&pattern).await {
            Ok(removed) => {
                tracing::debug!(entity, removed, "invalidated cached pages");
            }
            Err(e) => {
                warn!(entity, pattern = %pattern, error = %e, "cache invalidation failed");
            }
        }
    }

    /// Drop every cached entry of this entity, returning how many were removed
    pub async fn invalidate_all(&self) -> u64 {
        let Some(cache) = &self.cache else {
            return 0;
        };
        let pattern = cache.keys.entity_pattern(Self::entity());
        match cache.manager.delete_pattern(&pattern).await {
            Ok(removed) => removed,
            Err(e) => {
                warn!(entity = Self::entity(), error = %e, "cache invalidation failed");
                0
            }
        }
    }
}
