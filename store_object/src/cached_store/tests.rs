//! Cached store tests

#[cfg(test)]
mod tests {
    use crate::cached_store::{CacheStatus, CachedStore};
    use crate::memory_store::MemoryStore;
    use crate::query::{ListQuery, PageRequest, SortOrder};
    use crate::test_support::{Critter, CritterDraft};
    use crate::traits::{DraftOf, StoreObject};
    use crate::StoreError;
    use async_trait::async_trait;
    use cache_system::{CacheBackend, CacheConfig, CacheManager, CacheParams, MemoryBackend};
    use std::sync::Arc;
    use std::time::Duration;

    const ITEM_1: &str = "bestiary:v1:critters:item:1";
    const FIRST_PAGE: &str = "bestiary:v1:critters:list:limit=10&page=1";

    fn cache_over(backend: &Arc<MemoryBackend>) -> CacheParams {
        let manager = CacheManager::with_backend(CacheConfig::default(), backend.clone());
        CacheParams::new(Arc::new(manager))
    }

    fn cached_store() -> (CachedStore<MemoryStore<Critter>>, Arc<MemoryBackend>) {
        let backend = Arc::new(MemoryBackend::new());
        let store = CachedStore::new(MemoryStore::new()).with_cache(cache_over(&backend));
        (store, backend)
    }

    async fn seed(store: &CachedStore<MemoryStore<Critter>>, count: usize) {
        for i in 0..count {
            let kind = if i % 2 == 0 { "bird" } else { "mammal" };
            store
                .backing()
                .create(CritterDraft::new(&format!("critter-{}", i + 1), kind, 2))
                .await
                .unwrap();
        }
    }

    /// Backing store that answers after a fixed delay
    #[derive(Debug, Clone)]
    struct SlowStore {
        inner: MemoryStore<Critter>,
        delay: Duration,
    }

    #[async_trait]
    impl StoreObject for SlowStore {
        type Model = Critter;

        async fn get_by_id(&self, id: i64) -> Result<Option<Critter>, StoreError> {
            tokio::time::sleep(self.delay).await;
            self.inner.get_by_id(id).await
        }

        async fn find_page(
            &self,
            request: &PageRequest,
        ) -> Result<(Vec<Critter>, u64), StoreError> {
            tokio::time::sleep(self.delay).await;
            self.inner.find_page(request).await
        }

        async fn create(&self, draft: DraftOf<Self>) -> Result<Critter, StoreError> {
            self.inner.create(draft).await
        }

        async fn update(&self, id: i64, draft: DraftOf<Self>) -> Result<Critter, StoreError> {
            self.inner.update(id, draft).await
        }

        async fn delete(&self, id: i64) -> Result<bool, StoreError> {
            self.inner.delete(id).await
        }

        async fn count(&self) -> Result<u64, StoreError> {
            self.inner.count().await
        }
    }

    // ========================================
    // Single-record reads
    // ========================================

    #[tokio::test]
    async fn test_get_by_id_miss_then_hit() {
        let (store, backend) = cached_store();
        seed(&store, 1).await;

        let first = store.get_by_id(1).await.unwrap();
        assert_eq!(first.cache_status, CacheStatus::Miss);
        assert!(first.pagination.is_none());
        assert!(backend.contains_key(ITEM_1));

        let second = store.get_by_id(1).await.unwrap();
        assert_eq!(second.cache_status, CacheStatus::Hit);
        assert_eq!(second.data, first.data);
        assert_eq!(store.backing().read_count(), 1);
    }

    #[tokio::test]
    async fn test_get_missing_id_is_not_found_and_not_cached() {
        let (store, backend) = cached_store();

        let err = store.get_by_id(42).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { id: 42, .. }));
        assert!(backend.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_id_touches_neither_cache_nor_store() {
        let (store, backend) = cached_store();
        backend.set_offline(true);

        for id in [0, -7] {
            let err = store.get_by_id(id).await.unwrap_err();
            assert!(matches!(err, StoreError::InvalidParameters(_)));
        }
        assert_eq!(store.backing().read_count(), 0);
    }

    #[tokio::test]
    async fn test_undecodable_entry_is_overwritten() {
        let (store, backend) = cached_store();
        seed(&store, 1).await;
        backend.set_ex(ITEM_1, "{not json", 60).await.unwrap();

        let first = store.get_by_id(1).await.unwrap();
        assert_eq!(first.cache_status, CacheStatus::Miss);

        let second = store.get_by_id(1).await.unwrap();
        assert_eq!(second.cache_status, CacheStatus::Hit);
        assert_eq!(second.data.name, "critter-1");
    }

    #[tokio::test]
    async fn test_unreachable_cache_falls_back_to_store() {
        let (store, backend) = cached_store();
        seed(&store, 3).await;
        backend.set_offline(true);

        let item = store.get_by_id(2).await.unwrap();
        assert_eq!(item.cache_status, CacheStatus::Disabled);
        assert_eq!(item.data.name, "critter-2");

        let page = store.list(&ListQuery::new()).await.unwrap();
        assert_eq!(page.cache_status, CacheStatus::Disabled);
        assert_eq!(page.data.len(), 3);

        backend.set_offline(false);
        assert!(backend.is_empty());
    }

    #[tokio::test]
    async fn test_store_without_cache_reports_disabled() {
        let store = CachedStore::new(MemoryStore::<Critter>::new());
        store
            .backing()
            .create(CritterDraft::new("wren", "bird", 2))
            .await
            .unwrap();

        assert!(!store.cache_enabled());
        for _ in 0..2 {
            let fetched = store.get_by_id(1).await.unwrap();
            assert_eq!(fetched.cache_status, CacheStatus::Disabled);
        }
        assert_eq!(store.backing().read_count(), 2);
        assert_eq!(store.invalidate_all().await, 0);
    }

    #[tokio::test]
    async fn test_slow_backing_store_times_out() {
        let slow = SlowStore {
            inner: MemoryStore::new(),
            delay: Duration::from_millis(500),
        };
        let store = CachedStore::new(slow).with_operation_timeout(Duration::from_millis(20));

        let err = store.get_by_id(1).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Timeout {
                operation: "get_by_id",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_fetched_serializes_status_in_lowercase() {
        let (store, _backend) = cached_store();
        seed(&store, 1).await;

        let item = serde_json::to_value(store.get_by_id(1).await.unwrap()).unwrap();
        assert_eq!(item["cache_status"], "miss");
        assert!(item.get("pagination").is_none());

        let page = serde_json::to_value(store.list(&ListQuery::new()).await.unwrap()).unwrap();
        assert_eq!(page["pagination"]["total_items"], 1);
        assert_eq!(page["data"][0]["name"], "critter-1");
    }

    // ========================================
    // Paginated reads
    // ========================================

    #[tokio::test]
    async fn test_list_caches_items_with_metadata() {
        let (store, backend) = cached_store();
        seed(&store, 25).await;

        let first = store.list(&ListQuery::new().page(1).limit(10)).await.unwrap();
        assert_eq!(first.cache_status, CacheStatus::Miss);
        assert!(backend.contains_key(FIRST_PAGE));

        let meta = first.pagination.unwrap();
        assert_eq!(meta.total_items, 25);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_next_page);
        assert!(!meta.has_previous_page);

        let second = store.list(&ListQuery::new().page(1).limit(10)).await.unwrap();
        assert_eq!(second.cache_status, CacheStatus::Hit);
        assert_eq!(second.data, first.data);
        assert_eq!(second.pagination, first.pagination);
        assert_eq!(store.backing().read_count(), 1);
    }

    #[tokio::test]
    async fn test_list_past_last_page_is_empty() {
        let (store, _backend) = cached_store();
        seed(&store, 5).await;

        let fetched = store.list(&ListQuery::new().page(4).limit(2)).await.unwrap();
        assert!(fetched.data.is_empty());
        let meta = fetched.pagination.unwrap();
        assert_eq!(meta.total_pages, 3);
        assert!(!meta.has_next_page);
        assert!(meta.has_previous_page);
    }

    #[tokio::test]
    async fn test_sorted_list_uses_readable_key() {
        let (store, backend) = cached_store();
        seed(&store, 3).await;

        let fetched = store
            .list(&ListQuery::new().sort_by("name", SortOrder::Desc))
            .await
            .unwrap();
        assert_eq!(fetched.data[0].name, "critter-3");
        assert!(backend.contains_key("bestiary:v1:critters:list:limit=10&order=desc&page=1&sort=name"));
    }

    #[tokio::test]
    async fn test_filtered_list_uses_hash_key() {
        let (store, backend) = cached_store();
        seed(&store, 4).await;

        let query = ListQuery::new().filter("kind", "mammal");
        let fetched = store.list(&query).await.unwrap();
        assert_eq!(fetched.data.len(), 2);

        let keys = backend.keys();
        assert_eq!(keys.len(), 1);
        assert!(keys[0].starts_with("bestiary:v1:critters:list:h:"));

        let again = store.list(&query).await.unwrap();
        assert_eq!(again.cache_status, CacheStatus::Hit);
    }

    #[tokio::test]
    async fn test_filter_value_with_separators_gets_its_own_entry() {
        let (store, backend) = cached_store();
        seed(&store, 1).await;

        let split = ListQuery::new().filter("kind", "bird").filter("legs", "2");
        let fetched = store.list(&split).await.unwrap();
        assert_eq!(fetched.data.len(), 1);
        assert_eq!(fetched.cache_status, CacheStatus::Miss);

        let packed = ListQuery::new().filter("kind", "bird&filter.legs=2");
        let fetched = store.list(&packed).await.unwrap();
        assert_eq!(fetched.cache_status, CacheStatus::Miss);
        assert!(fetched.data.is_empty());
        assert_eq!(fetched.pagination.unwrap().total_items, 0);

        assert_eq!(backend.keys().len(), 2);
        assert_eq!(store.backing().read_count(), 2);
    }

    #[tokio::test]
    async fn test_invalid_list_parameters_touch_nothing() {
        let (store, backend) = cached_store();

        let err = store
            .list(&ListQuery::new().sort_by("secret", SortOrder::Asc))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidParameters(_)));
        assert_eq!(store.backing().read_count(), 0);
        assert!(backend.is_empty());
    }

    // ========================================
    // Write invalidation
    // ========================================

    #[tokio::test]
    async fn test_update_invalidates_item_and_pages() {
        let (store, backend) = cached_store();
        seed(&store, 3).await;
        store.get_by_id(1).await.unwrap();
        store.list(&ListQuery::new()).await.unwrap();
        assert_eq!(backend.len(), 2);

        let updated = store
            .update(1, CritterDraft::new("kestrel", "bird", 2))
            .await
            .unwrap();
        assert_eq!(updated.name, "kestrel");
        assert!(backend.is_empty());

        let fetched = store.get_by_id(1).await.unwrap();
        assert_eq!(fetched.cache_status, CacheStatus::Miss);
        assert_eq!(fetched.data.name, "kestrel");
    }

    #[tokio::test]
    async fn test_create_invalidates_pages() {
        let (store, _backend) = cached_store();
        seed(&store, 2).await;
        store.list(&ListQuery::new()).await.unwrap();

        store
            .create(CritterDraft::new("newt", "amphibian", 4))
            .await
            .unwrap();

        let fetched = store.list(&ListQuery::new()).await.unwrap();
        assert_eq!(fetched.cache_status, CacheStatus::Miss);
        assert_eq!(fetched.pagination.unwrap().total_items, 3);
    }

    #[tokio::test]
    async fn test_delete_invalidates_and_removes() {
        let (store, backend) = cached_store();
        seed(&store, 2).await;
        store.get_by_id(2).await.unwrap();

        store.delete(2).await.unwrap();
        assert!(backend.is_empty());

        let err = store.get_by_id(2).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_failed_write_leaves_cache_untouched() {
        let (store, backend) = cached_store();
        seed(&store, 1).await;
        store.get_by_id(1).await.unwrap();
        store.list(&ListQuery::new()).await.unwrap();

        let err = store
            .update(99, CritterDraft::new("ghost", "none", 0))
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let err = store.delete(99).await.unwrap_err();
        assert!(err.is_not_found());

        assert!(backend.contains_key(ITEM_1));
        assert!(backend.contains_key(FIRST_PAGE));
    }

    #[tokio::test]
    async fn test_invalid_draft_is_rejected_before_the_store() {
        let (store, backend) = cached_store();
        seed(&store, 1).await;
        store.get_by_id(1).await.unwrap();

        let err = store
            .create(CritterDraft::new("  ", "bird", 2))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidParameters(_)));

        let err = store
            .update(1, CritterDraft::new("wren", "bird", -1))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidParameters(_)));

        assert_eq!(store.backing().count().await.unwrap(), 1);
        assert!(backend.contains_key(ITEM_1));
    }

    #[tokio::test]
    async fn test_write_succeeds_while_cache_is_down() {
        let (store, backend) = cached_store();
        backend.set_offline(true);

        let created = store
            .create(CritterDraft::new("stoat", "mammal", 4))
            .await
            .unwrap();
        assert_eq!(created.id, 1);
        store.delete(created.id).await.unwrap();
        assert_eq!(store.backing().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_invalidate_all_clears_entity_namespace() {
        let (store, backend) = cached_store();
        seed(&store, 3).await;
        store.get_by_id(1).await.unwrap();
        store.get_by_id(2).await.unwrap();
        store.list(&ListQuery::new()).await.unwrap();

        assert_eq!(store.invalidate_all().await, 3);
        assert!(backend.is_empty());
    }

    #[tokio::test]
    async fn test_key_version_bump_orphans_old_entries() {
        let backend = Arc::new(MemoryBackend::new());
        let backing = MemoryStore::<Critter>::new();
        backing
            .create(CritterDraft::new("wren", "bird", 2))
            .await
            .unwrap();

        let v1 = CachedStore::new(backing.clone()).with_cache(cache_over(&backend));
        let v2 = CachedStore::new(backing).with_cache(cache_over(&backend).with_key_version("v2"));

        assert_eq!(v1.get_by_id(1).await.unwrap().cache_status, CacheStatus::Miss);
        assert_eq!(v2.get_by_id(1).await.unwrap().cache_status, CacheStatus::Miss);
        assert_eq!(v2.get_by_id(1).await.unwrap().cache_status, CacheStatus::Hit);
        assert!(backend.contains_key("bestiary:v2:critters:item:1"));
    }
}
