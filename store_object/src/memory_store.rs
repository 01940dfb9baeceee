//! In-memory implementation of `StoreObject`
//!
//! Mirrors `GenericStore` semantics (id assignment, timestamps, sorting,
//! equality filters, pagination) without a database. Reads are counted so
//! callers can tell whether a request reached the backing store.

use crate::errors::StoreError;
use crate::query::{PageRequest, SortOrder};
use crate::traits::{DraftOf, StoreObject, TableMetadata};
use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::{Arc, RwLock};

#[derive(Debug)]
struct MemoryState<T> {
    rows: BTreeMap<i64, T>,
    next_id: i64,
}

/// Store keeping every record in process memory
#[derive(Debug, Clone)]
pub struct MemoryStore<T: TableMetadata> {
    state: Arc<RwLock<MemoryState<T>>>,
    reads: Arc<AtomicUsize>,
}

impl<T: TableMetadata> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TableMetadata> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(MemoryState {
                rows: BTreeMap::new(),
                next_id: 1,
            })),
            reads: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of read calls (`get_by_id`, `find_page`) served so far
    pub fn read_count(&self) -> usize {
        self.reads.load(AtomicOrdering::SeqCst)
    }

    fn record_read(&self) {
        self.reads.fetch_add(1, AtomicOrdering::SeqCst);
    }

    fn poisoned<E>(_: E) -> StoreError {
        StoreError::Backend(format!("{} store lock poisoned", T::table_name()))
    }
}

fn compare<T: TableMetadata>(a: &T, b: &T, field: &str) -> Ordering {
    a.field_value(field)
        .partial_cmp(&b.field_value(field))
        .unwrap_or(Ordering::Equal)
}

#[async_trait]
impl<T: TableMetadata> StoreObject for MemoryStore<T> {
    type Model = T;

    async fn get_by_id(&self, id: i64) -> Result<Option<Self::Model>, StoreError> {
        self.record_read();
        let state = self.state.read().map_err(Self::poisoned)?;
        Ok(state.rows.get(&id).cloned())
    }

    async fn find_page(
        &self,
        request: &PageRequest,
    ) -> Result<(Vec<Self::Model>, u64), StoreError> {
        self.record_read();
        let state = self.state.read().map_err(Self::poisoned)?;

        let mut matching: Vec<&T> = state
            .rows
            .values()
            .filter(|row| {
                request.filters.iter().all(|(field, value)| {
                    row.field_value(field)
                        .is_some_and(|actual| actual.to_string() == *value)
                })
            })
            .collect();

        // Rows come out of the map in id order; a stable sort keeps id as tie-breaker
        if let Some(sort) = &request.sort {
            matching.sort_by(|a, b| {
                let ordering = compare(*a, *b, &sort.field);
                match sort.order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc if sort.field == "id" => ordering.reverse(),
                    SortOrder::Desc => ordering.reverse().then_with(|| a.id().cmp(&b.id())),
                }
            });
        }

        let total = matching.len() as u64;
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let page = matching
            .into_iter()
            .skip(offset)
            .take(request.limit as usize)
            .cloned()
            .collect();

        Ok((page, total))
    }

    async fn create(&self, draft: DraftOf<Self>) -> Result<Self::Model, StoreError> {
        let mut state = self.state.write().map_err(Self::poisoned)?;
        let id = state.next_id;
        state.next_id += 1;

        let now = Utc::now();
        let record = T::from_draft(id, &draft, now, now);
        state.rows.insert(id, record.clone());
        Ok(record)
    }

    async fn update(&self, id: i64, draft: DraftOf<Self>) -> Result<Self::Model, StoreError> {
        let mut state = self.state.write().map_err(Self::poisoned)?;
        let existing = state.rows.get(&id).ok_or(StoreError::NotFound {
            entity: T::table_name(),
            id,
        })?;

        let created_at = match existing.field_value("created_at") {
            Some(crate::traits::FieldValue::Timestamp(ts)) => ts,
            _ => Utc::now(),
        };
        let record = T::from_draft(id, &draft, created_at, Utc::now());
        state.rows.insert(id, record.clone());
        Ok(record)
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let mut state = self.state.write().map_err(Self::poisoned)?;
        Ok(state.rows.remove(&id).is_some())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let state = self.state.read().map_err(Self::poisoned)?;
        Ok(state.rows.len() as u64)
    }
}
