//! Raw key-value backend abstraction
//!
//! Backends store opaque strings under fully-qualified keys. Namespacing,
//! serialization and deadlines are handled one level up by `CacheManager`.

use crate::errors::CacheError;
use async_trait::async_trait;
use std::fmt::Debug;

/// Remote (or local) key-value store with per-entry TTL
#[async_trait]
pub trait CacheBackend: Send + Sync + Debug {
    /// Fetch a raw value, `None` when the key is absent or expired
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store a raw value that expires after `ttl_seconds`
    async fn set_ex(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), CacheError>;

    /// Delete one key, returning how many keys were removed (0 or 1)
    async fn delete(&self, key: &str) -> Result<u64, CacheError>;

    /// Delete every key matching a glob pattern (`*` wildcard) in one batch
    async fn delete_pattern(&self, pattern: &str) -> Result<u64, CacheError>;

    /// Check connectivity
    async fn ping(&self) -> Result<(), CacheError>;
}
