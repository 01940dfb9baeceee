//! Cache manager implementation
//!
//! This module provides the main CacheManager struct: typed, namespaced,
//! deadline-bounded access to a `CacheBackend`.

use crate::backend::CacheBackend;
use crate::errors::CacheError;
use crate::keys::KeyGenerator;
use crate::memory::MemoryBackend;
use crate::redis_backend::RedisBackend;
use config::CacheConfig;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;

/// Typed cache access over a shared backend
#[derive(Clone)]
pub struct CacheManager {
    backend: Arc<dyn CacheBackend>,
    config: Arc<CacheConfig>,
}

impl Debug for CacheManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheManager")
            .field("backend", &self.backend)
            .field("key_prefix", &self.config.key_prefix)
            .field("key_version", &self.config.key_version)
            .finish()
    }
}

impl CacheManager {
    /// Create a cache manager backed by Redis
    pub fn new(config: CacheConfig) -> Result<Self, CacheError> {
        let backend = RedisBackend::new(&config.redis_url, config.connection_timeout())?;
        Ok(Self::with_backend(config, Arc::new(backend)))
    }

    /// Create a cache manager over an arbitrary backend
    pub fn with_backend(config: CacheConfig, backend: Arc<dyn CacheBackend>) -> Self {
        Self {
            backend,
            config: Arc::new(config),
        }
    }

    /// Create a cache manager over a fresh in-memory backend
    pub fn in_memory(config: CacheConfig) -> Self {
        Self::with_backend(config, Arc::new(MemoryBackend::new()))
    }

    /// Apply the configured namespace prefix
    fn namespaced(&self, key: &str) -> String {
        if self.config.key_prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}:{}", self.config.key_prefix, key)
        }
    }

    /// Run a backend call under the configured operation deadline
    async fn bounded<T, F>(&self, call: F) -> Result<T, CacheError>
    where
        F: Future<Output = Result<T, CacheError>>,
    {
        tokio::time::timeout(self.config.timeout(), call)
            .await
            .map_err(|_| CacheError::Timeout)?
    }

    /// Read and decode a value.
    ///
    /// A missing key is reported as `CacheError::KeyNotFound` so callers can
    /// branch on a miss without confusing it with a backend failure.
    pub async fn get<T>(&self, key: &str) -> Result<T, CacheError>
    where
        T: DeserializeOwned,
    {
        let cache_key = self.namespaced(key);
        let cached = self.bounded(self.backend.get(&cache_key)).await?;

        match cached {
            Some(json_str) => Ok(serde_json::from_str(&json_str)?),
            None => Err(CacheError::KeyNotFound(key.to_string())),
        }
    }

    /// Encode and store a value, reporting any failure
    pub async fn try_set<T>(&self, key: &str, value: &T, ttl: u64) -> Result<(), CacheError>
    where
        T: Serialize + ?Sized,
    {
        if ttl == 0 {
            return Err(CacheError::InvalidTtl(ttl));
        }

        let cache_key = self.namespaced(key);
        let json_str = serde_json::to_string(value)?;
        self.bounded(self.backend.set_ex(&cache_key, &json_str, ttl))
            .await
    }

    /// Best-effort store: failures are logged and swallowed
    pub async fn set<T>(&self, key: &str, value: &T, ttl: u64)
    where
        T: Serialize + ?Sized,
    {
        if let Err(e) = self.try_set(key, value, ttl).await {
            tracing::warn!(key, error = %e, "cache write failed");
        }
    }

    /// Delete a single key, returning whether it existed
    pub async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        let cache_key = self.namespaced(key);
        let deleted = self.bounded(self.backend.delete(&cache_key)).await?;
        Ok(deleted > 0)
    }

    /// Delete every key matching a glob pattern; zero matches is fine
    pub async fn delete_pattern(&self, pattern: &str) -> Result<u64, CacheError> {
        let cache_pattern = self.namespaced(pattern);
        self.bounded(self.backend.delete_pattern(&cache_pattern))
            .await
    }

    /// Ping the backend to check connectivity
    pub async fn ping(&self) -> Result<(), CacheError> {
        self.bounded(self.backend.ping()).await
    }

    /// Key generator for the configured key version
    pub fn key_generator(&self) -> KeyGenerator {
        KeyGenerator::new(self.config.key_version.clone())
    }

    /// Get current configuration
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }
}
