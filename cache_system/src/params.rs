//! Cache parameter configuration
//!
//! This module defines the CacheParams struct
//! for configuring cache behavior and TTL settings per store.

use crate::keys::KeyGenerator;
use crate::CacheManager;
use std::sync::Arc;

/// Cache parameters for configuring cache behavior per store/entity
#[derive(Debug, Clone)]
pub struct CacheParams {
    /// The cache manager instance
    pub manager: Arc<CacheManager>,
    /// TTL for single records in seconds
    pub ttl: u64,
    /// TTL for paginated lists in seconds, kept shorter than `ttl`
    pub list_ttl: u64,
    /// Key generator for the active key version
    pub keys: KeyGenerator,
}

impl CacheParams {
    /// Parameters taken from the manager's configuration
    pub fn new(manager: Arc<CacheManager>) -> Self {
        let config = manager.config();
        Self {
            ttl: config.default_ttl,
            list_ttl: config.list_ttl,
            keys: manager.key_generator(),
            manager,
        }
    }

    /// Override the single-record TTL for this entity
    pub fn with_ttl(mut self, ttl: u64) -> Self {
        self.ttl = ttl;
        self
    }

    /// Override the list TTL for this entity
    pub fn with_list_ttl(mut self, list_ttl: u64) -> Self {
        self.list_ttl = list_ttl;
        self
    }

    /// Override the key version for this entity
    pub fn with_key_version(mut self, version: impl Into<String>) -> Self {
        self.keys = KeyGenerator::new(version);
        self
    }
}
