//! Core Bestiary functionality
//!
//! This module contains the main Bestiary struct: it owns the connection
//! pool and the shared cache manager and hands out cache-augmented stores.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::errors::BestiaryError;
use crate::models::{Animal, Flower};
use cache_system::{CacheManager, CacheParams};
use config::{AppConfig, CacheConfig, PaginationConfig};
use store_object::{CachedStore, GenericStore, PaginationSettings, TableMetadata};

/// Main Bestiary coordinator that manages the database pool and cache
pub struct Bestiary {
    pool: PgPool,
    cache: Option<Arc<CacheManager>>,
    config: AppConfig,
}

impl std::fmt::Debug for Bestiary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bestiary")
            .field("pool_size", &self.pool.size())
            .field("cache", &self.cache)
            .finish()
    }
}

impl Bestiary {
    /// Connect to PostgreSQL and, when enabled, set up the cache.
    ///
    /// An unreachable cache does not fail startup: the manager is kept and
    /// each cache operation degrades on its own.
    pub async fn new(config: AppConfig) -> Result<Self, BestiaryError> {
        config.validate()?;
        let db = &config.database;

        let mut pool_options = PgPoolOptions::new()
            .max_connections(db.max_connections)
            .min_connections(db.min_connections)
            .acquire_timeout(Duration::from_secs(db.connection_timeout_seconds))
            .idle_timeout(Duration::from_secs(db.idle_timeout_seconds));

        // Set max lifetime if specified
        if db.max_lifetime_seconds > 0 {
            pool_options = pool_options.max_lifetime(Duration::from_secs(db.max_lifetime_seconds));
        }

        let pool = pool_options.connect(&db.connection_string()).await?;
        info!(
            host = %db.host,
            database = %db.database,
            max_connections = db.max_connections,
            "connected to database"
        );

        let cache = Self::build_cache(&config.cache).await?;
        Ok(Self::from_parts(pool, cache, config))
    }

    async fn build_cache(config: &CacheConfig) -> Result<Option<Arc<CacheManager>>, BestiaryError> {
        if !config.enabled {
            info!("cache disabled, reads go straight to the database");
            return Ok(None);
        }

        let manager = CacheManager::new(config.clone())?;
        match manager.ping().await {
            Ok(()) => info!(redis_url = %config.redis_url, "cache connected"),
            Err(e) => warn!(
                redis_url = %config.redis_url,
                error = %e,
                "cache unreachable at startup, continuing with degraded caching"
            ),
        }
        Ok(Some(Arc::new(manager)))
    }

    /// Assemble from an existing pool and cache manager
    pub fn from_parts(pool: PgPool, cache: Option<Arc<CacheManager>>, config: AppConfig) -> Self {
        Self {
            pool,
            cache,
            config,
        }
    }

    /// Get database pool reference
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn cache_manager(&self) -> Option<&Arc<CacheManager>> {
        self.cache.as_ref()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Cache-augmented store for any table-backed model
    pub fn store<T: TableMetadata>(&self) -> CachedStore<GenericStore<T>> {
        let store = CachedStore::new(GenericStore::new(self.pool.clone()))
            .with_pagination(pagination_settings(&self.config.pagination))
            .with_operation_timeout(self.config.database.operation_timeout());

        match &self.cache {
            Some(manager) => store.with_cache(CacheParams::new(Arc::clone(manager))),
            None => store,
        }
    }

    pub fn animals(&self) -> CachedStore<GenericStore<Animal>> {
        self.store::<Animal>()
    }

    pub fn flowers(&self) -> CachedStore<GenericStore<Flower>> {
        self.store::<Flower>()
    }

    /// Check database connection health
    pub async fn health_check(&self) -> Result<(), BestiaryError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    /// Check cache connectivity; succeeds trivially when caching is disabled
    pub async fn cache_health(&self) -> Result<(), BestiaryError> {
        if let Some(manager) = &self.cache {
            manager.ping().await?;
        }
        Ok(())
    }
}

fn pagination_settings(config: &PaginationConfig) -> PaginationSettings {
    PaginationSettings::new(config.default_page, config.default_limit, config.max_limit)
}
