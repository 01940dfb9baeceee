//! Error types for the Bestiary crate
//!
//! This module contains the errors returned while wiring up and migrating
//! Bestiary. Per-operation store errors stay `StoreError`.

use cache_system::CacheError;
use config::ConfigError;
use store_object::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BestiaryError {
    #[error("Database connection error: {0}")]
    DatabaseConnection(#[from] sqlx::Error),

    #[error("Migration of {table} failed: {source}")]
    Migration {
        table: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("Cache setup error: {0}")]
    CacheSetup(#[from] CacheError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to install tracing subscriber: {0}")]
    Telemetry(String),
}
