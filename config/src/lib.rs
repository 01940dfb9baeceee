//! # Configuration Management for Bestiary
//!
//! This crate provides centralized configuration structures for all Bestiary components,
//! including database, cache, and pagination settings.
//!
//! ## Quick Start
//!
//! ### Programmatic Configuration
//! ```rust
//! use config::{CacheConfig, DatabaseConfig, PaginationConfig};
//!
//! let db_config = DatabaseConfig::new(
//!     "localhost".to_string(), 5432, "bestiary".to_string(),
//!     "postgres".to_string(), "password".to_string(),
//!     1, 10, 30, 600, 3600,
//! );
//!
//! let cache_config = CacheConfig::new(
//!     "redis://localhost:6379".to_string(),
//!     "bestiary".to_string(),
//!     3600, 300,
//! );
//!
//! let pagination = PaginationConfig::new(1, 10, 100);
//! ```
//!
//! ### TOML File Configuration
//! ```toml
//! [database]
//! host = "localhost"
//! port = 5432
//! database = "bestiary"
//! username = "postgres"
//! password = "password"
//! min_connections = 1
//! max_connections = 10
//! connection_timeout_seconds = 30
//! idle_timeout_seconds = 600
//! max_lifetime_seconds = 3600
//! operation_timeout_ms = 5000
//!
//! [cache]
//! enabled = true
//! redis_url = "redis://localhost:6379"
//! key_prefix = "bestiary"
//! key_version = "v1"
//! default_ttl = 3600
//! list_ttl = 300
//! timeout_ms = 500
//! connection_timeout_ms = 3000
//!
//! [pagination]
//! default_page = 1
//! default_limit = 10
//! max_limit = 100
//! ```
//!
//! Load configuration:
//! ```rust,no_run
//! use config::AppConfig;
//!
//! // Load from BESTIARY_CONFIG or ./bestiary.toml
//! let config = AppConfig::load()?;
//!
//! // Or load from custom path
//! let config = AppConfig::from_file("config/production.toml")?;
//! # Ok::<(), config::ConfigError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{env, path::Path};
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "./bestiary.toml";
const CONFIG_PATH_ENV: &str = "BESTIARY_CONFIG";

/// Characters Redis `KEYS` treats as glob syntax; cache key parts must avoid them
const KEY_PATTERN_METACHARACTERS: &[char] = &['*', '?', '[', ']', '\\'];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Environment variable error: {0}")]
    Env(#[from] env::VarError),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    pub min_connections: u32,
    pub max_connections: u32,
    pub connection_timeout_seconds: u64,
    pub idle_timeout_seconds: u64,
    pub max_lifetime_seconds: u64,
    /// Deadline for a single backing-store call
    #[serde(default = "default_operation_timeout_ms")]
    pub operation_timeout_ms: u64,
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// When false no cache manager is built and every read reports `disabled`
    pub enabled: bool,
    pub redis_url: String,
    /// Namespace prepended to every key by the cache manager
    pub key_prefix: String,
    /// Generation marker embedded in every key; bump to orphan all entries
    pub key_version: String,
    /// TTL for single-item entries (seconds)
    pub default_ttl: u64,
    /// TTL for paginated list entries (seconds)
    pub list_ttl: u64,
    /// Deadline for a single cache call
    pub timeout_ms: u64,
    pub connection_timeout_ms: u64,
}

/// Pagination bounds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PaginationConfig {
    pub default_page: u32,
    pub default_limit: u32,
    pub max_limit: u32,
}

fn default_operation_timeout_ms() -> u64 {
    5000
}

impl AppConfig {
    /// Load configuration from the TOML file named by `BESTIARY_CONFIG` or the default path
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env file is fine; the variable may come from the real environment
        let _ = dotenvy::dotenv();

        if let Ok(config_path) = env::var(CONFIG_PATH_ENV) {
            Self::from_file(&config_path)
        } else if Path::new(DEFAULT_CONFIG_PATH).exists() {
            Self::from_file(DEFAULT_CONFIG_PATH)
        } else {
            Err(ConfigError::Invalid(format!(
                "Config path must be specified as {} or in {} file",
                CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH
            )))
        }
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.database.validate()?;
        self.cache.validate()?;
        self.pagination.validate()?;
        Ok(())
    }
}

impl DatabaseConfig {
    /// Create a new database configuration
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        host: String,
        port: u16,
        database: String,
        username: String,
        password: String,
        min_connections: u32,
        max_connections: u32,
        connection_timeout_seconds: u64,
        idle_timeout_seconds: u64,
        max_lifetime_seconds: u64,
    ) -> Self {
        Self {
            host,
            port,
            database,
            username,
            password,
            min_connections,
            max_connections,
            connection_timeout_seconds,
            idle_timeout_seconds,
            max_lifetime_seconds,
            operation_timeout_ms: default_operation_timeout_ms(),
        }
    }

    pub fn with_operation_timeout(mut self, timeout_ms: u64) -> Self {
        self.operation_timeout_ms = timeout_ms;
        self
    }

    /// Build connection string
    pub fn connection_string(&self) -> String {
        format!(
            "postgresql://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database
        )
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::Invalid(
                "Database host cannot be empty".to_string(),
            ));
        }
        if self.port == 0 {
            return Err(ConfigError::Invalid(
                "Database port cannot be zero".to_string(),
            ));
        }
        if self.database.is_empty() {
            return Err(ConfigError::Invalid(
                "Database name cannot be empty".to_string(),
            ));
        }
        if self.username.is_empty() {
            return Err(ConfigError::Invalid(
                "Database username cannot be empty".to_string(),
            ));
        }
        if self.min_connections == 0 {
            return Err(ConfigError::Invalid(
                "Database min_connections must be greater than 0".to_string(),
            ));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "Database max_connections must be greater than 0".to_string(),
            ));
        }
        if self.min_connections > self.max_connections {
            return Err(ConfigError::Invalid(
                "Database min_connections cannot be greater than max_connections".to_string(),
            ));
        }
        if self.connection_timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "Database connection_timeout_seconds must be greater than 0".to_string(),
            ));
        }
        if self.operation_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "Database operation_timeout_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl CacheConfig {
    /// Create a new cache configuration
    pub fn new(redis_url: String, key_prefix: String, default_ttl: u64, list_ttl: u64) -> Self {
        Self {
            redis_url,
            key_prefix,
            default_ttl,
            list_ttl,
            ..Self::default()
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn with_key_version(mut self, version: impl Into<String>) -> Self {
        self.key_version = version.into();
        self
    }

    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_connection_timeout(mut self, timeout_ms: u64) -> Self {
        self.connection_timeout_ms = timeout_ms;
        self
    }

    /// Get item TTL as Duration
    pub fn ttl_duration(&self) -> Duration {
        Duration::from_secs(self.default_ttl)
    }

    pub fn list_ttl_duration(&self) -> Duration {
        Duration::from_secs(self.list_ttl)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn connection_timeout(&self) -> Duration {
        Duration::from_millis(self.connection_timeout_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.enabled {
            return Ok(());
        }
        if self.redis_url.is_empty() {
            return Err(ConfigError::Invalid(
                "Redis URL cannot be empty".to_string(),
            ));
        }
        if self.key_version.is_empty() {
            return Err(ConfigError::Invalid(
                "Cache key_version cannot be empty".to_string(),
            ));
        }
        let key_parts = [
            ("key_prefix", &self.key_prefix),
            ("key_version", &self.key_version),
        ];
        for (name, value) in key_parts {
            if value.contains(KEY_PATTERN_METACHARACTERS) {
                return Err(ConfigError::Invalid(format!(
                    "Cache {} '{}' cannot contain any of {:?}",
                    name, value, KEY_PATTERN_METACHARACTERS
                )));
            }
        }
        if self.default_ttl == 0 {
            return Err(ConfigError::Invalid(
                "Cache default_ttl must be greater than 0".to_string(),
            ));
        }
        if self.list_ttl == 0 {
            return Err(ConfigError::Invalid(
                "Cache list_ttl must be greater than 0".to_string(),
            ));
        }
        if self.list_ttl > self.default_ttl {
            return Err(ConfigError::Invalid(
                "Cache list_ttl cannot be greater than default_ttl".to_string(),
            ));
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "Cache timeout_ms must be greater than 0".to_string(),
            ));
        }
        if self.connection_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "Cache connection_timeout_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            redis_url: "redis://localhost:6379".to_string(),
            key_prefix: "bestiary".to_string(),
            key_version: "v1".to_string(),
            default_ttl: 3600, // 1 hour
            list_ttl: 300,     // 5 minutes
            timeout_ms: 500,
            connection_timeout_ms: 3000,
        }
    }
}

impl PaginationConfig {
    /// Create a new pagination configuration
    pub fn new(default_page: u32, default_limit: u32, max_limit: u32) -> Self {
        Self {
            default_page,
            default_limit,
            max_limit,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_page == 0 {
            return Err(ConfigError::Invalid(
                "Pagination default_page must be greater than 0".to_string(),
            ));
        }
        if self.default_limit == 0 {
            return Err(ConfigError::Invalid(
                "Pagination default_limit must be greater than 0".to_string(),
            ));
        }
        if self.max_limit == 0 {
            return Err(ConfigError::Invalid(
                "Pagination max_limit must be greater than 0".to_string(),
            ));
        }
        if self.default_limit > self.max_limit {
            return Err(ConfigError::Invalid(
                "Pagination default_limit cannot be greater than max_limit".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_limit: 10,
            max_limit: 100,
        }
    }
}
