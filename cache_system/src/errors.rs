//! Error types for cache operations
//!
//! This module defines all error types that can occur
//! during cache operations and backend interactions.

use thiserror::Error;

/// Cache system errors
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Redis connection error: {0}")]
    ConnectionError(#[from] redis::RedisError),

    #[error("Cache backend unavailable: {0}")]
    Connection(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Cache operation timeout")]
    Timeout,

    #[error("Invalid TTL value: {0}")]
    InvalidTtl(u64),

    #[error("General cache error: {0}")]
    General(String),
}

impl CacheError {
    /// A plain miss, as opposed to a degraded backend
    pub fn is_miss(&self) -> bool {
        matches!(self, CacheError::KeyNotFound(_))
    }

    /// The stored payload could not be decoded; overwriting it is safe
    pub fn is_corrupt_entry(&self) -> bool {
        matches!(self, CacheError::SerializationError(_))
    }
}
