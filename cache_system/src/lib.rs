//! Cache system for look-aside caching
//!
//! This crate provides deterministic cache keys, a pluggable key-value
//! backend (Redis or in-memory) and a typed cache manager with
//! configurable parameters and error handling.

pub mod backend;
pub mod errors;
pub mod keys;
pub mod manager;
pub mod memory;
pub mod params;
pub mod prelude;
pub mod redis_backend;

// Re-export centralized config
pub use config::CacheConfig;

pub use backend::CacheBackend;
pub use errors::CacheError;
pub use keys::KeyGenerator;
pub use manager::CacheManager;
pub use memory::MemoryBackend;
pub use params::CacheParams;
pub use redis_backend::RedisBackend;
