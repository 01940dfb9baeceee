//! Convenience re-exports for common Bestiary usage
//!
//! ```rust
//! use bestiary::prelude::*;
//! ```

// Core Bestiary components
pub use crate::core::Bestiary;
pub use crate::errors::BestiaryError;
pub use crate::models::{Animal, AnimalDraft, Flower, FlowerDraft};

// Re-export centralized config
pub use config::{AppConfig, CacheConfig, DatabaseConfig, PaginationConfig};

// Re-export commonly used store-object types for convenience
pub use store_object::prelude::*;

// Re-export cache system
pub use cache_system::prelude::*;

// Common external dependencies
pub use async_trait;
pub use sqlx;
pub use tokio;
