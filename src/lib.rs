//! # Bestiary
//!
//! Animal and flower records stored in PostgreSQL behind a look-aside Redis
//! cache. Reads check the cache first and fall back to the database; writes
//! go to the database and invalidate the affected cache entries.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bestiary::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     bestiary::telemetry::init_tracing("bestiary=info,store_object=info")?;
//!
//!     let config = AppConfig::load()?;
//!     let bestiary = Bestiary::new(config).await?;
//!     bestiary.migrate_all(false).await?;
//!
//!     let animals = bestiary.animals();
//!     let rex = animals.create(AnimalDraft::new("Rex", "dog", 4)).await?;
//!
//!     let fetched = animals.get_by_id(rex.id).await?;
//!     println!("{} ({:?})", fetched.data.name, fetched.cache_status);
//!
//!     let page = animals
//!         .list(&ListQuery::new().page(1).limit(10).sort_by("name", SortOrder::Asc))
//!         .await?;
//!     println!("{} animals", page.pagination.map_or(0, |p| p.total_items));
//!
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod errors;
pub mod migration;
pub mod models;
pub mod prelude;
pub mod telemetry;

// Re-export the main public types for convenience
pub use core::Bestiary;
pub use errors::BestiaryError;
pub use models::{Animal, AnimalDraft, Flower, FlowerDraft};

// Re-export centralized config
pub use config::{AppConfig, CacheConfig, DatabaseConfig, PaginationConfig};

// Re-export internal crates used by the public API
pub use cache_system;
pub use store_object;
