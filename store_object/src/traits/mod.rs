//! Traits for database operations
//!
//! This module contains all the traits that define the interface for database operations
//! in the bestiary store layer.

pub mod core;
pub mod table_metadata;

// Re-export all public items for convenience
pub use core::{DraftOf, StoreObject};
pub use table_metadata::{FieldValue, TableMetadata};
