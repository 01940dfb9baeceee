//! Domain models
//!
//! Each model implements `TableMetadata` by hand and has a draft type
//! carrying its writable fields.

pub mod animal;
pub mod flower;

pub use animal::{Animal, AnimalDraft};
pub use flower::{Flower, FlowerDraft};

use store_object::StoreError;

/// Longest accepted value for short text columns
pub const MAX_NAME_LENGTH: usize = 255;

/// Reject blank or overlong text for a required column
pub(crate) fn require_text(entity: &str, field: &str, value: &str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::invalid(format!("{} {} is required", entity, field)));
    }
    if value.chars().count() > MAX_NAME_LENGTH {
        return Err(StoreError::invalid(format!(
            "{} {} exceeds {} characters",
            entity, field, MAX_NAME_LENGTH
        )));
    }
    Ok(())
}
