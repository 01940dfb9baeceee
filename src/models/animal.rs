use super::require_text;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use store_object::{FieldValue, StoreError, TableMetadata};

/// An animal record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Animal {
    pub id: i64,
    pub name: String,
    pub species: String,
    pub age: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Writable fields of an animal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalDraft {
    pub name: String,
    pub species: String,
    pub age: i32,
}

impl AnimalDraft {
    pub fn new(name: impl Into<String>, species: impl Into<String>, age: i32) -> Self {
        Self {
            name: name.into(),
            species: species.into(),
            age,
        }
    }
}

impl TableMetadata for Animal {
    type Draft = AnimalDraft;

    fn table_name() -> &'static str {
        "animals"
    }

    fn columns() -> &'static [&'static str] {
        &["name", "species", "age"]
    }

    fn draft_values(draft: &Self::Draft) -> Vec<FieldValue> {
        vec![
            FieldValue::Text(draft.name.clone()),
            FieldValue::Text(draft.species.clone()),
            FieldValue::Integer(draft.age),
        ]
    }

    fn validate_draft(draft: &Self::Draft) -> Result<(), StoreError> {
        require_text("animal", "name", &draft.name)?;
        require_text("animal", "species", &draft.species)?;
        if draft.age < 0 {
            return Err(StoreError::invalid(format!(
                "animal age cannot be negative, got {}",
                draft.age
            )));
        }
        Ok(())
    }

    fn sortable_fields() -> &'static [&'static str] {
        &["id", "name", "species", "age", "created_at", "updated_at"]
    }

    fn filterable_fields() -> &'static [&'static str] {
        &["name", "species", "age"]
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "id" => Some(FieldValue::BigInt(self.id)),
            "name" => Some(FieldValue::Text(self.name.clone())),
            "species" => Some(FieldValue::Text(self.species.clone())),
            "age" => Some(FieldValue::Integer(self.age)),
            "created_at" => Some(FieldValue::Timestamp(self.created_at)),
            "updated_at" => Some(FieldValue::Timestamp(self.updated_at)),
            _ => None,
        }
    }

    fn from_draft(
        id: i64,
        draft: &Self::Draft,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: draft.name.clone(),
            species: draft.species.clone(),
            age: draft.age,
            created_at,
            updated_at,
        }
    }

    fn create_table_sql() -> String {
        "CREATE TABLE IF NOT EXISTS animals (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            species VARCHAR(255) NOT NULL,
            age INTEGER NOT NULL CHECK (age >= 0),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )"
        .to_string()
    }

    fn create_indexes_sql() -> Vec<String> {
        vec![
            "CREATE INDEX IF NOT EXISTS idx_animals_species ON animals (species)".to_string(),
            "CREATE INDEX IF NOT EXISTS idx_animals_created_at ON animals (created_at)"
                .to_string(),
        ]
    }
}
