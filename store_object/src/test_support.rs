//! Fixture entity shared by the unit tests of this crate

use crate::errors::StoreError;
use crate::traits::{FieldValue, TableMetadata};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Critter {
    pub id: i64,
    pub name: String,
    pub kind: String,
    pub legs: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CritterDraft {
    pub name: String,
    pub kind: String,
    pub legs: i32,
}

impl CritterDraft {
    pub fn new(name: &str, kind: &str, legs: i32) -> Self {
        Self {
            name: name.to_string(),
            kind: kind.to_string(),
            legs,
        }
    }
}

impl TableMetadata for Critter {
    type Draft = CritterDraft;

    fn table_name() -> &'static str {
        "critters"
    }

    fn columns() -> &'static [&'static str] {
        &["name", "kind", "legs"]
    }

    fn draft_values(draft: &Self::Draft) -> Vec<FieldValue> {
        vec![
            FieldValue::Text(draft.name.clone()),
            FieldValue::Text(draft.kind.clone()),
            FieldValue::Integer(draft.legs),
        ]
    }

    fn validate_draft(draft: &Self::Draft) -> Result<(), StoreError> {
        if draft.name.trim().is_empty() {
            return Err(StoreError::invalid("critter name is required"));
        }
        if draft.legs < 0 {
            return Err(StoreError::invalid("legs cannot be negative"));
        }
        Ok(())
    }

    fn sortable_fields() -> &'static [&'static str] {
        &["id", "name", "legs", "created_at"]
    }

    fn filterable_fields() -> &'static [&'static str] {
        &["kind", "legs"]
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "id" => Some(FieldValue::BigInt(self.id)),
            "name" => Some(FieldValue::Text(self.name.clone())),
            "kind" => Some(FieldValue::Text(self.kind.clone())),
            "legs" => Some(FieldValue::Integer(self.legs)),
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
            kind: draft.kind.clone(),
            legs: draft.legs,
            created_at,
            updated_at,
        }
    }

    fn create_table_sql() -> String {
        "CREATE TABLE IF NOT EXISTS critters (\
         id BIGSERIAL PRIMARY KEY, \
         name VARCHAR(255) NOT NULL, \
         kind VARCHAR(255) NOT NULL, \
         legs INTEGER NOT NULL, \
         created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(), \
         updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW())"
            .to_string()
    }
}
