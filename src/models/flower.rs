use super::require_text;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use store_object::{FieldValue, StoreError, TableMetadata};

/// A flower record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Flower {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Writable fields of a flower
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowerDraft {
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub description: String,
}

impl FlowerDraft {
    pub fn new(
        name: impl Into<String>,
        color: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            description: description.into(),
        }
    }
}

impl TableMetadata for Flower {
    type Draft = FlowerDraft;

    fn table_name() -> &'static str {
        "flowers"
    }

    fn columns() -> &'static [&'static str] {
        &["name", "color", "description"]
    }

    fn draft_values(draft: &Self::Draft) -> Vec<FieldValue> {
        vec![
            FieldValue::Text(draft.name.clone()),
            FieldValue::Text(draft.color.clone()),
            FieldValue::Text(draft.description.clone()),
        ]
    }

    fn validate_draft(draft: &Self::Draft) -> Result<(), StoreError> {
        require_text("flower", "name", &draft.name)?;
        require_text("flower", "color", &draft.color)
    }

    fn sortable_fields() -> &'static [&'static str] {
        &["id", "name", "color", "created_at", "updated_at"]
    }

    fn filterable_fields() -> &'static [&'static str] {
        &["name", "color"]
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "id" => Some(FieldValue::BigInt(self.id)),
            "name" => Some(FieldValue::Text(self.name.clone())),
            "color" => Some(FieldValue::Text(self.color.clone())),
            "description" => Some(FieldValue::Text(self.description.clone())),
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
            color: draft.color.clone(),
            description: draft.description.clone(),
            created_at,
            updated_at,
        }
    }

    fn create_table_sql() -> String {
        "CREATE TABLE IF NOT EXISTS flowers (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            color VARCHAR(255) NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )"
        .to_string()
    }

    fn create_indexes_sql() -> Vec<String> {
        vec!["CREATE INDEX IF NOT EXISTS idx_flowers_color ON flowers (color)".to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_is_optional() {
        let draft: FlowerDraft = serde_json::from_str(r#"{"name":"Rose","color":"red"}"#).unwrap();
        assert_eq!(draft.description, "");
        assert!(Flower::validate_draft(&draft).is_ok());
    }

    #[test]
    fn rejects_missing_color() {
        let err = Flower::validate_draft(&FlowerDraft::new("Rose", "", "")).unwrap_err();
        assert!(err.to_string().contains("color"));
    }

    #[test]
    fn description_is_not_sortable() {
        assert!(!Flower::sortable_fields().contains(&"description"));
        assert_eq!(
            Flower::field_value(
                &Flower::from_draft(3, &FlowerDraft::new("Iris", "blue", "tall"), Utc::now(), Utc::now()),
                "description"
            ),
            Some(FieldValue::Text("tall".into()))
        );
    }
}
