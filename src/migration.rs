//! Database migration functionality
//!
//! This module provides automatic table creation for table-backed models:
//! the table itself, its indexes and the trigger that keeps `updated_at`
//! current.

use crate::core::Bestiary;
use crate::errors::BestiaryError;
use crate::models::{Animal, Flower};
use store_object::TableMetadata;
use tracing::{debug, info};

const TRIGGER_FUNCTION_SQL: &str = r#"
CREATE OR REPLACE FUNCTION bestiary_set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = NOW();
    RETURN NEW;
END;
$$ language 'plpgsql';
"#;

/// Statements that bring the table for `T` up to date, in execution order
pub fn migration_statements<T: TableMetadata>(recreate: bool) -> Vec<String> {
    let table_name = T::table_name();
    let mut statements = Vec::new();

    if recreate {
        statements.push(T::drop_table_sql());
    }
    statements.push(T::create_table_sql());
    statements.push(TRIGGER_FUNCTION_SQL.to_string());

    // CREATE TRIGGER has no IF NOT EXISTS
    let trigger_sql = format!(
        "CREATE TRIGGER set_{table}_updated_at \
         BEFORE UPDATE ON {table} \
         FOR EACH ROW EXECUTE FUNCTION bestiary_set_updated_at()",
        table = table_name
    );
    statements.push(format!(
        "DO $$
         BEGIN
             IF NOT EXISTS (SELECT 1 FROM pg_trigger WHERE tgname = 'set_{}_updated_at') THEN
                 EXECUTE '{}';
             END IF;
         END $$",
        table_name, trigger_sql
    ));

    statements.extend(T::create_indexes_sql());
    statements
}

impl Bestiary {
    /// Automatically create table, trigger and indexes for a model
    /// If recreate is true, drops existing table first
    pub async fn auto_migrate<T: TableMetadata>(&self, recreate: bool) -> Result<(), BestiaryError> {
        let table = T::table_name();
        info!(table, recreate, "migrating table");

        for statement in migration_statements::<T>(recreate) {
            debug!(table, sql = %statement, "executing migration statement");
            sqlx::query(&statement)
                .execute(self.pool())
                .await
                .map_err(|source| BestiaryError::Migration { table, source })?;
        }

        Ok(())
    }

    /// Migrate every model this crate defines
    pub async fn migrate_all(&self, recreate: bool) -> Result<(), BestiaryError> {
        self.auto_migrate::<Animal>(recreate).await?;
        self.auto_migrate::<Flower>(recreate).await
    }
}
