//! Generic store implementations
//!
//! This module provides the PostgreSQL implementation of `StoreObject`.

use super::core::GenericStore;
use super::sql;
use crate::errors::StoreError;
use crate::query::PageRequest;
use crate::traits::{DraftOf, FieldValue, StoreObject, TableMetadata};
use async_trait::async_trait;

#[async_trait]
impl<T> StoreObject for GenericStore<T>
where
    T: TableMetadata,
{
    type Model = T;

    async fn get_by_id(&self, id: i64) -> Result<Option<Self::Model>, StoreError> {
        let statement = sql::select_by_id_sql::<T>()?;
        sqlx::query_as::<_, T>(&statement)
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await
            .map_err(|e| StoreError::database(T::table_name(), "get_by_id", e))
    }

    async fn find_page(
        &self,
        request: &PageRequest,
    ) -> Result<(Vec<Self::Model>, u64), StoreError> {
        let statements = sql::page_sql::<T>(request)?;

        let total: i64 = sqlx::query_scalar_with::<_, i64, _>(
            &statements.count,
            sql::arguments(&statements.filter_values)?,
        )
        .fetch_one(&self.db_pool)
        .await
        .map_err(|e| StoreError::database(T::table_name(), "count_page", e))?;

        let mut values = statements.filter_values;
        values.push(FieldValue::BigInt(i64::from(request.limit)));
        values.push(FieldValue::BigInt(
            i64::try_from(request.offset()).unwrap_or(i64::MAX),
        ));

        let rows = sqlx::query_as_with::<_, T, _>(&statements.select, sql::arguments(&values)?)
            .fetch_all(&self.db_pool)
            .await
            .map_err(|e| StoreError::database(T::table_name(), "find_page", e))?;

        Ok((rows, u64::try_from(total).unwrap_or_default()))
    }

    async fn create(&self, draft: DraftOf<Self>) -> Result<Self::Model, StoreError> {
        let statement = sql::insert_sql::<T>()?;
        let args = sql::arguments(&T::draft_values(&draft))?;

        sqlx::query_as_with::<_, T, _>(&statement, args)
            .fetch_one(&self.db_pool)
            .await
            .map_err(|e| StoreError::database(T::table_name(), "create", e))
    }

    async fn update(&self, id: i64, draft: DraftOf<Self>) -> Result<Self::Model, StoreError> {
        let statement = sql::update_sql::<T>()?;
        let mut values = T::draft_values(&draft);
        values.push(FieldValue::BigInt(id));

        sqlx::query_as_with::<_, T, _>(&statement, sql::arguments(&values)?)
            .fetch_optional(&self.db_pool)
            .await
            .map_err(|e| StoreError::database(T::table_name(), "update", e))?
            .ok_or(StoreError::NotFound {
                entity: T::table_name(),
                id,
            })
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let statement = sql::delete_sql::<T>()?;
        let result = sqlx::query(&statement)
            .bind(id)
            .execute(&self.db_pool)
            .await
            .map_err(|e| StoreError::database(T::table_name(), "delete", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let statement = sql::count_sql::<T>()?;
        let total: i64 = sqlx::query_scalar(&statement)
            .fetch_one(&self.db_pool)
            .await
            .map_err(|e| StoreError::database(T::table_name(), "count", e))?;

        Ok(u64::try_from(total).unwrap_or_default())
    }
}
