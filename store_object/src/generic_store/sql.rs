//! SQL generation for `GenericStore`
//!
//! Identifiers come from `TableMetadata` or a validated `PageRequest` and are
//! checked again here before interpolation; values are always bound.

use crate::errors::StoreError;
use crate::query::PageRequest;
use crate::traits::{FieldValue, TableMetadata};
use crate::validation::ValidatedIdentifier;
use sqlx::postgres::PgArguments;
use sqlx::Arguments;

fn table<T: TableMetadata>() -> Result<ValidatedIdentifier, StoreError> {
    Ok(ValidatedIdentifier::new(T::table_name())?)
}

fn column(name: &str) -> Result<ValidatedIdentifier, StoreError> {
    Ok(ValidatedIdentifier::new(name)?)
}

pub(crate) fn select_by_id_sql<T: TableMetadata>() -> Result<String, StoreError> {
    Ok(format!("SELECT * FROM {} WHERE id = $1", table::<T>()?))
}

pub(crate) fn insert_sql<T: TableMetadata>() -> Result<String, StoreError> {
    let columns = T::columns()
        .iter()
        .map(|c| column(c).map(ValidatedIdentifier::into_string))
        .collect::<Result<Vec<_>, _>>()?;
    let placeholders = (1..=columns.len())
        .map(|i| format!("${}", i))
        .collect::<Vec<_>>();

    Ok(format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING *",
        table::<T>()?,
        columns.join(", "),
        placeholders.join(", ")
    ))
}

/// The id is bound after the writable columns
pub(crate) fn update_sql<T: TableMetadata>() -> Result<String, StoreError> {
    let assignments = T::columns()
        .iter()
        .enumerate()
        .map(|(i, c)| column(c).map(|c| format!("{} = ${}", c, i + 1)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(format!(
        "UPDATE {} SET {} WHERE id = ${} RETURNING *",
        table::<T>()?,
        assignments.join(", "),
        assignments.len() + 1
    ))
}

pub(crate) fn delete_sql<T: TableMetadata>() -> Result<String, StoreError> {
    Ok(format!("DELETE FROM {} WHERE id = $1", table::<T>()?))
}

pub(crate) fn count_sql<T: TableMetadata>() -> Result<String, StoreError> {
    Ok(format!("SELECT COUNT(*) FROM {}", table::<T>()?))
}

/// Statements for one page: the select binds filters then limit and offset,
/// the count binds filters only
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PageStatements {
    pub select: String,
    pub count: String,
    pub filter_values: Vec<FieldValue>,
}

pub(crate) fn page_sql<T: TableMetadata>(
    request: &PageRequest,
) -> Result<PageStatements, StoreError> {
    let table = table::<T>()?;

    let mut conditions = Vec::with_capacity(request.filters.len());
    let mut filter_values = Vec::with_capacity(request.filters.len());
    for (i, (field, value)) in request.filters.iter().enumerate() {
        // Compare as text so one bound type works for every column
        conditions.push(format!("CAST({} AS TEXT) = ${}", column(field)?, i + 1));
        filter_values.push(FieldValue::Text(value.clone()));
    }
    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    let order_clause = match &request.sort {
        Some(sort) if sort.field == "id" => format!("id {}", sort.order.to_sql()),
        Some(sort) => format!("{} {}, id ASC", column(&sort.field)?, sort.order.to_sql()),
        None => "id ASC".to_string(),
    };

    let limit_index = filter_values.len() + 1;
    Ok(PageStatements {
        select: format!(
            "SELECT * FROM {}{} ORDER BY {} LIMIT ${} OFFSET ${}",
            table,
            where_clause,
            order_clause,
            limit_index,
            limit_index + 1
        ),
        count: format!("SELECT COUNT(*) FROM {}{}", table, where_clause),
        filter_values,
    })
}

/// Bind values in order
pub(crate) fn arguments(values: &[FieldValue]) -> Result<PgArguments, StoreError> {
    let mut args = PgArguments::default();
    for value in values {
        let added = match value {
            FieldValue::Text(v) => args.add(v.clone()),
            FieldValue::Integer(v) => args.add(*v),
            FieldValue::BigInt(v) => args.add(*v),
            FieldValue::Timestamp(v) => args.add(*v),
        };
        added.map_err(|e| StoreError::Serialization(e.to_string()))?;
    }
    Ok(args)
}
