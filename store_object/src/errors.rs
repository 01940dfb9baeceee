use crate::validation::ValidationError;
use thiserror::Error;

/// Errors surfaced by stores.
///
/// Cache failures never appear here: the cached store absorbs them.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Database error during {operation} on {entity}: {source}")]
    Database {
        entity: &'static str,
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("Backing store error: {0}")]
    Backend(String),

    #[error("{operation} on {entity} timed out")]
    Timeout {
        entity: &'static str,
        operation: &'static str,
    },

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    pub fn database(entity: &'static str, operation: &'static str, source: sqlx::Error) -> Self {
        StoreError::Database {
            entity,
            operation,
            source,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        StoreError::InvalidParameters(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

impl From<ValidationError> for StoreError {
    fn from(err: ValidationError) -> Self {
        StoreError::InvalidParameters(err.to_string())
    }
}
