//! Validation module
//!
//! SQL identifiers (table names, sort and filter columns) are interpolated
//! into generated statements, so every identifier passes through here first.

use std::fmt;
use thiserror::Error;

/// Reasons an identifier is refused
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("identifier '{0}' may only contain ASCII letters, digits and underscores")]
    InvalidCharacters(String),

    #[error("identifier '{name}' is {length} characters long (max {max_length})")]
    TooLong {
        name: String,
        length: usize,
        max_length: usize,
    },

    #[error("identifier is empty")]
    Empty,

    #[error("identifier '{0}' must start with a letter or underscore")]
    InvalidStartCharacter(String),

    #[error("identifier '{0}' is a reserved SQL keyword")]
    ReservedKeyword(String),
}

/// A validated identifier that is safe to interpolate into SQL
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidatedIdentifier(String);

impl ValidatedIdentifier {
    /// PostgreSQL identifier length limit
    const MAX_LENGTH: usize = 63;

    pub fn new(name: &str) -> Result<Self, ValidationError> {
        Self::validate_identifier(name)?;
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    fn validate_identifier(name: &str) -> Result<(), ValidationError> {
        let first_char = name.chars().next().ok_or(ValidationError::Empty)?;

        if name.len() > Self::MAX_LENGTH {
            return Err(ValidationError::TooLong {
                name: name.to_string(),
                length: name.len(),
                max_length: Self::MAX_LENGTH,
            });
        }

        if !first_char.is_ascii_alphabetic() && first_char != '_' {
            return Err(ValidationError::InvalidStartCharacter(name.to_string()));
        }

        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(ValidationError::InvalidCharacters(name.to_string()));
        }

        if Self::is_reserved_keyword(name) {
            return Err(ValidationError::ReservedKeyword(name.to_string()));
        }

        Ok(())
    }

    fn is_reserved_keyword(name: &str) -> bool {
        const RESERVED_KEYWORDS: &[&str] = &[
            "SELECT", "INSERT", "UPDATE", "DELETE", "FROM", "WHERE", "JOIN", "ON", "AS", "AND",
            "OR", "NOT", "NULL", "TRUE", "FALSE", "CASE", "WHEN", "THEN", "ELSE", "END", "IN",
            "LIKE", "BETWEEN", "ORDER", "BY", "GROUP", "HAVING", "LIMIT", "OFFSET", "UNION",
            "ALL", "DISTINCT", "CREATE", "DROP", "ALTER", "TABLE", "INDEX", "PRIMARY", "KEY",
            "FOREIGN", "REFERENCES", "UNIQUE", "CHECK", "DEFAULT", "CONSTRAINT", "COLUMN",
            "RETURNING", "USER",
        ];

        let upper = name.to_ascii_uppercase();
        RESERVED_KEYWORDS.contains(&upper.as_str())
    }
}

impl fmt::Display for ValidatedIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
