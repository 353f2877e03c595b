//! Core error types for Pocket Pilot.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer.

use chrono::ParseError as ChronoParseError;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the application.
///
/// Database-specific errors are wrapped in string form to keep this type
/// database-agnostic.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// Shorthand for a not-found error on a named resource.
    pub fn not_found(resource: impl Into<String>) -> Self {
        Error::NotFound(resource.into())
    }

    /// Shorthand for a single-message validation failure.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Error::Validation(ValidationError::InvalidInput(msg.into()))
    }

    /// True when the error means "no such row for this user".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::NotFound(_) | Error::Database(DatabaseError::NotFound(_))
        )
    }

    /// True when the error comes from a unique constraint.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Error::ConstraintViolation(_) | Error::Database(DatabaseError::UniqueViolation(_))
        )
    }
}

/// Database-agnostic error type for storage operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A unique constraint was violated (e.g., duplicate key).
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// A foreign key constraint was violated.
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Database migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("{0}")]
    Fields(FieldErrors),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Failed to parse date/time: {0}")]
    DateTimeParse(#[from] ChronoParseError),
}

impl ValidationError {
    /// Flattened view used in HTTP 400 bodies.
    pub fn flatten(&self) -> FlattenedErrors {
        match self {
            ValidationError::Fields(fields) => fields.flatten(),
            ValidationError::MissingField(field) => {
                let mut errors = FieldErrors::new();
                errors.add(field, "Required");
                errors.flatten()
            }
            other => FlattenedErrors {
                form_errors: vec![other.to_string()],
                field_errors: BTreeMap::new(),
            },
        }
    }
}

/// Per-field validation messages collected while checking an input model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors {
    fields: BTreeMap<String, Vec<String>>,
}

/// `{ formErrors: [...], fieldErrors: { field: [...] } }`
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FlattenedErrors {
    pub form_errors: Vec<String>,
    pub field_errors: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Adds `message` under `field` when `failed` is true.
    pub fn check(&mut self, failed: bool, field: &str, message: &str) {
        if failed {
            self.add(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.fields.get(field)
    }

    pub fn flatten(&self) -> FlattenedErrors {
        FlattenedErrors {
            form_errors: Vec::new(),
            field_errors: self.fields.clone(),
        }
    }

    /// Converts the collected messages into a result, failing when any were added.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(ValidationError::Fields(self)))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

// === From implementations for common error types ===

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateTimeParse(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Unexpected(format!("CSV error: {}", err))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
