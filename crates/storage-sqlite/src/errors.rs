//! Storage-specific error types for SQLite operations.
//!
//! Diesel and r2d2 errors are wrapped here and converted into the
//! database-agnostic errors of `pocketpilot_core` at the crate boundary.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;
use pocketpilot_core::errors::{DatabaseError, Error};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection failed: {0}")]
    ConnectionFailed(#[from] diesel::ConnectionError),

    #[error("Connection pool error: {0}")]
    PoolError(#[from] r2d2::Error),

    #[error("Query execution failed: {0}")]
    QueryFailed(#[from] DieselError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// A domain error raised inside a writer job; passed through untouched.
    #[error(transparent)]
    Core(Error),
}

impl From<Error> for StorageError {
    fn from(err: Error) -> Self {
        StorageError::Core(err)
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::ConnectionFailed(e) => {
                Error::Database(DatabaseError::ConnectionFailed(e.to_string()))
            }
            StorageError::PoolError(e) => Error::Database(DatabaseError::ConnectionFailed(e.to_string())),
            StorageError::QueryFailed(DieselError::NotFound) => {
                Error::Database(DatabaseError::NotFound("Record not found".to_string()))
            }
            StorageError::QueryFailed(DieselError::DatabaseError(
                DatabaseErrorKind::UniqueViolation,
                info,
            )) => Error::Database(DatabaseError::UniqueViolation(info.message().to_string())),
            StorageError::QueryFailed(DieselError::DatabaseError(
                DatabaseErrorKind::ForeignKeyViolation,
                info,
            )) => Error::Database(DatabaseError::ForeignKeyViolation(
                info.message().to_string(),
            )),
            StorageError::QueryFailed(e) => Error::Database(DatabaseError::QueryFailed(e.to_string())),
            StorageError::SerializationError(e) => {
                Error::Database(DatabaseError::Internal(e.to_string()))
            }
            StorageError::Core(e) => e,
        }
    }
}

/// Adds `.into_core()` to Diesel, r2d2 and serde results.
pub trait IntoCore<T> {
    fn into_core(self) -> pocketpilot_core::Result<T>;
}

impl<T, E> IntoCore<T> for std::result::Result<T, E>
where
    E: Into<StorageError>,
{
    fn into_core(self) -> pocketpilot_core::Result<T> {
        self.map_err(|e| Error::from(e.into()))
    }
}

/// Diesel result for a lookup scoped to one user; a missing row becomes a named not-found.
pub trait OrNotFound<T> {
    fn or_not_found(self, resource: &str) -> pocketpilot_core::Result<T>;
}

impl<T> OrNotFound<T> for std::result::Result<T, DieselError> {
    fn or_not_found(self, resource: &str) -> pocketpilot_core::Result<T> {
        match self {
            Ok(value) => Ok(value),
            Err(DieselError::NotFound) => Err(Error::not_found(resource)),
            Err(e) => Err(StorageError::from(e).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_database_not_found() {
        let err: Error = StorageError::QueryFailed(DieselError::NotFound).into();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_core_errors_pass_through() {
        let err: Error = StorageError::from(Error::invalid("bad amount")).into();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_or_not_found_names_the_resource() {
        let result: std::result::Result<(), DieselError> = Err(DieselError::NotFound);
        let err = result.or_not_found("Account").unwrap_err();
        assert_eq!(err.to_string(), "Account not found");
    }
}
