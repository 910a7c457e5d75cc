//! Error types for the persistence layer.
//!
//! This module defines all error types used throughout the persistence layer,
//! following a hierarchy that separates backend (connectivity and query)
//! errors, account errors, input validation errors and data loading errors.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type for all storage operations.
///
/// This enum encompasses all possible errors that can occur during persistence
/// operations, organized by category.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Backend-specific errors
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Account errors
    #[error(transparent)]
    Account(#[from] AccountError),

    /// Validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Data loading errors
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Errors originating from the database backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Connection to the backend failed.
    #[error("connection failed to {backend_name}: {message}")]
    ConnectionFailed {
        backend_name: String,
        message: String,
    },

    /// Schema creation error.
    #[error("schema initialization failed: {message}")]
    SchemaError { message: String },

    /// Query execution error.
    #[error("query execution failed: {message}")]
    QueryError { message: String },

    /// A stored value could not be decoded.
    #[error("serialization error: {message}")]
    SerializationError { message: String },
}

/// Errors related to user accounts.
#[derive(Error, Debug)]
pub enum AccountError {
    /// An account with this email already exists (compared case-insensitively).
    #[error("email already registered: {email}")]
    EmailTaken { email: String },

    /// The password could not be hashed or verified.
    #[error("password hashing failed: {message}")]
    PasswordHash { message: String },
}

/// Errors related to request input.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A filter value that must be an integer id was not one.
    #[error("invalid value '{value}' for filter '{filter}'")]
    InvalidFilterValue { filter: String, value: String },

    /// A field is present but malformed.
    #[error("invalid field {field}: {message}")]
    InvalidField { field: String, message: String },
}

/// Errors raised by the schema data loader.
#[derive(Error, Debug)]
pub enum LoadError {
    /// A statement in a SQL file failed; the run is aborted.
    #[error("failed to execute {file}: {message}")]
    Execution { file: String, message: String },
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(feature = "mongodb")]
impl From<mongodb::error::Error> for StorageError {
    fn from(err: mongodb::error::Error) -> Self {
        if matches!(*err.kind, mongodb::error::ErrorKind::ServerSelection { .. }) {
            return StorageError::Backend(BackendError::ConnectionFailed {
                backend_name: "mongodb".to_string(),
                message: err.to_string(),
            });
        }
        StorageError::Backend(BackendError::QueryError {
            message: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_display() {
        let err: StorageError = BackendError::SchemaError {
            message: "permission denied to create extension \"pg_trgm\"".to_string(),
        }
        .into();
        assert!(err.to_string().starts_with("schema initialization failed"));
        assert!(matches!(
            err,
            StorageError::Backend(BackendError::SchemaError { .. })
        ));
    }

    #[test]
    fn test_email_taken_display() {
        let err = AccountError::EmailTaken {
            email: "a@b.com".to_string(),
        };
        assert_eq!(err.to_string(), "email already registered: a@b.com");
    }

    #[test]
    fn test_invalid_filter_display() {
        let err = ValidationError::InvalidFilterValue {
            filter: "condition".to_string(),
            value: "abc".to_string(),
        };
        assert!(err.to_string().contains("condition"));
        assert!(err.to_string().contains("abc"));
    }
}
