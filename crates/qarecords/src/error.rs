//! Error types for qarecords.
//!
//! This module defines all error types used throughout the qarecords crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for qarecords operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Record Errors ===
    /// A question or answer was empty after trimming.
    #[error("{message}")]
    Validation {
        /// Description of the validation failure.
        message: String,
    },

    /// No record with the given id exists in the collection.
    #[error("no record with id '{id}'")]
    RecordNotFound {
        /// The id that was looked up.
        id: String,
    },

    // === CSV Errors ===
    /// The CSV text has no resolvable question and answer columns.
    #[error("CSV must contain Question and Answer columns.")]
    MissingColumns,

    // === Storage Errors ===
    /// Reading a key from the record store failed.
    #[error("failed to read '{key}' from {path}: {source}")]
    StoreRead {
        /// Storage key being read.
        key: String,
        /// File backing the key.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Writing a key to the record store failed.
    #[error("failed to write '{key}' to {path}: {source}")]
    StoreWrite {
        /// Storage key being written.
        key: String,
        /// File backing the key.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for qarecords operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a record-not-found error.
    #[must_use]
    pub fn record_not_found(id: impl Into<String>) -> Self {
        Self::RecordNotFound { id: id.into() }
    }

    /// Check if this error is a CSV structural failure.
    #[must_use]
    pub fn is_missing_columns(&self) -> bool {
        matches!(self, Self::MissingColumns)
    }

    /// Check if this error was caused by invalid user input.
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}
