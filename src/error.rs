//! Error types for the localsearch library.
//!
//! Every fallible operation returns [`Result`], whose error side is the
//! [`LocalSearchError`] enum. Schema and validation problems are reported
//! before any mutation is attempted; store I/O failures abort only the
//! operation that hit them.
//!
//! # Examples
//!
//! ```
//! use localsearch::error::{LocalSearchError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(LocalSearchError::invalid_argument("page size must be positive"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for localsearch operations.
#[derive(Error, Debug)]
pub enum LocalSearchError {
    /// Malformed or conflicting schema definition.
    #[error("Schema error: {0}")]
    Schema(String),

    /// A document does not satisfy its schema.
    #[error("Validation error on field '{field}': {message}")]
    Validation { field: String, message: String },

    /// Lookup miss reported through a batch result.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The session was closed before or during the operation.
    #[error("Session is closed")]
    SessionClosed,

    /// I/O errors from the underlying store.
    #[error("Store I/O error: {0}")]
    Io(#[from] io::Error),

    /// Storage backend errors.
    #[error("Storage error: {0}")]
    Storage(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid argument passed by the caller.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with LocalSearchError.
pub type Result<T> = std::result::Result<T, LocalSearchError>;

impl LocalSearchError {
    /// Create a new schema error.
    pub fn schema<S: Into<String>>(msg: S) -> Self {
        LocalSearchError::Schema(msg.into())
    }

    /// Create a new validation error for the given field.
    pub fn validation<F: Into<String>, S: Into<String>>(field: F, msg: S) -> Self {
        LocalSearchError::Validation {
            field: field.into(),
            message: msg.into(),
        }
    }

    /// Create a new not found error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        LocalSearchError::NotFound(msg.into())
    }

    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        LocalSearchError::Storage(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        LocalSearchError::InvalidArgument(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        LocalSearchError::InvalidArgument(format!("Invalid configuration: {}", msg.into()))
    }

    /// Create a new internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        LocalSearchError::Other(format!("Internal error: {}", msg.into()))
    }

    /// Whether this error originated in the persistence layer.
    pub fn is_store_io(&self) -> bool {
        matches!(self, LocalSearchError::Io(_) | LocalSearchError::Storage(_))
    }

    /// The offending field name for validation errors.
    pub fn field(&self) -> Option<&str> {
        match self {
            LocalSearchError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}
