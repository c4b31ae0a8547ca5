//! Error types for nodekb.

use thiserror::Error;

/// Common error type for nodekb.
#[derive(Error, Debug)]
pub enum NodekbError {
    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant.
    #[error("database error: {0}")]
    Database(String),

    /// Database connection error.
    #[error("database connection error: {0}")]
    DatabaseConnection(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Chunked storage failure (missing chunk, duplicate filename, ...).
    #[error("storage error: {0}")]
    Storage(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Content larger than the configured limit.
    #[error("payload too large: {0}")]
    TooLarge(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// View rendering error.
    #[error("template error: {0}")]
    Template(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl NodekbError {
    /// Whether this error means the backing store could not serve the request,
    /// as opposed to the request being wrong.
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            NodekbError::Database(_)
                | NodekbError::DatabaseConnection(_)
                | NodekbError::Io(_)
                | NodekbError::Storage(_)
        )
    }
}

impl From<sqlx::Error> for NodekbError {
    fn from(e: sqlx::Error) -> Self {
        NodekbError::Database(e.to_string())
    }
}

impl From<std::convert::Infallible> for NodekbError {
    fn from(e: std::convert::Infallible) -> Self {
        match e {}
    }
}

/// Result type alias for nodekb operations.
pub type Result<T> = std::result::Result<T, NodekbError>;
