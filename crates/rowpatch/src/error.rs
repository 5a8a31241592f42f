//! Error types for rowpatch

use std::time::Duration;
use thiserror::Error;

/// Result type alias for rowpatch operations
pub type PatchResult<T> = Result<T, PatchError>;

/// Error types for building and committing an UPDATE.
///
/// Configuration errors are returned by the call that introduced them.
/// Execution errors are only ever returned by `commit` / `commit_async`.
#[derive(Debug, Error)]
pub enum PatchError {
    /// A second identity column was declared
    #[error("Can't have more than one identity column (already '{existing}', got '{attempted}')")]
    DuplicateIdentity { existing: String, attempted: String },

    /// Predicate is not a simple property comparison
    #[error("Unsupported predicate shape: {0}")]
    UnsupportedPredicateShape(String),

    /// Nothing left to SET once the identity column is excluded
    #[error("No columns to update after excluding the identity column")]
    EmptyColumnSet,

    /// Two bound parameters share a name
    #[error("Duplicate parameter name: @{0}")]
    ParameterCollision(String),

    /// Entity does not expose a value for a column in the set
    #[error("Entity has no value for column '{0}'")]
    MissingValue(String),

    /// Invalid identifier or column name
    #[error("Validation error: {0}")]
    Validation(String),

    /// Opening the connection failed
    #[error("Connection error: {0}")]
    Connection(#[source] tokio_postgres::Error),

    /// Connection is closed and this handle cannot reopen it
    #[error("Connection is closed")]
    Closed,

    /// Statement execution error, passed through from the driver
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Command timeout elapsed
    #[error("Query timeout after {0:?}")]
    Timeout(Duration),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl PatchError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an unsupported predicate error
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedPredicateShape(message.into())
    }

    /// Whether this error was raised while declaring the statement.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::DuplicateIdentity { .. }
                | Self::UnsupportedPredicateShape(_)
                | Self::EmptyColumnSet
                | Self::ParameterCollision(_)
                | Self::MissingValue(_)
                | Self::Validation(_)
        )
    }

    /// Whether this error came from the connection or the executed statement.
    pub fn is_execution(&self) -> bool {
        matches!(
            self,
            Self::Connection(_) | Self::Closed | Self::Query(_) | Self::Timeout(_)
        )
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}
