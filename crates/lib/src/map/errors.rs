//! Error types for path map operations.

use thiserror::Error;

/// Structured error types for [`PathMap`](super::PathMap) operations.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathMapError {
    /// A strict lookup or delete named a path that does not resolve
    #[error("Path not found: {path}")]
    PathNotFound { path: String },

    /// A value had a different shape than the operation requires
    #[error("Type mismatch: expected {expected}, found {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// The delimiter was rejected (it must be non-empty)
    #[error("Invalid delimiter: {delimiter:?}")]
    InvalidDelimiter { delimiter: String },
}

impl PathMapError {
    /// Check if this error means a path did not resolve
    pub fn is_not_found(&self) -> bool {
        matches!(self, PathMapError::PathNotFound { .. })
    }

    /// Check if this error is related to type mismatches
    pub fn is_type_error(&self) -> bool {
        matches!(self, PathMapError::TypeMismatch { .. })
    }

    /// Check if this error is related to delimiter validation
    pub fn is_delimiter_error(&self) -> bool {
        matches!(self, PathMapError::InvalidDelimiter { .. })
    }

    /// Get the path if this is a path-related error
    pub fn path(&self) -> Option<&str> {
        match self {
            PathMapError::PathNotFound { path } => Some(path),
            _ => None,
        }
    }

    pub(crate) fn not_found(path: impl Into<String>) -> Self {
        PathMapError::PathNotFound { path: path.into() }
    }
}

// Conversion from PathMapError to the main Error type
impl From<PathMapError> for crate::Error {
    fn from(err: PathMapError) -> Self {
        crate::Error::Map(err)
    }
}
