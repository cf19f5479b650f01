//! Error types for typed configuration.

use thiserror::Error;

/// Structured error types for [`Config`](super::Config) operations.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A leaf holds a type outside the allowed scalar set
    #[error("Disallowed config value at {path}: {found} is not a scalar or list of scalars")]
    DisallowedType { path: String, found: String },

    /// A list mixes element types
    #[error("Mixed list at {path}: all non-null elements must share one type")]
    MixedList { path: String },

    /// An argument override entry could not be read
    #[error("Invalid argument override for {path}: {reason}")]
    InvalidOverride { path: String, reason: String },

    /// An argument override names a path the config does not have
    #[error("Argument override for unknown path: {path}")]
    UnknownPath { path: String },

    /// A command-line value could not be converted to the path's type
    #[error("Invalid value for {path}: {reason}")]
    InvalidArgument { path: String, reason: String },

    /// Command-line parsing failed
    #[error(transparent)]
    Cli(#[from] clap::Error),

    /// Parsed matches did not fit the registered arguments
    #[error(transparent)]
    Matches(#[from] clap::parser::MatchesError),
}

impl ConfigError {
    /// Check if this error is related to leaf type validation
    pub fn is_type_error(&self) -> bool {
        matches!(
            self,
            ConfigError::DisallowedType { .. } | ConfigError::MixedList { .. }
        )
    }

    /// Check if this error is related to the override table
    pub fn is_override_error(&self) -> bool {
        matches!(
            self,
            ConfigError::InvalidOverride { .. } | ConfigError::UnknownPath { .. }
        )
    }

    /// Check if this error came from command-line handling
    pub fn is_cli_error(&self) -> bool {
        matches!(
            self,
            ConfigError::Cli(_) | ConfigError::Matches(_) | ConfigError::InvalidArgument { .. }
        )
    }

    /// Get the path if this is a path-related error
    pub fn path(&self) -> Option<&str> {
        match self {
            ConfigError::DisallowedType { path, .. }
            | ConfigError::MixedList { path }
            | ConfigError::InvalidOverride { path, .. }
            | ConfigError::UnknownPath { path }
            | ConfigError::InvalidArgument { path, .. } => Some(path),
            _ => None,
        }
    }
}

// Conversion from ConfigError to the main Error type
impl From<ConfigError> for crate::Error {
    fn from(err: ConfigError) -> Self {
        crate::Error::Config(err)
    }
}
