//!
//! pathmap: nested mappings addressed by delimited string paths.
//! This library wraps hierarchical key-value data, the kind produced by parsing structured
//! config files, so it can be read, written, flattened, diffed and compared with paths
//! like `"train;optimizer;lr"` instead of manual nested indexing.
//!
//! ## Core Concepts
//!
//! * **Values (`value::Value`)**: Everything that can sit at a path: scalars, lists and nested maps.
//! * **Trees (`tree::Tree`)**: Insertion-ordered nested maps of plain segment keys.
//! * **Paths (`path::Delimiter`)**: Segment keys joined by a configurable, non-empty delimiter.
//! * **Walks (`walk::TreeWalk`)**: Depth-first, depth-bounded traversal with pluggable actions and stop conditions.
//! * **PathMaps (`map::PathMap`)**: A tree plus a synchronized flat `path -> leaf` index, kept consistent under
//!   set, delete and update.
//! * **Configs (`config::Config`)**: PathMaps restricted to scalar leaves, with one command-line flag per path.

pub mod config;
pub mod constants;
pub mod map;
pub mod path;
pub mod tree;
pub mod value;
pub mod walk;

pub use config::Config;
pub use map::{Lookup, PathMap};
pub use path::{Delimiter, Depth};
pub use tree::Tree;
pub use value::Value;

/// Result type used throughout the pathmap library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the pathmap library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured path map errors from the map module
    #[error(transparent)]
    Map(map::PathMapError),

    /// Structured config errors from the config module
    #[error(transparent)]
    Config(config::ConfigError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Map(_) => "map",
            Error::Config(_) => "config",
            Error::Serialize(_) => "serialize",
        }
    }

    /// Check if this error indicates a path was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Map(map_err) => map_err.is_not_found(),
            Error::Config(config_err) => {
                matches!(config_err, config::ConfigError::UnknownPath { .. })
            }
            _ => false,
        }
    }

    /// Check if this error is type-related.
    pub fn is_type_error(&self) -> bool {
        match self {
            Error::Map(map_err) => map_err.is_type_error(),
            Error::Config(config_err) => config_err.is_type_error(),
            _ => false,
        }
    }

    /// Check if this error is config-related.
    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::Config(_))
    }

    /// Check if this error came from command-line handling.
    pub fn is_cli_error(&self) -> bool {
        match self {
            Error::Config(config_err) => config_err.is_cli_error(),
            _ => false,
        }
    }
}
