//! Constants used throughout the pathmap library.
//!
//! This module provides central definitions for defaults and reserved keys.

/// Delimiter used when a map is built without an explicit one.
pub const DEFAULT_DELIMITER: &str = ";";

/// Reserved top-level key of a config tree holding per-path argument overrides.
///
/// The key is stripped from the tree before the config is validated, so it never
/// shows up as a regular path.
pub const ARGUMENT_SPECIFICATION: &str = "_ARGUMENT_SPECIFICATION";

/// Separator substituted for the path delimiter when deriving CLI flag names.
pub const FLAG_SEPARATOR: &str = "__";
