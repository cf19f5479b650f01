//! Typed configuration on top of [`PathMap`].
//!
//! A [`Config`] is a path map whose leaves are restricted to plain scalars
//! (null, bool, int, float, text) and lists of one scalar type. The check
//! runs on construction and before every write, so a rejected write leaves the
//! config as it was.
//!
//! Every leaf can be exposed as a command-line flag (see [`args`]). A config
//! tree may carry a reserved top-level `_ARGUMENT_SPECIFICATION` table that
//! customizes those flags per path; it is split off before validation and
//! written back on serialization.
//!
//! # Usage
//!
//! ```rust
//! use pathmap::{Config, Tree};
//!
//! let tree = Tree::new().with("train", Tree::new().with("lr", 0.1).with("epochs", 10));
//! let mut config = Config::new(tree)?;
//!
//! let command = clap::Command::new("train");
//! config.parse_from(command, ["train", "--train__epochs", "20"])?;
//! assert_eq!(config.get_value("train;epochs").and_then(|v| v.as_int()), Some(20));
//! # Ok::<(), pathmap::Error>(())
//! ```

use std::ffi::OsString;
use std::ops::Deref;

use clap::{ArgMatches, Command};
use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::Result;
use crate::constants::ARGUMENT_SPECIFICATION;
use crate::map::{PathMap, UpdateOptions};
use crate::path::Delimiter;
use crate::tree::Tree;
use crate::value::Value;

pub mod args;
mod errors;

pub use args::{ArgKind, ArgOverride, ArgSpec};
pub use errors::ConfigError;

/// A leaf-type-checked [`PathMap`] with command-line binding.
///
/// Reads go through [`Deref`] to the inner map. Writes go through the
/// checked methods on `Config`.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    map: PathMap,
    overrides: IndexMap<String, ArgOverride>,
}

impl Config {
    /// Builds a config from a tree using the default delimiter.
    ///
    /// # Errors
    /// Fails if a leaf has a disallowed type or the override table is invalid.
    pub fn new(tree: Tree) -> Result<Self> {
        Self::with_delimiter(tree, Delimiter::default())
    }

    /// Builds a config from a tree using `delimiter`.
    pub fn with_delimiter(mut tree: Tree, delimiter: Delimiter) -> Result<Self> {
        let table = tree.remove(ARGUMENT_SPECIFICATION);
        let map = PathMap::from_tree(tree, delimiter);
        Self::assemble(map, table)
    }

    /// Wraps an existing map, splitting off its override table if present.
    pub fn from_map(mut map: PathMap) -> Result<Self> {
        let table = map.delete(ARGUMENT_SPECIFICATION).ok();
        Self::assemble(map, table)
    }

    fn assemble(map: PathMap, table: Option<Value>) -> Result<Self> {
        for (path, value) in map.flatten() {
            check_leaf(path, value)?;
        }

        let mut overrides = IndexMap::new();
        match table {
            None => {}
            Some(Value::Map(table)) => {
                collect_overrides(&table, None, map.delimiter(), &mut overrides)?;
            }
            Some(other) => {
                return Err(ConfigError::InvalidOverride {
                    path: ARGUMENT_SPECIFICATION.to_string(),
                    reason: format!("expected a map, found {}", other.type_name()),
                }
                .into());
            }
        }
        for path in overrides.keys() {
            if !map.flatten().contains_key(path) {
                return Err(ConfigError::UnknownPath { path: path.clone() }.into());
            }
        }

        debug!(
            paths = map.flatten().len(),
            overrides = overrides.len(),
            "Loaded config"
        );
        Ok(Self { map, overrides })
    }

    /// Returns the underlying map.
    pub fn map(&self) -> &PathMap {
        &self.map
    }

    /// Consumes the config, returning the underlying map.
    pub fn into_map(self) -> PathMap {
        self.map
    }

    /// Returns the per-path argument overrides.
    pub fn overrides(&self) -> &IndexMap<String, ArgOverride> {
        &self.overrides
    }

    /// Checks `value` and writes it at `path`.
    ///
    /// # Errors
    /// Fails without writing if any leaf of `value` has a disallowed type.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        match &value {
            Value::Map(tree) => {
                let staged = PathMap::from_tree(tree.clone(), self.map.delimiter().clone());
                if staged.flatten().is_empty() {
                    check_leaf(path, &value)?;
                }
                for (relative, leaf) in staged.flatten() {
                    check_leaf(&self.map.delimiter().join(path, relative), leaf)?;
                }
            }
            leaf => check_leaf(path, leaf)?,
        }
        self.map.set(path, value);
        Ok(())
    }

    /// Checks every entry `other` would write, then merges it.
    ///
    /// # Errors
    /// Fails without writing anything if an applied entry has a disallowed type.
    pub fn update(&mut self, other: &PathMap, options: UpdateOptions) -> Result<usize> {
        for (path, value) in other.flatten() {
            let path = other.delimiter().convert(path, self.map.delimiter());
            if (options.ignore_none && value.is_null())
                || (options.ignore_missing && !self.map.flatten().contains_key(&path))
            {
                continue;
            }
            check_leaf(&path, value)?;
        }
        Ok(self.map.update(other, options))
    }

    /// Checks and merges a plain tree.
    pub fn update_tree(&mut self, tree: Tree, options: UpdateOptions) -> Result<usize> {
        let other = PathMap::from_tree(tree, self.map.delimiter().clone());
        self.update(&other, options)
    }

    /// Removes the node at `path`.
    ///
    /// # Errors
    /// Fails if the path does not resolve.
    pub fn delete(&mut self, path: &str) -> Result<Value> {
        Ok(self.map.delete(path)?)
    }

    /// One flag per flat path, in flat order, with overrides applied.
    ///
    /// Excluded paths and empty-map placeholders have no flag.
    pub fn arg_specs(&self) -> Vec<ArgSpec> {
        self.map
            .flatten()
            .iter()
            .filter_map(|(path, value)| {
                let custom = self.overrides.get(path);
                if custom.is_some_and(|c| c.exclude) {
                    return None;
                }
                let spec = ArgSpec::infer(path, value, self.map.delimiter())?;
                Some(match custom {
                    Some(custom) => spec.with_override(custom),
                    None => spec,
                })
            })
            .collect()
    }

    /// Adds a flag for every config path to `command`.
    pub fn command(&self, command: Command) -> Command {
        args::register(command, &self.arg_specs())
    }

    /// Writes back every config flag present in `matches`.
    ///
    /// Returns how many paths changed value.
    pub fn apply_matches(&mut self, matches: &ArgMatches) -> Result<usize> {
        let mut changed = 0usize;
        for spec in self.arg_specs() {
            let Some(value) = spec.read(matches)? else {
                continue;
            };
            if self.map.get_value(&spec.path) != Some(&value) {
                self.set(&spec.path, value)?;
                changed += 1;
            }
        }
        debug!(changed, "Applied command-line arguments");
        Ok(changed)
    }

    /// Registers the config flags on `command`, parses `args` and applies them.
    ///
    /// The matches are returned so callers can read their own arguments.
    ///
    /// # Errors
    /// Fails on a command-line error or if a parsed value cannot be stored.
    pub fn parse_from<I, T>(&mut self, command: Command, args: I) -> Result<ArgMatches>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self
            .command(command)
            .try_get_matches_from(args)
            .map_err(ConfigError::from)?;
        self.apply_matches(&matches)?;
        Ok(matches)
    }

    /// A copy of the map with every leaf replaced by its display string.
    pub fn to_strings(&self) -> PathMap {
        PathMap::from_flattened(
            self.map
                .flatten()
                .iter()
                .map(|(path, value)| (path, Value::Text(value.to_string()))),
            self.map.delimiter().clone(),
        )
    }

    /// Parses a config from JSON text, override table included.
    ///
    /// # Errors
    /// Fails on malformed JSON or if the parsed config does not validate.
    pub fn from_json(json: &str) -> Result<Self> {
        let tree: Tree = serde_json::from_str(json)?;
        Self::new(tree)
    }

    /// Renders the config as pretty JSON, override table included.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Deref for Config {
    type Target = PathMap;

    fn deref(&self) -> &Self::Target {
        &self.map
    }
}

impl Serialize for Config {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let tree = self.map.tree();
        let extra = usize::from(!self.overrides.is_empty());
        let mut state = serializer.serialize_map(Some(tree.len() + extra))?;
        for (key, value) in tree {
            state.serialize_entry(key, value)?;
        }
        if !self.overrides.is_empty() {
            state.serialize_entry(ARGUMENT_SPECIFICATION, &self.overrides)?;
        }
        state.end()
    }
}

impl<'de> Deserialize<'de> for Config {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let tree = Tree::deserialize(deserializer)?;
        Config::new(tree).map_err(serde::de::Error::custom)
    }
}

/// Rejects anything but scalars and single-typed lists of scalars.
fn check_leaf(path: &str, value: &Value) -> std::result::Result<(), ConfigError> {
    match value {
        Value::Null | Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::Text(_) => Ok(()),
        Value::List(items) => {
            let mut seen: Option<&'static str> = None;
            for item in items.iter().filter(|item| !item.is_null()) {
                if !item.is_scalar() {
                    return Err(ConfigError::DisallowedType {
                        path: path.to_string(),
                        found: format!("list of {}", item.type_name()),
                    });
                }
                match seen {
                    None => seen = Some(item.type_name()),
                    Some(kind) if kind == item.type_name() => {}
                    Some(_) => {
                        return Err(ConfigError::MixedList {
                            path: path.to_string(),
                        });
                    }
                }
            }
            Ok(())
        }
        Value::Map(_) => Err(ConfigError::DisallowedType {
            path: path.to_string(),
            found: "empty map".to_string(),
        }),
    }
}

/// Reads the override table. Entries may be keyed by full path or nested.
fn collect_overrides(
    table: &Tree,
    prefix: Option<&str>,
    delimiter: &Delimiter,
    overrides: &mut IndexMap<String, ArgOverride>,
) -> std::result::Result<(), ConfigError> {
    for (key, value) in table {
        let path = match prefix {
            Some(prefix) => delimiter.join(prefix, key),
            None => key.clone(),
        };
        match value {
            Value::Map(entry) if is_override_entry(entry) => {
                let custom = serde_json::from_value(serde_json::Value::from(value)).map_err(|e| {
                    ConfigError::InvalidOverride {
                        path: path.clone(),
                        reason: e.to_string(),
                    }
                })?;
                overrides.insert(path, custom);
            }
            Value::Map(children) => collect_overrides(children, Some(&path), delimiter, overrides)?,
            other => {
                return Err(ConfigError::InvalidOverride {
                    path,
                    reason: format!("expected a map, found {}", other.type_name()),
                });
            }
        }
    }
    Ok(())
}

fn is_override_entry(entry: &Tree) -> bool {
    !entry.is_empty()
        && entry
            .keys()
            .all(|key| args::OVERRIDE_FIELDS.contains(&key.as_str()))
}
