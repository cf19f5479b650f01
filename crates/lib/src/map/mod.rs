//! Path-addressable nested mappings.
//!
//! [`PathMap`] keeps two synchronized views of the same data:
//!
//! - the **tree**: an insertion-ordered nested [`Tree`] of segment keys
//! - the **flat index**: a `path -> leaf` mapping keyed by delimiter-joined paths
//!
//! Every leaf reachable in the tree has exactly one flat entry and vice versa.
//! An empty nested map is itself a leaf of the flat index (`"a" -> {}`), so that
//! emptied branches stay visible after a delete.
//!
//! # Core Operations
//!
//! - **Queries** ([`get`](PathMap::get), [`lookup`](PathMap::lookup),
//!   [`keys`](PathMap::keys), [`items`](PathMap::items), [`size`](PathMap::size), ...)
//! - **Mutation** ([`set`](PathMap::set), [`delete`](PathMap::delete),
//!   [`update`](PathMap::update), [`set_delimiter`](PathMap::set_delimiter))
//! - **Comparison** ([`equals`](PathMap::equals), [`diff`](PathMap::diff))
//!
//! # Usage
//!
//! ```rust
//! use pathmap::{PathMap, Tree, path::Delimiter};
//!
//! let tree = Tree::new().with("a", Tree::new().with("b", 1).with("c", 2));
//! let mut map = PathMap::from_tree(tree, Delimiter::default());
//!
//! assert_eq!(map.keys(1), vec!["a"]);
//! assert_eq!(map.keys(2), vec!["a;b", "a;c"]);
//!
//! map.set("a;d;e", "deep");
//! assert_eq!(map.get_value("a;d;e").and_then(|v| v.as_text()), Some("deep"));
//!
//! map.delete("a;d;e")?;
//! assert!(map.contains("a;d"));
//! # Ok::<(), pathmap::map::PathMapError>(())
//! ```
//!
//! # Views are snapshots
//!
//! A nested result from [`get`](PathMap::get) owns a copy of the subtree and of
//! its slice of the flat index. Mutating the parent afterwards does not reach an
//! already-returned view, and the reverse holds too.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::path::Delimiter;
use crate::tree::Tree;
use crate::value::Value;

mod compare;
mod errors;
mod mutate;
mod query;


pub use compare::{CompareOptions, Diff};
pub use errors::PathMapError;
pub use mutate::{Resolver, UpdateOptions};
pub use query::Lookup;

/// A nested mapping addressable by delimited string paths.
#[derive(Debug, Clone)]
pub struct PathMap {
    tree: Tree,
    flat: IndexMap<String, Value>,
    delimiter: Delimiter,
    nested_results: bool,
}

impl PathMap {
    /// Creates an empty map using the default `;` delimiter.
    pub fn new() -> Self {
        Self::with_delimiter(Delimiter::default())
    }

    /// Creates an empty map using `delimiter`.
    pub fn with_delimiter(delimiter: Delimiter) -> Self {
        Self {
            tree: Tree::new(),
            flat: IndexMap::new(),
            delimiter,
            nested_results: true,
        }
    }

    /// Builds a map from a plain nested tree.
    ///
    /// Top-level keys go through [`set`](Self::set) one by one, so a key that
    /// contains the delimiter is expanded into nesting: `{"a;b": 1}` becomes
    /// `{"a": {"b": 1}}`.
    pub fn from_tree(tree: Tree, delimiter: Delimiter) -> Self {
        let mut map = Self::with_delimiter(delimiter);
        for (key, value) in tree {
            map.set(&key, value);
        }
        map
    }

    /// Rebuilds a map from `path -> value` pairs, as produced by
    /// [`flatten`](Self::flatten).
    pub fn from_flattened<I, P, V>(entries: I, delimiter: Delimiter) -> Self
    where
        I: IntoIterator<Item = (P, V)>,
        P: AsRef<str>,
        V: Into<Value>,
    {
        let mut map = Self::with_delimiter(delimiter);
        for (path, value) in entries {
            map.set(path.as_ref(), value);
        }
        map
    }

    /// Merges `trees` left to right with default [`UpdateOptions`].
    pub fn from_trees<I>(trees: I, delimiter: Delimiter) -> Self
    where
        I: IntoIterator<Item = Tree>,
    {
        let mut map = Self::with_delimiter(delimiter);
        for tree in trees {
            map.update_tree(tree, UpdateOptions::default());
        }
        map
    }

    /// Takes over the storage of `source` without copying it.
    ///
    /// This is the zero-copy construction mode: `source` is consumed, so the
    /// new map is its sole owner. Flat keys are rewritten only when `delimiter`
    /// differs from the source's.
    pub fn aliasing(source: PathMap, delimiter: Delimiter) -> Self {
        let mut map = source;
        map.set_delimiter(delimiter);
        map
    }

    /// Builds a fully independent deep copy of `source` using `delimiter`.
    pub fn cloning(source: &PathMap, delimiter: Delimiter) -> Self {
        Self::aliasing(source.clone(), delimiter)
    }

    /// Returns the tree view.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Returns the flat `path -> leaf` view, including empty-map placeholders.
    pub fn flatten(&self) -> &IndexMap<String, Value> {
        &self.flat
    }

    /// Returns the path delimiter.
    pub fn delimiter(&self) -> &Delimiter {
        &self.delimiter
    }

    /// Returns true if container results are returned as nested [`PathMap`] views.
    pub fn nested_results(&self) -> bool {
        self.nested_results
    }

    /// Chooses whether container results are wrapped as nested views (the
    /// default) or returned as raw [`Value::Map`]s.
    pub fn set_nested_results(&mut self, enabled: bool) {
        self.nested_results = enabled;
    }

    /// Consumes the map and returns its tree.
    pub fn into_tree(self) -> Tree {
        self.tree
    }

    /// Builds the snapshot view of the subtree at `path`.
    ///
    /// The flat slice is re-rooted: `"a;b;c"` becomes `"b;c"` in the view of `"a"`.
    fn subview(&self, path: &str, tree: &Tree) -> PathMap {
        let flat = self
            .flat
            .iter()
            .filter_map(|(p, v)| {
                self.delimiter
                    .strip_ancestor(p, path)
                    .map(|relative| (relative.to_string(), v.clone()))
            })
            .collect();
        PathMap {
            tree: tree.clone(),
            flat,
            delimiter: self.delimiter.clone(),
            nested_results: self.nested_results,
        }
    }
}

impl Default for PathMap {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Tree> for PathMap {
    fn from(tree: Tree) -> Self {
        Self::from_tree(tree, Delimiter::default())
    }
}

impl TryFrom<Value> for PathMap {
    type Error = PathMapError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Map(tree) => Ok(Self::from(tree)),
            other => Err(PathMapError::TypeMismatch {
                expected: "map".to_string(),
                actual: other.type_name().to_string(),
            }),
        }
    }
}

impl TryFrom<serde_json::Value> for PathMap {
    type Error = PathMapError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        Self::try_from(Value::from(value))
    }
}

impl<P: AsRef<str>, V: Into<Value>> FromIterator<(P, V)> for PathMap {
    fn from_iter<T: IntoIterator<Item = (P, V)>>(iter: T) -> Self {
        Self::from_flattened(iter, Delimiter::default())
    }
}

impl Serialize for PathMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.tree.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PathMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Tree::deserialize(deserializer).map(PathMap::from)
    }
}

impl fmt::Display for PathMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.tree, f)
    }
}
