//! Read operations on [`PathMap`].
//!
//! Every depth-bounded view here (`keys`, `values`, `items`, `size`, `paths`)
//! is a single [`TreeWalk`] with a different action. The depth rule is shared:
//! a node is reported when it is terminal (a leaf or an empty map), or when it
//! is a branch sitting exactly on the depth bound.

use crate::path::Depth;
use crate::tree::Tree;
use crate::value::Value;
use crate::walk::{TreeWalk, Visit};

use super::{PathMap, PathMapError};

/// Result of resolving a path.
///
/// Container results become [`Lookup::Nested`] views when nested-result mode
/// is enabled. A nested view is a snapshot: it owns its own copy of the
/// subtree and is not updated by later changes to the parent.
#[derive(Debug, Clone)]
pub enum Lookup<'a> {
    /// A borrowed value from the map
    Value(&'a Value),
    /// A re-rooted copy of a subtree
    Nested(PathMap),
}

impl<'a> Lookup<'a> {
    /// Returns the raw value, if this is not a nested view
    pub fn as_value(&self) -> Option<&'a Value> {
        match self {
            Lookup::Value(value) => Some(value),
            Lookup::Nested(_) => None,
        }
    }

    /// Returns the nested view, if this is one
    pub fn as_nested(&self) -> Option<&PathMap> {
        match self {
            Lookup::Nested(map) => Some(map),
            Lookup::Value(_) => None,
        }
    }

    /// Returns true if this is a nested view
    pub fn is_nested(&self) -> bool {
        matches!(self, Lookup::Nested(_))
    }

    /// Converts into an owned value. Nested views become [`Value::Map`].
    pub fn into_value(self) -> Value {
        match self {
            Lookup::Value(value) => value.clone(),
            Lookup::Nested(map) => Value::Map(map.into_tree()),
        }
    }
}

impl PartialEq<Value> for Lookup<'_> {
    fn eq(&self, other: &Value) -> bool {
        match self {
            Lookup::Value(value) => *value == other,
            Lookup::Nested(map) => matches!(other, Value::Map(tree) if map.tree() == tree),
        }
    }
}

impl PartialEq<Tree> for Lookup<'_> {
    fn eq(&self, other: &Tree) -> bool {
        match self {
            Lookup::Value(value) => *value == other,
            Lookup::Nested(map) => map.tree() == other,
        }
    }
}

impl PartialEq<i64> for Lookup<'_> {
    fn eq(&self, other: &i64) -> bool {
        self.as_value().is_some_and(|value| value == other)
    }
}

impl PartialEq<f64> for Lookup<'_> {
    fn eq(&self, other: &f64) -> bool {
        self.as_value().is_some_and(|value| value == other)
    }
}

impl PartialEq<bool> for Lookup<'_> {
    fn eq(&self, other: &bool) -> bool {
        self.as_value().is_some_and(|value| value == other)
    }
}

impl PartialEq<&str> for Lookup<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.as_value().is_some_and(|value| value == other)
    }
}

impl PathMap {
    /// Resolves `path` to the value stored there, never wrapping containers.
    ///
    /// Leaves are answered from the flat index; branches by walking the tree.
    pub fn get_value(&self, path: &str) -> Option<&Value> {
        match self.flat.get(path) {
            Some(value) => Some(value),
            None => self.tree.descend(self.delimiter.split(path)),
        }
    }

    /// Resolves `path`, returning `None` if any segment is missing.
    pub fn get(&self, path: &str) -> Option<Lookup<'_>> {
        let value = self.get_value(path)?;
        Some(match value {
            Value::Map(tree) if self.nested_results => Lookup::Nested(self.subview(path, tree)),
            _ => Lookup::Value(value),
        })
    }

    /// Resolves `path`, falling back to `default` when it is missing.
    pub fn get_or<'a>(&'a self, path: &str, default: &'a Value) -> Lookup<'a> {
        self.get(path).unwrap_or(Lookup::Value(default))
    }

    /// Strict counterpart of [`get`](Self::get).
    ///
    /// # Errors
    /// Returns [`PathMapError::PathNotFound`] if the path does not resolve.
    pub fn lookup(&self, path: &str) -> Result<Lookup<'_>, PathMapError> {
        self.get(path).ok_or_else(|| PathMapError::not_found(path))
    }

    /// Returns true if `path` names a leaf, a recorded empty map, or a branch.
    pub fn contains(&self, path: &str) -> bool {
        self.get_value(path).is_some()
    }

    /// Returns the number of top-level keys.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns true if the map holds nothing at all.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Paths reported at `depth`, in depth-first insertion order.
    ///
    /// Leaves shallower than `depth` are always included; branches only when
    /// they sit exactly at `depth`. [`Depth::Unbounded`] lists every leaf.
    pub fn keys(&self, depth: impl Into<Depth>) -> Vec<String> {
        self.items(depth).into_iter().map(|(path, _)| path).collect()
    }

    /// Values reported at `depth`, in the same order as [`keys`](Self::keys).
    pub fn values(&self, depth: impl Into<Depth>) -> Vec<&Value> {
        self.items(depth).into_iter().map(|(_, value)| value).collect()
    }

    /// `(path, value)` pairs reported at `depth`.
    pub fn items(&self, depth: impl Into<Depth>) -> Vec<(String, &Value)> {
        let depth = depth.into();
        let mut items = Vec::new();
        TreeWalk::new(&self.delimiter, |items: &mut Vec<(String, &Value)>, visit| {
            if !reported_at(depth, visit) {
                return;
            }
            if let (Some(path), Some(value)) = (visit.path, visit.node.as_value()) {
                items.push((path.to_string(), value));
            }
        })
        .max_depth(depth)
        .run(&self.tree, &mut items);
        items
    }

    /// Counts the entries [`keys`](Self::keys) would report at `depth`,
    /// optionally leaving out null leaves.
    pub fn size(&self, depth: impl Into<Depth>, ignore_none: bool) -> usize {
        let depth = depth.into();
        let mut count = 0usize;
        TreeWalk::new(&self.delimiter, |count: &mut usize, visit| {
            if visit.path.is_some()
                && reported_at(depth, visit)
                && !(ignore_none && visit.node.is_null())
            {
                *count += 1;
            }
        })
        .max_depth(depth)
        .run(&self.tree, &mut count);
        count
    }

    /// Every path in the map, branches and leaves, in first-visit order.
    pub fn paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        TreeWalk::new(&self.delimiter, |paths: &mut Vec<String>, visit| {
            if let Some(path) = visit.path {
                paths.push(path.to_string());
            }
        })
        .run(&self.tree, &mut paths);
        paths
    }
}

fn reported_at(depth: Depth, visit: &Visit<'_, '_>) -> bool {
    visit.node.is_terminal() || depth.is_cut(visit.depth)
}
