//! Write operations on [`PathMap`].
//!
//! Every mutation keeps the tree and the flat index in step:
//!
//! - writing through a scalar replaces it with a map and drops its flat entry
//! - replacing a subtree drops every flat entry below it
//! - a parent that gains a child loses its empty-map placeholder
//! - a non-root parent emptied by a delete gains one

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::path::Delimiter;
use crate::tree::Tree;
use crate::value::Value;

use super::{PathMap, PathMapError};

/// Options for [`PathMap::update`] and friends.
///
/// The default applies every incoming path, null values included, and
/// creates paths that do not exist yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOptions {
    /// Skip incoming null values
    pub ignore_none: bool,
    /// Skip paths that are not already in the flat index
    pub ignore_missing: bool,
}

impl UpdateOptions {
    /// Builder method to skip null values
    pub fn ignore_none(mut self, ignore: bool) -> Self {
        self.ignore_none = ignore;
        self
    }

    /// Builder method to restrict updates to existing paths
    pub fn ignore_missing(mut self, ignore: bool) -> Self {
        self.ignore_missing = ignore;
        self
    }
}

/// Computes a value for a path at update time.
///
/// A resolver sees the map as it is when its entry is applied, so it can
/// derive a value from entries written earlier in the same update. Returning
/// `None` skips the path.
///
/// Any `Fn(&PathMap, &str) -> Option<Value>` is a resolver.
pub trait Resolver {
    /// Produces the value to store at `path`, or `None` to leave it alone.
    fn resolve(&self, map: &PathMap, path: &str) -> Option<Value>;
}

impl<F> Resolver for F
where
    F: Fn(&PathMap, &str) -> Option<Value>,
{
    fn resolve(&self, map: &PathMap, path: &str) -> Option<Value> {
        self(map, path)
    }
}

/// Shape of an incoming value, decided once per `set`.
enum Shape {
    /// Stored as-is in both views
    Scalar(Value),
    /// A list whose map elements have been normalized to plain trees
    Sequence(Vec<Value>),
    /// A map, already normalized into its own tree and flat index
    Nested(PathMap),
}

impl Shape {
    fn of(value: Value, delimiter: &Delimiter) -> Self {
        match value {
            Value::Map(tree) => Shape::Nested(PathMap::from_tree(tree, delimiter.clone())),
            Value::List(items) => Shape::Sequence(
                items
                    .into_iter()
                    .map(|item| normalize_element(item, delimiter))
                    .collect(),
            ),
            scalar => Shape::Scalar(scalar),
        }
    }
}

/// Maps inside lists are normalized to plain trees, never to path maps.
fn normalize_element(value: Value, delimiter: &Delimiter) -> Value {
    match value {
        Value::Map(tree) => Value::Map(PathMap::from_tree(tree, delimiter.clone()).into_tree()),
        Value::List(items) => Value::List(
            items
                .into_iter()
                .map(|item| normalize_element(item, delimiter))
                .collect(),
        ),
        other => other,
    }
}

/// Replaces whatever the flat index holds at or below `path` with `entries`.
///
/// The new entries take the slot of the first entry they replace, or the
/// `vacated` slot of an overwritten ancestor, so rewriting keeps positions.
fn splice(
    flat: &mut IndexMap<String, Value>,
    delimiter: &Delimiter,
    path: &str,
    had_subtree: bool,
    vacated: Option<usize>,
    entries: Vec<(String, Value)>,
) {
    let slot = if had_subtree {
        let slot = flat.keys().position(|p| delimiter.is_within(p, path));
        flat.retain(|p, _| !delimiter.is_within(p, path));
        slot
    } else {
        flat.shift_remove_full(path).map(|(index, _, _)| index)
    };
    match slot.or(vacated) {
        Some(index) => {
            for (offset, (key, value)) in entries.into_iter().enumerate() {
                flat.shift_insert(index + offset, key, value);
            }
        }
        None => flat.extend(entries),
    }
}

impl PathMap {
    /// Writes `value` at `path`, creating intermediate maps as needed.
    ///
    /// A scalar met on the way is replaced by a fresh map. Whatever was at
    /// `path` before is replaced wholesale. A nested map value is normalized
    /// first, so delimited keys inside it expand into nesting too.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) {
        let shape = Shape::of(value.into(), &self.delimiter);
        let delimiter = &self.delimiter;

        // Scalars and empty-map placeholders on the way down are about to become branches.
        let mut vacated = None;
        for ancestor in delimiter.ancestors(path) {
            if let Some((index, _, _)) = self.flat.shift_remove_full(ancestor) {
                trace!(path, ancestor, "Dropped flat entry of overwritten ancestor");
                vacated = Some(index);
            }
        }

        let segments: Vec<&str> = delimiter.split(path).collect();
        let Some((last, parents)) = segments.split_last() else {
            return;
        };

        let mut node = &mut self.tree;
        for segment in parents {
            let Some((child, replaced)) = node.child_tree_mut(segment) else {
                return;
            };
            if replaced {
                trace!(path, segment = *segment, "Replaced scalar with map");
            }
            node = child;
        }

        let had_subtree = matches!(node.get(last), Some(Value::Map(tree)) if !tree.is_empty());
        let entries = match shape {
            Shape::Nested(sub) => {
                let PathMap { tree, flat, .. } = sub;
                node.insert(*last, Value::Map(tree));
                if flat.is_empty() {
                    vec![(path.to_string(), Value::Map(Tree::new()))]
                } else {
                    flat.into_iter()
                        .map(|(relative, leaf)| (delimiter.join(path, &relative), leaf))
                        .collect()
                }
            }
            Shape::Scalar(value) => {
                node.insert(*last, value.clone());
                vec![(path.to_string(), value)]
            }
            Shape::Sequence(items) => {
                node.insert(*last, Value::List(items.clone()));
                vec![(path.to_string(), Value::List(items))]
            }
        };
        splice(&mut self.flat, delimiter, path, had_subtree, vacated, entries);
        trace!(path, "Set path");
    }

    /// Removes the node at `path` and everything below it, returning it.
    ///
    /// If the parent is left empty and is not the root, it is recorded as an
    /// empty-map placeholder in the flat index.
    ///
    /// # Errors
    /// Returns [`PathMapError::PathNotFound`] if the path does not resolve. The
    /// map is left untouched in that case.
    pub fn delete(&mut self, path: &str) -> Result<Value, PathMapError> {
        let segments: Vec<&str> = self.delimiter.split(path).collect();
        let Some((last, parents)) = segments.split_last() else {
            return Err(PathMapError::not_found(path));
        };

        let mut node = &mut self.tree;
        for segment in parents {
            node = match node.get_mut(segment) {
                Some(Value::Map(child)) => child,
                _ => return Err(PathMapError::not_found(path)),
            };
        }
        let removed = node
            .remove(last)
            .ok_or_else(|| PathMapError::not_found(path))?;
        let parent_emptied = node.is_empty();

        let delimiter = &self.delimiter;
        let slot = if removed.is_terminal() {
            self.flat.shift_remove_full(path).map(|(index, _, _)| index)
        } else {
            let slot = self.flat.keys().position(|p| delimiter.is_within(p, path));
            self.flat.retain(|p, _| !delimiter.is_within(p, path));
            slot
        };

        // Rebuilt from segments: a delimiter like `::` may overlap a key.
        if parent_emptied && !parents.is_empty() {
            let parent = delimiter.join_all(parents);
            let index = slot.unwrap_or(self.flat.len()).min(self.flat.len());
            self.flat.shift_insert(index, parent, Value::Map(Tree::new()));
        }
        trace!(path, "Deleted path");
        Ok(removed)
    }

    /// Merges every flat entry of `other` into this map.
    ///
    /// Paths are re-expressed with this map's delimiter. Returns the number of
    /// paths written.
    pub fn update(&mut self, other: &PathMap, options: UpdateOptions) -> usize {
        let mut applied = 0usize;
        for (path, value) in &other.flat {
            let path = other.delimiter.convert(path, &self.delimiter);
            if (options.ignore_none && value.is_null())
                || (options.ignore_missing && !self.flat.contains_key(&path))
            {
                continue;
            }
            self.set(&path, value.clone());
            applied += 1;
        }
        debug!(
            applied,
            skipped = other.flat.len() - applied,
            "Updated from path map"
        );
        applied
    }

    /// Merges a plain tree, normalized with this map's delimiter.
    pub fn update_tree(&mut self, tree: Tree, options: UpdateOptions) -> usize {
        let other = PathMap::from_tree(tree, self.delimiter.clone());
        self.update(&other, options)
    }

    /// Applies resolvers in order, each computing the value for its path.
    ///
    /// The same options apply as for [`update`](Self::update): a missing path
    /// is skipped under `ignore_missing` before its resolver runs, and a
    /// resolved null is skipped under `ignore_none`.
    pub fn update_resolved<I, P, R>(&mut self, entries: I, options: UpdateOptions) -> usize
    where
        I: IntoIterator<Item = (P, R)>,
        P: AsRef<str>,
        R: Resolver,
    {
        let mut applied = 0usize;
        for (path, resolver) in entries {
            let path = path.as_ref();
            if options.ignore_missing && !self.flat.contains_key(path) {
                continue;
            }
            let Some(value) = resolver.resolve(self, path) else {
                continue;
            };
            if options.ignore_none && value.is_null() {
                continue;
            }
            self.set(path, value);
            applied += 1;
        }
        debug!(applied, "Applied resolved values");
        applied
    }

    /// Switches to a new delimiter, rewriting every flat key.
    ///
    /// The tree holds plain segment keys and is left as is.
    pub fn set_delimiter(&mut self, delimiter: Delimiter) {
        if delimiter == self.delimiter {
            return;
        }
        let old = std::mem::replace(&mut self.delimiter, delimiter);
        let rewritten = std::mem::take(&mut self.flat)
            .into_iter()
            .map(|(path, value)| (old.convert(&path, &self.delimiter), value))
            .collect();
        self.flat = rewritten;
        debug!(from = %old, to = %self.delimiter, paths = self.flat.len(), "Rewrote delimiter");
    }
}
