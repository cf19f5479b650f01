//! The tree view of a nested mapping.
//!
//! [`Tree`] is an insertion-ordered mapping from segment keys to [`Value`]s.
//! Sibling order is preserved because it is visible through ordered
//! enumeration (`keys`, `values`, `items`, `paths`), while equality ignores it.
//!
//! Keys are plain segment strings: a `Tree` knows nothing about delimiters.

use std::fmt;

use indexmap::IndexMap;

use crate::value::Value;

/// Insertion-ordered `String -> Value` mapping.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Tree {
    children: IndexMap<String, Value>,
}

impl Tree {
    /// Creates a new empty tree
    pub fn new() -> Self {
        Self {
            children: IndexMap::new(),
        }
    }

    /// Returns the number of direct children
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns true if the tree has no children
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns true if a direct child exists under `key`
    pub fn contains_key(&self, key: &str) -> bool {
        self.children.contains_key(key)
    }

    /// Gets a direct child
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.children.get(key)
    }

    /// Gets a direct child mutably
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.children.get_mut(key)
    }

    /// Inserts a direct child, returning the previous value.
    ///
    /// An existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.children.insert(key.into(), value.into())
    }

    /// Removes a direct child, preserving the order of the remaining keys.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.children.shift_remove(key)
    }

    /// Returns the child tree under `key`, replacing anything that is not a
    /// map with a fresh empty one.
    ///
    /// The boolean is true when a non-map value was destroyed to make room.
    pub(crate) fn child_tree_mut(&mut self, key: &str) -> Option<(&mut Tree, bool)> {
        let entry = self
            .children
            .entry(key.to_string())
            .or_insert_with(|| Value::Map(Tree::new()));
        let replaced = !matches!(entry, Value::Map(_));
        if replaced {
            *entry = Value::Map(Tree::new());
        }
        match entry {
            Value::Map(tree) => Some((tree, replaced)),
            _ => None,
        }
    }

    /// Iterates over `(key, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.children.iter()
    }

    /// Iterates over keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.children.keys()
    }

    /// Iterates over values in insertion order
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.children.values()
    }

    /// Follows `segments` from this tree, descending through nested maps only.
    pub fn descend<I, S>(&self, segments: I) -> Option<&Value>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut segments = segments.into_iter();
        let first = segments.next()?;
        let mut current = self.get(first.as_ref())?;
        for segment in segments {
            current = current.as_map()?.get(segment.as_ref())?;
        }
        Some(current)
    }

    /// Converts to a compact JSON string.
    pub fn to_json_string(&self) -> String {
        let mut result = String::with_capacity(self.children.len() * 16);
        result.push('{');
        for (i, (key, value)) in self.children.iter().enumerate() {
            if i > 0 {
                result.push(',');
            }
            result.push_str(&serde_json::Value::String(key.clone()).to_string());
            result.push(':');
            result.push_str(&value.to_json_string());
        }
        result.push('}');
        result
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json_string())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Tree {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            children: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for Tree {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.into_iter()
    }
}

impl<'a> IntoIterator for &'a Tree {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.iter()
    }
}

// Builder pattern methods
impl Tree {
    /// Builder method to insert a child and return self
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }
}
