//! Structural comparison of [`PathMap`]s.
//!
//! Both operations work on the flat views, so two maps are equal exactly when
//! they hold the same leaves (and empty-map placeholders) at the same paths.
//! Sibling order and delimiters do not matter.

use indexmap::IndexMap;

use crate::value::Value;

use super::PathMap;

/// Paths whose values differ, mapped to `(self, other)`.
///
/// `None` marks a path that is absent on that side.
pub type Diff = IndexMap<String, (Option<Value>, Option<Value>)>;

/// Options for [`PathMap::diff_with`] and [`PathMap::equals_with`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompareOptions {
    /// Paths left out of the comparison, together with everything below them
    pub excludes: Vec<String>,
    /// Leave out paths whose value in `self` is null
    pub ignore_none: bool,
}

impl CompareOptions {
    /// Builder method to exclude a path and its subtree
    pub fn exclude(mut self, path: impl Into<String>) -> Self {
        self.excludes.push(path.into());
        self
    }

    /// Builder method to skip null values on the left side
    pub fn ignore_none(mut self, ignore: bool) -> Self {
        self.ignore_none = ignore;
        self
    }
}

impl PathMap {
    /// Returns true if both maps hold the same values at the same paths.
    pub fn equals(&self, other: &PathMap) -> bool {
        self.equals_with(other, &CompareOptions::default())
    }

    /// [`equals`](Self::equals) restricted by `options`.
    pub fn equals_with(&self, other: &PathMap, options: &CompareOptions) -> bool {
        self.diff_with(other, options).is_empty()
    }

    /// Returns every path whose value differs between the two maps.
    ///
    /// Paths of `other` are re-expressed with this map's delimiter. Paths only
    /// in `self` come first, in flat order, followed by paths only in `other`.
    pub fn diff(&self, other: &PathMap) -> Diff {
        self.diff_with(other, &CompareOptions::default())
    }

    /// [`diff`](Self::diff) restricted by `options`.
    pub fn diff_with(&self, other: &PathMap, options: &CompareOptions) -> Diff {
        let excluded = |path: &str| {
            options
                .excludes
                .iter()
                .any(|exclude| self.delimiter.is_within(path, exclude))
        };
        let theirs: IndexMap<String, &Value> = other
            .flat
            .iter()
            .map(|(path, value)| (other.delimiter.convert(path, &self.delimiter), value))
            .collect();

        let mut diff = Diff::new();
        for (path, ours) in &self.flat {
            if excluded(path) || (options.ignore_none && ours.is_null()) {
                continue;
            }
            match theirs.get(path) {
                Some(&value) if value == ours => {}
                theirs_value => {
                    let theirs_value = theirs_value.map(|&value| value.clone());
                    diff.insert(path.clone(), (Some(ours.clone()), theirs_value));
                }
            }
        }
        for (path, value) in theirs {
            if self.flat.contains_key(&path) || excluded(&path) {
                continue;
            }
            diff.insert(path, (None, Some(value.clone())));
        }
        diff
    }
}

impl PartialEq for PathMap {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}
