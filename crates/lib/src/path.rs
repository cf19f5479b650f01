//! Path handling for delimited string paths.
//!
//! A path is a plain string of segment keys joined by a [`Delimiter`], e.g.
//! `"user;profile;name"` with the default `;` delimiter. Paths are not
//! normalized: `"a;;b"` has three segments, the middle one empty, because a
//! tree key may legitimately be the empty string.
//!
//! # Core Types
//!
//! - [`Delimiter`] - A validated, non-empty separator string
//! - [`Depth`] - A traversal bound, either limited or unbounded
//!
//! # Usage
//!
//! ```rust
//! use pathmap::path::Delimiter;
//!
//! let delimiter = Delimiter::new("::")?;
//! let segments: Vec<&str> = delimiter.split("user::profile").collect();
//! assert_eq!(segments, vec!["user", "profile"]);
//! assert_eq!(delimiter.join("user", "name"), "user::name");
//! assert_eq!(delimiter.parent("user::profile::name"), Some("user::profile"));
//! # Ok::<(), pathmap::map::PathMapError>(())
//! ```

use std::{fmt, str::FromStr};

use crate::constants::DEFAULT_DELIMITER;
use crate::map::PathMapError;

/// A validated path separator.
///
/// Any non-empty string is accepted. The empty string is rejected because it
/// cannot split a path into segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Delimiter {
    inner: String,
}

impl Delimiter {
    /// Creates a delimiter.
    ///
    /// # Errors
    /// Returns [`PathMapError::InvalidDelimiter`] if `s` is empty.
    pub fn new(s: impl Into<String>) -> Result<Self, PathMapError> {
        let inner = s.into();
        if inner.is_empty() {
            return Err(PathMapError::InvalidDelimiter { delimiter: inner });
        }
        Ok(Self { inner })
    }

    /// Returns the delimiter as a string slice.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Splits a path into its segments.
    pub fn split<'a>(&'a self, path: &'a str) -> std::str::Split<'a, &'a str> {
        path.split(self.inner.as_str())
    }

    /// Joins a parent path with a child key.
    pub fn join(&self, parent: &str, key: &str) -> String {
        let mut joined = String::with_capacity(parent.len() + self.inner.len() + key.len());
        joined.push_str(parent);
        joined.push_str(&self.inner);
        joined.push_str(key);
        joined
    }

    /// Joins all segments into a path.
    pub fn join_all<I, S>(&self, segments: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut joined = String::new();
        for (i, segment) in segments.into_iter().enumerate() {
            if i > 0 {
                joined.push_str(&self.inner);
            }
            joined.push_str(segment.as_ref());
        }
        joined
    }

    /// Returns the parent path, or `None` for a single-segment path.
    ///
    /// Matches left to right like [`split`](Self::split), so `"a:::b"` with
    /// `::` has the parent `"a"`.
    pub fn parent<'a>(&self, path: &'a str) -> Option<&'a str> {
        self.ancestors(path).last()
    }

    /// Returns every strict ancestor of `path`, shortest first.
    ///
    /// `"a;b;c"` yields `"a"` and `"a;b"`.
    pub fn ancestors<'s, 'a>(&'s self, path: &'a str) -> impl Iterator<Item = &'a str> + use<'s, 'a> {
        path.match_indices(self.inner.as_str())
            .map(move |(at, _)| &path[..at])
    }

    /// Returns true if `path` lies strictly below `ancestor`.
    ///
    /// This is segment-aware: `"ab;c"` is not below `"a"`.
    pub fn is_descendant(&self, path: &str, ancestor: &str) -> bool {
        self.strip_ancestor(path, ancestor).is_some()
    }

    /// Returns true if `path` is `root` itself or lies below it.
    pub fn is_within(&self, path: &str, root: &str) -> bool {
        path == root || self.is_descendant(path, root)
    }

    /// Returns `path` relative to `ancestor`, if it lies strictly below it.
    pub fn strip_ancestor<'a>(&self, path: &'a str, ancestor: &str) -> Option<&'a str> {
        path.strip_prefix(ancestor)?.strip_prefix(self.inner.as_str())
    }

    /// Rewrites a path written with `self` to use `other` instead.
    pub fn convert(&self, path: &str, other: &Delimiter) -> String {
        if self == other {
            path.to_string()
        } else {
            path.replace(self.as_str(), other.as_str())
        }
    }
}

impl Default for Delimiter {
    fn default() -> Self {
        Self {
            inner: DEFAULT_DELIMITER.to_string(),
        }
    }
}

impl AsRef<str> for Delimiter {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner)
    }
}

impl FromStr for Delimiter {
    type Err = PathMapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Delimiter::new(s)
    }
}

impl TryFrom<&str> for Delimiter {
    type Error = PathMapError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Delimiter::new(s)
    }
}

impl TryFrom<String> for Delimiter {
    type Error = PathMapError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Delimiter::new(s)
    }
}

/// How deep a traversal may go below the root.
///
/// The root sits at depth 0 and its direct children at depth 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Depth {
    /// Visit nodes down to and including this depth.
    Limited(usize),
    /// No bound: expand every branch down to its leaves.
    #[default]
    Unbounded,
}

impl Depth {
    /// Returns true if a node at `depth` is beyond this bound.
    pub fn exceeded_by(self, depth: usize) -> bool {
        match self {
            Depth::Limited(max) => depth > max,
            Depth::Unbounded => false,
        }
    }

    /// Returns true if a node at `depth` sits exactly on this bound.
    pub fn is_cut(self, depth: usize) -> bool {
        matches!(self, Depth::Limited(max) if max == depth)
    }
}

impl From<usize> for Depth {
    fn from(max: usize) -> Self {
        Depth::Limited(max)
    }
}

impl From<Option<usize>> for Depth {
    fn from(max: Option<usize>) -> Self {
        max.map_or(Depth::Unbounded, Depth::Limited)
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Depth::Limited(max) => write!(f, "{max}"),
            Depth::Unbounded => write!(f, "unbounded"),
        }
    }
}
