//! Depth-first traversal of a [`Tree`].
//!
//! [`TreeWalk`] is the single traversal primitive behind every depth-bounded
//! view of a [`PathMap`](crate::PathMap): keys, values, items, size and paths
//! are all one walk with a different action.
//!
//! The walk is pre-order. It visits the implicit root first (path `None`,
//! depth 0) and then every child in insertion order, one depth level per
//! nesting step. A child's path is its parent's path joined with the child key;
//! children of the root use the bare key.
//!
//! At each node the stop conditions run first. If any of them holds, the node
//! contributes nothing and its subtree is skipped. Otherwise the action runs,
//! on branches as well as leaves, and the walk descends.
//!
//! # Usage
//!
//! ```rust
//! use pathmap::{Tree, path::Delimiter, walk::TreeWalk};
//!
//! let tree = Tree::new()
//!     .with("a", Tree::new().with("b", 1).with("c", 2))
//!     .with("d", 3);
//! let delimiter = Delimiter::default();
//!
//! let mut leaves = Vec::new();
//! TreeWalk::new(&delimiter, |leaves: &mut Vec<String>, visit| {
//!     if let Some(path) = visit.path {
//!         if visit.node.is_terminal() {
//!             leaves.push(path.to_string());
//!         }
//!     }
//! })
//! .run(&tree, &mut leaves);
//!
//! assert_eq!(leaves, vec!["a;b", "a;c", "d"]);
//! ```

use std::collections::HashMap;

use crate::path::{Delimiter, Depth};
use crate::tree::Tree;
use crate::value::Value;

/// A node reached by the walk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Node<'t> {
    /// The implicit root of the walk
    Root(&'t Tree),
    /// Any node below the root
    Value(&'t Value),
}

impl<'t> Node<'t> {
    /// Returns the children of this node, if it is a map
    pub fn as_tree(&self) -> Option<&'t Tree> {
        match self {
            Node::Root(tree) => Some(tree),
            Node::Value(Value::Map(tree)) => Some(tree),
            Node::Value(_) => None,
        }
    }

    /// Returns the value at this node. The root has none.
    pub fn as_value(&self) -> Option<&'t Value> {
        match self {
            Node::Root(_) => None,
            Node::Value(value) => Some(value),
        }
    }

    /// Returns true if the walk cannot descend below this node.
    pub fn is_terminal(&self) -> bool {
        self.as_tree().is_none_or(Tree::is_empty)
    }

    /// Returns true if this node is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, Node::Value(Value::Null))
    }
}

/// Everything an action or stop condition can see about the current node.
#[derive(Debug, Clone, Copy)]
pub struct Visit<'t, 'p> {
    /// Root of the whole walk
    pub root: &'t Tree,
    /// Current node
    pub node: Node<'t>,
    /// Absolute path of the node, `None` at the root
    pub path: Option<&'p str>,
    /// Depth of the node, 0 at the root
    pub depth: usize,
}

type Action<'t, 'f, R> = Box<dyn for<'p> FnMut(&mut R, &Visit<'t, 'p>) + 'f>;
type StopCondition<'t, 'f, R> = Box<dyn for<'p> Fn(&R, &Visit<'t, 'p>) -> bool + 'f>;

/// A configured depth-first walk over a [`Tree`], accumulating into `R`.
///
/// The accumulator is mutated in place; the walk returns nothing. Panics in
/// actions or stop conditions propagate to the caller.
pub struct TreeWalk<'t, 'f, R> {
    delimiter: &'f Delimiter,
    max_depth: Depth,
    stop_conditions: Vec<StopCondition<'t, 'f, R>>,
    action: Action<'t, 'f, R>,
    path_actions: HashMap<String, Action<'t, 'f, R>>,
}

impl<'t, 'f, R> TreeWalk<'t, 'f, R> {
    /// Creates an unbounded walk running `action` on every visited node.
    pub fn new<A>(delimiter: &'f Delimiter, action: A) -> Self
    where
        A: for<'p> FnMut(&mut R, &Visit<'t, 'p>) + 'f,
    {
        Self {
            delimiter,
            max_depth: Depth::Unbounded,
            stop_conditions: Vec::new(),
            action: Box::new(action),
            path_actions: HashMap::new(),
        }
    }

    /// Bounds the walk: nodes deeper than `depth` are neither visited nor expanded.
    pub fn max_depth(mut self, depth: impl Into<Depth>) -> Self {
        self.max_depth = depth.into();
        self
    }

    /// Adds a stop condition. The node is skipped if any condition holds.
    pub fn stop_when<C>(mut self, condition: C) -> Self
    where
        C: for<'p> Fn(&R, &Visit<'t, 'p>) -> bool + 'f,
    {
        self.stop_conditions.push(Box::new(condition));
        self
    }

    /// Replaces the default action for the node at exactly `path`.
    pub fn on_path<A>(mut self, path: impl Into<String>, action: A) -> Self
    where
        A: for<'p> FnMut(&mut R, &Visit<'t, 'p>) + 'f,
    {
        self.path_actions.insert(path.into(), Box::new(action));
        self
    }

    /// Runs the walk from `root`, accumulating into `result`.
    pub fn run(mut self, root: &'t Tree, result: &mut R) {
        self.visit(root, result, Node::Root(root), None, 0);
    }

    fn should_stop(&self, result: &R, visit: &Visit<'t, '_>) -> bool {
        self.max_depth.exceeded_by(visit.depth)
            || self
                .stop_conditions
                .iter()
                .any(|condition| condition(result, visit))
    }

    fn visit(
        &mut self,
        root: &'t Tree,
        result: &mut R,
        node: Node<'t>,
        path: Option<&str>,
        depth: usize,
    ) {
        let visit = Visit {
            root,
            node,
            path,
            depth,
        };
        if self.should_stop(result, &visit) {
            return;
        }

        let action = match path.and_then(|p| self.path_actions.get_mut(p)) {
            Some(specific) => specific,
            None => &mut self.action,
        };
        action(result, &visit);

        if let Some(children) = node.as_tree() {
            for (key, child) in children {
                let child_path = match path {
                    Some(parent) => self.delimiter.join(parent, key),
                    None => key.clone(),
                };
                self.visit(root, result, Node::Value(child), Some(&child_path), depth + 1);
            }
        }
    }
}

/// Stop condition that holds below `max`. [`TreeWalk::max_depth`] folds the
/// same check into every walk; this form is for composing by hand.
pub fn depth_exceeds<R>(max: Depth) -> impl for<'t, 'p> Fn(&R, &Visit<'t, 'p>) -> bool {
    move |_: &R, visit: &Visit<'_, '_>| max.exceeded_by(visit.depth)
}

/// Stop condition that skips `subtree` and everything below it.
pub fn skip_subtree<R>(
    subtree: impl Into<String>,
    delimiter: Delimiter,
) -> impl for<'t, 'p> Fn(&R, &Visit<'t, 'p>) -> bool {
    let subtree = subtree.into();
    move |_: &R, visit: &Visit<'_, '_>| {
        visit
            .path
            .is_some_and(|path| delimiter.is_within(path, &subtree))
    }
}
