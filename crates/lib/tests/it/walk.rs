//! TreeWalk integration tests over realistic config trees.

use pathmap::{
    Delimiter, Depth, Tree, Value,
    walk::{Node, TreeWalk, depth_exceeds, skip_subtree},
};

use crate::helpers::*;

#[test]
fn test_collect_branches_only() {
    let tree = sample_tree();
    let delimiter = Delimiter::default();
    let mut branches: Vec<String> = Vec::new();

    TreeWalk::new(&delimiter, |branches: &mut Vec<String>, visit| {
        if let (Some(path), Some(Value::Map(children))) = (visit.path, visit.node.as_value()) {
            if !children.is_empty() {
                branches.push(path.to_string());
            }
        }
    })
    .run(&tree, &mut branches);

    assert_eq!(branches, vec!["model", "train", "train;optimizer"]);
}

#[test]
fn test_root_is_visited_once_with_whole_tree() {
    let tree = sample_tree();
    let delimiter = Delimiter::default();
    let mut roots = 0usize;

    TreeWalk::new(&delimiter, |roots: &mut usize, visit| {
        if let Node::Root(root) = visit.node {
            assert_eq!(visit.depth, 0);
            assert!(std::ptr::eq(root, visit.root));
            *roots += 1;
        }
    })
    .run(&tree, &mut roots);

    assert_eq!(roots, 1);
}

#[test]
fn test_stop_conditions_compose() {
    let tree = sample_tree();
    let delimiter = Delimiter::default();
    let mut seen: Vec<String> = Vec::new();

    TreeWalk::new(&delimiter, |seen: &mut Vec<String>, visit| {
        if let Some(path) = visit.path {
            seen.push(path.to_string());
        }
    })
    .stop_when(skip_subtree("model", delimiter.clone()))
    .stop_when(depth_exceeds(Depth::Limited(2)))
    .run(&tree, &mut seen);

    assert_eq!(
        seen,
        vec![
            "train",
            "train;lr",
            "train;epochs",
            "train;schedule",
            "train;optimizer",
            "hooks",
            "seed",
        ]
    );
}

#[test]
fn test_early_exit_once_found() {
    let tree = sample_tree();
    let delimiter = Delimiter::default();
    let mut found: Option<String> = None;

    TreeWalk::new(&delimiter, |found: &mut Option<String>, visit| {
        if visit.node.as_value() == Some(&Value::Text("sgd".into())) {
            *found = visit.path.map(str::to_string);
        }
    })
    .stop_when(|found: &Option<String>, _| found.is_some())
    .run(&tree, &mut found);

    assert_eq!(found.as_deref(), Some("train;optimizer;name"));
}

#[test]
fn test_path_action_overrides_default() {
    let tree = sample_tree();
    let delimiter = Delimiter::default();
    let mut nulls: Vec<String> = Vec::new();

    TreeWalk::new(&delimiter, |nulls: &mut Vec<String>, visit| {
        if visit.node.is_null() {
            nulls.push(visit.path.unwrap_or_default().to_string());
        }
    })
    .on_path("model;dropout", |nulls: &mut Vec<String>, _| {
        nulls.push("handled".to_string());
    })
    .run(&tree, &mut nulls);

    assert_eq!(nulls, vec!["handled"]);
}

#[test]
fn test_empty_tree_visits_root_only() {
    let tree = Tree::new();
    let delimiter = Delimiter::default();
    let mut depths: Vec<usize> = Vec::new();

    TreeWalk::new(&delimiter, |depths: &mut Vec<usize>, visit| {
        assert!(visit.node.is_terminal());
        depths.push(visit.depth);
    })
    .run(&tree, &mut depths);

    assert_eq!(depths, vec![0]);
}
