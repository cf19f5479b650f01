//! Worked examples of the core PathMap behaviors.

use pathmap::{Depth, PathMap, Tree, Value};

use crate::helpers::*;

#[test]
fn test_flatten_and_keys_by_depth() {
    let pm = sample_map(Tree::new().with("a", Tree::new().with("b", 1).with("c", 2)));

    assert_eq!(
        flat_of(&pm),
        vec![
            ("a;b".to_string(), Value::Int(1)),
            ("a;c".to_string(), Value::Int(2)),
        ]
    );
    assert_eq!(pm.keys(1), vec!["a"]);
    assert_eq!(pm.keys(2), vec!["a;b", "a;c"]);
}

#[test]
fn test_delete_last_child_leaves_empty_parent() {
    let mut pm = sample_map(Tree::new().with("a", Tree::new().with("b", 1)));
    pm.delete("a;b").unwrap();

    assert_eq!(pm.tree(), &Tree::new().with("a", Tree::new()));
    assert_eq!(flat_of(&pm), vec![("a".to_string(), Value::Map(Tree::new()))]);
    assert_consistent(&pm);
}

#[test]
fn test_set_through_scalar_overwrites_it() {
    let mut pm = sample_map(Tree::new().with("a", 1));
    pm.set("a;b", 2);

    assert_eq!(pm.tree(), &Tree::new().with("a", Tree::new().with("b", 2)));
    assert!(!pm.flatten().contains_key("a"));
    assert_eq!(pm.flatten().get("a;b"), Some(&Value::Int(2)));
    assert_consistent(&pm);
}

#[test]
fn test_diff_of_two_maps() {
    let pm1 = sample_map(Tree::new().with("x", 1));
    let pm2 = sample_map(Tree::new().with("x", 2).with("y", 3));

    let diff = pm1.diff(&pm2);
    let entries: Vec<_> = diff.into_iter().collect();
    assert_eq!(
        entries,
        vec![
            ("x".to_string(), (Some(Value::Int(1)), Some(Value::Int(2)))),
            ("y".to_string(), (None, Some(Value::Int(3)))),
        ]
    );
}

#[test]
fn test_training_config_views() {
    let pm = sample_map(sample_tree());

    assert_eq!(pm.keys(1), vec!["model", "train", "hooks", "seed"]);
    assert_eq!(
        pm.keys(2),
        vec![
            "model;name",
            "model;depth",
            "model;dropout",
            "train;lr",
            "train;epochs",
            "train;schedule",
            "train;optimizer",
            "hooks",
            "seed",
        ]
    );
    assert_eq!(pm.size(Depth::Unbounded, false), 10);
    assert_eq!(pm.size(Depth::Unbounded, true), 9);
    assert_eq!(pm.len(), 4);
    assert!(pm.paths().contains(&"train;optimizer;momentum".to_string()));
    assert_consistent(&pm);
}

#[test]
fn test_lookup_errors_name_the_path() {
    let pm = PathMap::from(sample_tree());
    let err = pm.lookup("train;warmup").unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Path not found: train;warmup");
}
