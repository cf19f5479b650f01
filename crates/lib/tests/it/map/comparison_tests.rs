//! Diff and equality across maps.

use pathmap::{Delimiter, PathMap, Tree, Value, map::CompareOptions};

use crate::helpers::*;

#[test]
fn test_equal_regardless_of_order_and_delimiter() {
    let a = sample_map(sample_tree());
    let mut b = PathMap::from_flattened(
        a.flatten().iter().rev().map(|(p, v)| (p.clone(), v.clone())),
        Delimiter::default(),
    );
    b.set_delimiter(Delimiter::new("/").unwrap());

    assert_eq!(a, b);
    assert!(a.diff(&b).is_empty());
}

#[test]
fn test_diff_reports_type_changes() {
    let a = sample_map(sample_tree());
    let mut b = a.clone();
    b.set("train;optimizer", "adam");

    let diff = a.diff(&b);
    assert_eq!(
        diff.get("train;optimizer;name"),
        Some(&(Some(Value::Text("sgd".into())), None))
    );
    assert_eq!(
        diff.get("train;optimizer;momentum"),
        Some(&(Some(Value::Float(0.9)), None))
    );
    assert_eq!(
        diff.get("train;optimizer"),
        Some(&(None, Some(Value::Text("adam".into()))))
    );
    assert_eq!(diff.len(), 3);
}

#[test]
fn test_empty_sections_take_part_in_comparison() {
    let a = sample_map(sample_tree());
    let mut b = a.clone();
    b.delete("hooks").unwrap();

    assert_ne!(a, b);
    assert_eq!(
        a.diff(&b).get("hooks"),
        Some(&(Some(Value::Map(Tree::new())), None))
    );
}

#[test]
fn test_excluded_subtrees_on_both_sides() {
    let a = sample_map(sample_tree());
    let mut b = a.clone();
    b.set("train;optimizer;nesterov", true);
    b.set("train;lr", 0.2);

    let options = CompareOptions::default().exclude("train");
    assert!(a.equals_with(&b, &options));

    let options = CompareOptions::default().exclude("train;optimizer");
    let diff = a.diff_with(&b, &options);
    assert_eq!(diff.keys().collect::<Vec<_>>(), vec!["train;lr"]);
}

#[test]
fn test_exclusion_respects_segment_boundaries() {
    let a = sample_map(Tree::new().with("train", 1).with("trainer", 1));
    let b = sample_map(Tree::new().with("train", 2).with("trainer", 2));

    let diff = a.diff_with(&b, &CompareOptions::default().exclude("train"));
    assert_eq!(diff.keys().collect::<Vec<_>>(), vec!["trainer"]);
}

#[test]
fn test_ignore_none_only_looks_left() {
    let a = sample_map(Tree::new().with("x", Value::Null).with("y", 1));
    let b = sample_map(Tree::new().with("x", 5).with("y", 1));

    let options = CompareOptions::default().ignore_none(true);
    assert!(a.equals_with(&b, &options));
    assert!(!b.equals_with(&a, &options));
}
