//! Property-based tests for PathMap invariants.
//!
//! - **View consistency**: every mutation leaves the flat index equal to the
//!   terminal nodes of the tree
//! - **Round trips**: `from_tree` and `from_flattened` rebuild the same map
//! - **Update idempotence**: applying the same update twice changes nothing
//! - **Resolution**: every listed path resolves, also under a delimiter like
//!   `::` that can overlap a key
//! - **Comparison coherence**: `diff` is empty exactly when maps are equal

use pathmap::{Delimiter, PathMap, Tree, Value, map::UpdateOptions};
use proptest::prelude::*;
use proptest::sample::Index;

use crate::helpers::*;

/// Plain segment keys.
const KEYS: &str = "[a-c]{1,2}";

/// Keys that may start with or contain a single `:`, for the `::` delimiter.
/// A key ending in `:` would run into the delimiter, so none do.
const COLON_KEYS: &str = ":?[a-c](:?[a-c])?";

fn colons() -> Delimiter {
    Delimiter::new("::").unwrap()
}

// Floats are left out so that equality stays reflexive.
fn leaf_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        "[a-z]{0,4}".prop_map(Value::Text),
    ]
}

fn value_strategy(keys: &'static str) -> impl Strategy<Value = Value> {
    leaf_strategy().prop_recursive(3, 24, 4, move |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..3).prop_map(Value::List),
            prop::collection::vec((keys, inner), 0..4)
                .prop_map(|entries| Value::Map(entries.into_iter().collect())),
        ]
    })
}

fn keyed_tree_strategy(keys: &'static str) -> impl Strategy<Value = Tree> {
    prop::collection::vec((keys, value_strategy(keys)), 0..5)
        .prop_map(|entries| entries.into_iter().collect())
}

fn tree_strategy() -> impl Strategy<Value = Tree> {
    keyed_tree_strategy(KEYS)
}

fn path_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(KEYS, 1..4).prop_map(|segments| segments.join(";"))
}

fn colon_path_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(COLON_KEYS, 1..4).prop_map(|segments| segments.join("::"))
}

fn check_delete(mut map: PathMap, pick: Index) -> Result<(), TestCaseError> {
    let paths = map.paths();
    if paths.is_empty() {
        return Ok(());
    }
    let path = pick.get(&paths).clone();

    let expected = map.get_value(&path).cloned();
    let removed = map.delete(&path).unwrap();
    prop_assert_eq!(Some(removed), expected);
    prop_assert!(!map.contains(&path));

    let delimiter = map.delimiter().clone();
    prop_assert!(map.flatten().keys().all(|p| !delimiter.is_within(p, &path)));
    if let Some(parent) = delimiter.parent(&path) {
        prop_assert!(map.lookup(parent).is_ok());
    }
    assert_consistent(&map);
    Ok(())
}

fn check_paths_resolve(map: &PathMap) -> Result<(), TestCaseError> {
    for path in map.paths() {
        prop_assert!(map.lookup(&path).is_ok(), "{} does not resolve", path);
    }
    for (path, value) in map.flatten() {
        prop_assert_eq!(map.get_value(path), Some(value));
    }
    Ok(())
}

proptest! {
    #[test]
    fn prop_from_tree_keeps_tree(tree in tree_strategy()) {
        let map = sample_map(tree.clone());
        prop_assert_eq!(map.tree(), &tree);
        assert_consistent(&map);
    }

    #[test]
    fn prop_flat_view_rebuilds_map(tree in tree_strategy()) {
        let map = sample_map(tree);
        let rebuilt = PathMap::from_flattened(flat_of(&map), Delimiter::default());
        prop_assert_eq!(rebuilt.tree(), map.tree());
        prop_assert_eq!(flat_of(&rebuilt), flat_of(&map));
    }

    #[test]
    fn prop_set_then_get(tree in tree_strategy(), path in path_strategy(), value in leaf_strategy()) {
        let mut map = sample_map(tree);
        map.set(&path, value.clone());
        prop_assert_eq!(map.get_value(&path), Some(&value));
        assert_consistent(&map);
    }

    #[test]
    fn prop_set_then_get_with_overlapping_delimiter(
        tree in keyed_tree_strategy(COLON_KEYS),
        path in colon_path_strategy(),
        value in leaf_strategy(),
    ) {
        let mut map = PathMap::from_tree(tree, colons());
        map.set(&path, value.clone());
        prop_assert_eq!(map.get_value(&path), Some(&value));
        check_paths_resolve(&map)?;
        assert_consistent(&map);
    }

    #[test]
    fn prop_set_nested_then_get(tree in tree_strategy(), path in path_strategy(), sub in tree_strategy()) {
        let mut map = sample_map(tree);
        map.set(&path, sub.clone());
        prop_assert_eq!(map.get_value(&path), Some(&Value::Map(sub)));
        assert_consistent(&map);
    }

    #[test]
    fn prop_delete_removes_subtree(tree in tree_strategy(), pick in any::<Index>()) {
        check_delete(sample_map(tree), pick)?;
    }

    #[test]
    fn prop_delete_with_overlapping_delimiter(tree in keyed_tree_strategy(COLON_KEYS), pick in any::<Index>()) {
        check_delete(PathMap::from_tree(tree, colons()), pick)?;
    }

    #[test]
    fn prop_paths_resolve(tree in tree_strategy()) {
        check_paths_resolve(&sample_map(tree))?;
    }

    #[test]
    fn prop_paths_resolve_with_overlapping_delimiter(tree in keyed_tree_strategy(COLON_KEYS)) {
        check_paths_resolve(&PathMap::from_tree(tree, colons()))?;
    }

    #[test]
    fn prop_update_is_idempotent(base in tree_strategy(), patch in tree_strategy()) {
        let patch = sample_map(patch);
        let mut once = sample_map(base);
        once.update(&patch, UpdateOptions::default());
        let mut twice = once.clone();
        twice.update(&patch, UpdateOptions::default());

        prop_assert_eq!(flat_of(&twice), flat_of(&once));
        assert_consistent(&once);
    }

    #[test]
    fn prop_update_with_ignore_missing_keeps_paths(base in tree_strategy(), patch in tree_strategy()) {
        let mut map = sample_map(base);
        let mut before: Vec<String> = map.flatten().keys().cloned().collect();
        map.update(&sample_map(patch), UpdateOptions::default().ignore_missing(true));
        let mut after: Vec<String> = map.flatten().keys().cloned().collect();
        before.sort();
        after.sort();
        prop_assert_eq!(after, before);
    }

    #[test]
    fn prop_diff_agrees_with_equality(a in tree_strategy(), b in tree_strategy()) {
        let a = sample_map(a);
        let b = sample_map(b);

        prop_assert!(a.diff(&a).is_empty());
        prop_assert_eq!(a.diff(&b).is_empty(), a == b);

        let mut forward: Vec<String> = a.diff(&b).into_keys().collect();
        let mut backward: Vec<String> = b.diff(&a).into_keys().collect();
        forward.sort();
        backward.sort();
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn prop_delimiter_round_trip(tree in tree_strategy()) {
        let mut map = sample_map(tree);
        let original = flat_of(&map);
        map.set_delimiter(Delimiter::new("/").unwrap());
        assert_consistent(&map);
        map.set_delimiter(Delimiter::default());
        prop_assert_eq!(flat_of(&map), original);
    }
}
