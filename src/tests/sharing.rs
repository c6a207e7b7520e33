//! Structural sharing: updates allocate only along the touched path.
//!
//! Counts nodes reachable from a new snapshot that are not shared (by
//! pointer) with the snapshot it was derived from.

use std::collections::HashSet;
use std::sync::Arc;

use crate::PersistentMap;
use crate::node::Node;

/// Maximum trie depth: 13 levels of 5 bits cover a 64-bit hash.
const MAX_DEPTH: usize = 13;

fn collect_nodes<K, V>(node: &Arc<Node<K, V>>, out: &mut HashSet<*const Node<K, V>>) {
    out.insert(Arc::as_ptr(node));
    for child in node.children() {
        collect_nodes(child, out);
    }
}

/// Counts nodes of `node`'s subtree that are absent from `old`, without
/// descending into shared subtrees.
fn count_fresh<K, V>(node: &Arc<Node<K, V>>, old: &HashSet<*const Node<K, V>>) -> usize {
    if old.contains(&Arc::as_ptr(node)) {
        return 0;
    }
    1 + node
        .children()
        .iter()
        .map(|child| count_fresh(child, old))
        .sum::<usize>()
}

fn fresh_nodes(old: &PersistentMap<u64, u64>, new: &PersistentMap<u64, u64>) -> usize {
    let mut seen = HashSet::new();
    if let Some(root) = old.root() {
        collect_nodes(root, &mut seen);
    }
    new.root().map_or(0, |root| count_fresh(root, &seen))
}

fn build(n: u64) -> PersistentMap<u64, u64> {
    (0..n).map(|i| (i, i)).collect()
}

#[test]
fn single_insert_copies_only_the_path() {
    let map = build(50_000);
    let grown = map.insert(999_999, 999_999);
    let fresh = fresh_nodes(&map, &grown);
    assert!(
        fresh <= 2 * MAX_DEPTH,
        "single insert allocated {fresh} nodes"
    );
}

#[test]
fn single_overwrite_copies_only_the_path() {
    let map = build(50_000);
    let updated = map.insert(12_345, 0);
    let fresh = fresh_nodes(&map, &updated);
    assert!(fresh <= MAX_DEPTH, "single overwrite allocated {fresh} nodes");
}

#[test]
fn single_remove_copies_only_the_path() {
    let map = build(50_000);
    let shrunk = map.remove(&25_000);
    let fresh = fresh_nodes(&map, &shrunk);
    assert!(fresh <= MAX_DEPTH, "single remove allocated {fresh} nodes");
}

#[test]
fn untouched_root_children_are_shared() {
    let map = build(10_000);
    let grown = map.insert(77_777, 1);

    let (Some(old_root), Some(new_root)) = (map.root(), grown.root()) else {
        panic!("non-empty maps have roots");
    };
    let old_children: HashSet<_> = old_root.children().iter().map(Arc::as_ptr).collect();
    let shared = new_root
        .children()
        .iter()
        .filter(|child| old_children.contains(&Arc::as_ptr(*child)))
        .count();

    // At most one root slot lies on the insertion path.
    assert!(shared + 1 >= old_root.children().len());
}

#[test]
fn removing_absent_key_allocates_nothing() {
    let map = build(1_000);
    let same = map.remove(&5_000);
    assert_eq!(fresh_nodes(&map, &same), 0);
}

#[test]
fn dropping_old_version_keeps_new_one_intact() {
    let map = build(2_000);
    let derived = map.insert(9_999, 9_999).remove(&0);
    drop(map);

    assert_eq!(derived.len(), 2_000);
    assert_eq!(derived.get(&9_999), Some(&9_999));
    assert_eq!(derived.get(&0), None);
    assert_eq!(derived.get(&1_999), Some(&1_999));
}
