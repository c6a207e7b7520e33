//! Insertion operation — path-copy insert with `AdHash` maintenance.

use std::hash::Hash;
use std::sync::Arc;

use super::{inserting, removing, replacing};
use crate::adhash;
use crate::node::{self, Entry, Node};

/// Outcome of a recursive insert.
pub struct InsertOutcome<K, V> {
    /// New root of the modified subtree.
    pub node: Arc<Node<K, V>>,
    /// Wrapping `AdHash` delta to add to the parent's adhash.
    pub adhash_delta: u64,
    /// `true` if a new key was inserted, `false` if an existing value was updated.
    pub inserted: bool,
}

/// Inserts `entry` into the subtree rooted at `node`, returning a new
/// subtree that shares every untouched child with the old one.
pub fn insert_recursive<K, V>(node: &Node<K, V>, entry: Entry<K, V>, shift: u32) -> InsertOutcome<K, V>
where
    K: Hash + Eq + Clone,
    V: Hash + Clone,
{
    match node {
        Node::Inner {
            data_map,
            node_map,
            entries,
            children,
            adhash,
        } => insert_into_inner(
            *data_map, *node_map, entries, children, *adhash, entry, shift,
        ),
        Node::Collision {
            hash,
            entries,
            adhash,
        } => insert_into_collision(*hash, entries, *adhash, entry),
    }
}

// ---------------------------------------------------------------------------
// Inner node insert
// ---------------------------------------------------------------------------

fn insert_into_inner<K, V>(
    data_map: u32,
    node_map: u32,
    entries: &[Entry<K, V>],
    children: &[Arc<Node<K, V>>],
    adhash: u64,
    entry: Entry<K, V>,
    shift: u32,
) -> InsertOutcome<K, V>
where
    K: Hash + Eq + Clone,
    V: Hash + Clone,
{
    let bit = node::mask(node::fragment(entry.hash, shift));
    let new_contrib = adhash::contribution(entry.hash, &entry.value);

    if data_map & bit != 0 {
        let pos = node::index(data_map, bit);
        let existing = &entries[pos];

        if existing.hash == entry.hash && existing.key == entry.key {
            // Same key → supersede the value.
            let old_contrib = adhash::contribution(existing.hash, &existing.value);
            let delta = new_contrib.wrapping_sub(old_contrib);
            let node = Node::Inner {
                data_map,
                node_map,
                entries: replacing(entries, pos, entry),
                children: children.to_vec(),
                adhash: adhash.wrapping_add(delta),
            };
            return InsertOutcome {
                node: Arc::new(node),
                adhash_delta: delta,
                inserted: false,
            };
        }

        // Different key at same position → push both into a subtree.
        let subtree = create_subtree(existing.clone(), entry, shift + node::BITS_PER_LEVEL);
        let new_node_map = node_map | bit;
        let child_pos = node::index(new_node_map, bit);
        let node = Node::Inner {
            data_map: data_map & !bit,
            node_map: new_node_map,
            entries: removing(entries, pos),
            children: inserting(children, child_pos, subtree),
            adhash: adhash.wrapping_add(new_contrib),
        };
        InsertOutcome {
            node: Arc::new(node),
            adhash_delta: new_contrib,
            inserted: true,
        }
    } else if node_map & bit != 0 {
        // Position has child subtree → recurse.
        let child_pos = node::index(node_map, bit);
        let outcome = insert_recursive(&children[child_pos], entry, shift + node::BITS_PER_LEVEL);
        let node = Node::Inner {
            data_map,
            node_map,
            entries: entries.to_vec(),
            children: replacing(children, child_pos, outcome.node),
            adhash: adhash.wrapping_add(outcome.adhash_delta),
        };
        InsertOutcome {
            node: Arc::new(node),
            adhash_delta: outcome.adhash_delta,
            inserted: outcome.inserted,
        }
    } else {
        // Position empty → add inline entry.
        let new_data_map = data_map | bit;
        let insert_at = node::index(new_data_map, bit);
        let node = Node::Inner {
            data_map: new_data_map,
            node_map,
            entries: inserting(entries, insert_at, entry),
            children: children.to_vec(),
            adhash: adhash.wrapping_add(new_contrib),
        };
        InsertOutcome {
            node: Arc::new(node),
            adhash_delta: new_contrib,
            inserted: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Collision node insert
// ---------------------------------------------------------------------------

fn insert_into_collision<K, V>(
    node_hash: u64,
    entries: &[Entry<K, V>],
    adhash: u64,
    entry: Entry<K, V>,
) -> InsertOutcome<K, V>
where
    K: Hash + Eq + Clone,
    V: Hash + Clone,
{
    let new_contrib = adhash::contribution(entry.hash, &entry.value);

    if let Some(pos) = entries.iter().position(|e| e.key == entry.key) {
        let old_contrib = adhash::contribution(entries[pos].hash, &entries[pos].value);
        let delta = new_contrib.wrapping_sub(old_contrib);
        let node = Node::Collision {
            hash: node_hash,
            entries: replacing(entries, pos, entry),
            adhash: adhash.wrapping_add(delta),
        };
        return InsertOutcome {
            node: Arc::new(node),
            adhash_delta: delta,
            inserted: false,
        };
    }

    let node = Node::Collision {
        hash: node_hash,
        entries: inserting(entries, entries.len(), entry),
        adhash: adhash.wrapping_add(new_contrib),
    };
    InsertOutcome {
        node: Arc::new(node),
        adhash_delta: new_contrib,
        inserted: true,
    }
}

// ---------------------------------------------------------------------------
// Subtree creation
// ---------------------------------------------------------------------------

/// Creates a subtree from two entries that collide at the current depth.
///
/// Recursively descends until hash fragments differ, or creates a collision
/// node past `MAX_SHIFT`.
fn create_subtree<K, V>(e1: Entry<K, V>, e2: Entry<K, V>, shift: u32) -> Arc<Node<K, V>>
where
    V: Hash,
{
    if shift > node::MAX_SHIFT {
        let adhash = adhash::contribution(e1.hash, &e1.value)
            .wrapping_add(adhash::contribution(e2.hash, &e2.value));
        return Arc::new(Node::Collision {
            hash: e1.hash,
            entries: vec![e1, e2],
            adhash,
        });
    }

    let f1 = node::fragment(e1.hash, shift);
    let f2 = node::fragment(e2.hash, shift);

    if f1 == f2 {
        let child = create_subtree(e1, e2, shift + node::BITS_PER_LEVEL);
        let adhash = child.adhash();
        Arc::new(Node::Inner {
            data_map: 0,
            node_map: node::mask(f1),
            entries: Vec::new(),
            children: vec![child],
            adhash,
        })
    } else {
        let adhash = adhash::contribution(e1.hash, &e1.value)
            .wrapping_add(adhash::contribution(e2.hash, &e2.value));
        let entries = if f1 < f2 { vec![e1, e2] } else { vec![e2, e1] };
        Arc::new(Node::Inner {
            data_map: node::mask(f1) | node::mask(f2),
            node_map: 0,
            entries,
            children: Vec::new(),
            adhash,
        })
    }
}
