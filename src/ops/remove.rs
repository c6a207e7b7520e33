//! Removal operation — path-copy delete with canonical inlining.

use std::hash::Hash;
use std::sync::Arc;

use super::{inserting, removing, replacing};
use crate::adhash;
use crate::node::{self, Entry, Node};

/// Outcome of a recursive remove.
pub enum RemoveOutcome<K, V> {
    /// Key was not found — subtree unchanged.
    NotFound,
    /// Key was removed.
    Removed {
        /// New root of the modified subtree, or `None` if the subtree is now empty.
        node: Option<Arc<Node<K, V>>>,
        /// Wrapping `AdHash` delta to subtract from the parent's adhash.
        adhash_delta: u64,
    },
}

/// Removes `key` from the subtree rooted at `node`, returning a new subtree
/// that shares every untouched child with the old one.
pub fn remove_recursive<K, V>(node: &Node<K, V>, hash: u64, key: &K, shift: u32) -> RemoveOutcome<K, V>
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
        } => remove_from_inner(
            *data_map, *node_map, entries, children, *adhash, hash, key, shift,
        ),
        Node::Collision {
            hash: node_hash,
            entries,
            adhash,
        } => remove_from_collision(*node_hash, entries, *adhash, hash, key),
    }
}

// ---------------------------------------------------------------------------
// Inner node remove
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
fn remove_from_inner<K, V>(
    data_map: u32,
    node_map: u32,
    entries: &[Entry<K, V>],
    children: &[Arc<Node<K, V>>],
    adhash: u64,
    hash: u64,
    key: &K,
    shift: u32,
) -> RemoveOutcome<K, V>
where
    K: Hash + Eq + Clone,
    V: Hash + Clone,
{
    let bit = node::mask(node::fragment(hash, shift));

    if data_map & bit != 0 {
        let pos = node::index(data_map, bit);
        let existing = &entries[pos];
        if existing.hash != hash || existing.key != *key {
            return RemoveOutcome::NotFound;
        }
        let removed_contrib = adhash::contribution(existing.hash, &existing.value);

        let new_data_map = data_map & !bit;
        // Removing the last entry of a childless node empties the subtree.
        if new_data_map == 0 && node_map == 0 {
            return RemoveOutcome::Removed {
                node: None,
                adhash_delta: removed_contrib,
            };
        }

        let node = Node::Inner {
            data_map: new_data_map,
            node_map,
            entries: removing(entries, pos),
            children: children.to_vec(),
            adhash: adhash.wrapping_sub(removed_contrib),
        };
        return RemoveOutcome::Removed {
            node: Some(Arc::new(node)),
            adhash_delta: removed_contrib,
        };
    }

    if node_map & bit == 0 {
        return RemoveOutcome::NotFound;
    }

    let child_pos = node::index(node_map, bit);
    let RemoveOutcome::Removed {
        node: new_child,
        adhash_delta,
    } = remove_recursive(&children[child_pos], hash, key, shift + node::BITS_PER_LEVEL)
    else {
        return RemoveOutcome::NotFound;
    };

    let node = match new_child {
        // Canonical form: a single-entry leaf moves back into this node.
        Some(child) if should_inline(&child) => {
            let new_data_map = data_map | bit;
            let insert_at = node::index(new_data_map, bit);
            Node::Inner {
                data_map: new_data_map,
                node_map: node_map & !bit,
                entries: inserting(entries, insert_at, child.entries()[0].clone()),
                children: removing(children, child_pos),
                adhash: adhash.wrapping_sub(adhash_delta),
            }
        }
        Some(child) => Node::Inner {
            data_map,
            node_map,
            entries: entries.to_vec(),
            children: replacing(children, child_pos, child),
            adhash: adhash.wrapping_sub(adhash_delta),
        },
        None => {
            let new_node_map = node_map & !bit;
            if data_map == 0 && new_node_map == 0 {
                return RemoveOutcome::Removed {
                    node: None,
                    adhash_delta,
                };
            }
            Node::Inner {
                data_map,
                node_map: new_node_map,
                entries: entries.to_vec(),
                children: removing(children, child_pos),
                adhash: adhash.wrapping_sub(adhash_delta),
            }
        }
    };
    RemoveOutcome::Removed {
        node: Some(Arc::new(node)),
        adhash_delta,
    }
}

/// Canonical form: a child with exactly one entry and no children
/// is inlined back into the parent.
const fn should_inline<K, V>(node: &Node<K, V>) -> bool {
    match node {
        Node::Inner {
            data_map, node_map, ..
        } => data_map.is_power_of_two() && *node_map == 0,
        Node::Collision { .. } => false,
    }
}

// ---------------------------------------------------------------------------
// Collision node remove
// ---------------------------------------------------------------------------

fn remove_from_collision<K, V>(
    node_hash: u64,
    entries: &[Entry<K, V>],
    adhash: u64,
    hash: u64,
    key: &K,
) -> RemoveOutcome<K, V>
where
    K: Hash + Eq + Clone,
    V: Hash + Clone,
{
    if hash != node_hash {
        return RemoveOutcome::NotFound;
    }
    let Some(pos) = entries.iter().position(|e| e.key == *key) else {
        return RemoveOutcome::NotFound;
    };
    let removed_contrib = adhash::contribution(entries[pos].hash, &entries[pos].value);

    let node = if entries.len() == 2 {
        // One survivor: hand it up as a single-entry leaf so the parent
        // inlines it. Its bitmap position is never consulted.
        let remaining = entries[1 - pos].clone();
        let contrib = adhash::contribution(remaining.hash, &remaining.value);
        Node::singleton(remaining, contrib, 0)
    } else {
        Node::Collision {
            hash: node_hash,
            entries: removing(entries, pos),
            adhash: adhash.wrapping_sub(removed_contrib),
        }
    };
    RemoveOutcome::Removed {
        node: Some(Arc::new(node)),
        adhash_delta: removed_contrib,
    }
}
