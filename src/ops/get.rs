//! Lookup operation — walks the trie along the key's hash fragments.

use crate::node::{self, Node};

/// Searches for `key` in the subtree rooted at `node`.
///
/// Returns a reference to the value if found.
pub fn get_recursive<'a, K, V>(node: &'a Node<K, V>, hash: u64, key: &K, shift: u32) -> Option<&'a V>
where
    K: Eq,
{
    match node {
        Node::Inner {
            data_map,
            node_map,
            entries,
            children,
            ..
        } => {
            let bit = node::mask(node::fragment(hash, shift));

            if data_map & bit != 0 {
                let entry = &entries[node::index(*data_map, bit)];
                (entry.hash == hash && entry.key == *key).then_some(&entry.value)
            } else if node_map & bit != 0 {
                let child = &children[node::index(*node_map, bit)];
                get_recursive(child, hash, key, shift + node::BITS_PER_LEVEL)
            } else {
                None
            }
        }
        Node::Collision {
            hash: node_hash,
            entries,
            ..
        } => {
            if hash != *node_hash {
                return None;
            }
            entries
                .iter()
                .find(|entry| entry.key == *key)
                .map(|entry| &entry.value)
        }
    }
}
