//! Persistent CHAMP map.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops;
use std::sync::Arc;

use crate::adhash;
use crate::iter::{Iter, Keys, Values};
use crate::node::{Entry, Node};
use crate::ops::get::get_recursive;
use crate::ops::insert::insert_recursive;
use crate::ops::remove::{RemoveOutcome, remove_recursive};

/// Persistent hash map based on a CHAMP trie.
///
/// Every update returns a new snapshot; the receiver keeps observing exactly
/// the mappings it had. Snapshots share every subtree an update did not
/// touch, so `insert` and `remove` cost `O(log₃₂ n)` node copies and
/// [`Clone`] is a reference-count bump.
///
/// Same set of key-value pairs always produces the same trie structure
/// (canonical form), which keeps equality independent of build history.
///
/// ```
/// use champ_record::PersistentMap;
///
/// let v1 = PersistentMap::new().insert("a", 1);
/// let v2 = v1.insert("b", 2);
///
/// assert_eq!(v1.len(), 1);
/// assert_eq!(v2.get(&"b"), Some(&2));
/// assert_eq!(v2.remove(&"b"), v1);
/// ```
pub struct PersistentMap<K, V> {
    root: Option<Arc<Node<K, V>>>,
    size: usize,
    adhash: u64,
}

// ---------------------------------------------------------------------------
// Construction & accessors — no trait bounds
// ---------------------------------------------------------------------------

impl<K, V> PersistentMap<K, V> {
    /// Creates an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            root: None,
            size: 0,
            adhash: 0,
        }
    }

    /// Returns the number of key-value pairs.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the current `AdHash` value.
    ///
    /// Equal maps always have equal `AdHash`; unequal maps collide with
    /// probability around 2⁻⁶⁴.
    #[must_use]
    pub const fn adhash(&self) -> u64 {
        self.adhash
    }

    /// Returns `true` if both maps are backed by the same root node.
    ///
    /// Identity implies equality; the converse does not hold.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.root, &other.root) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    /// Returns an iterator over `(&K, &V)` pairs, in unspecified order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.root.as_deref(), self.size)
    }

    /// Returns an iterator over the keys.
    #[must_use]
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    /// Returns an iterator over the values.
    #[must_use]
    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    /// Returns `true` if some key maps to a value equal to `value`.
    ///
    /// Linear in the number of entries.
    #[must_use]
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.values().any(|v| v == value)
    }

    #[cfg(test)]
    pub(crate) const fn root(&self) -> Option<&Arc<Node<K, V>>> {
        self.root.as_ref()
    }
}

// ---------------------------------------------------------------------------
// Read operations — K: Hash + Eq
// ---------------------------------------------------------------------------

impl<K: Hash + Eq, V> PersistentMap<K, V> {
    /// Returns a reference to the value associated with `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        let root = self.root.as_deref()?;
        get_recursive(root, adhash::hash_one(key), key, 0)
    }

    /// Returns `true` if the map contains the given key.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }
}

// ---------------------------------------------------------------------------
// Write operations — K: Hash + Eq + Clone, V: Hash + Clone
// ---------------------------------------------------------------------------

impl<K: Hash + Eq + Clone, V: Hash + Clone> PersistentMap<K, V> {
    /// Returns a new map with `key` associated to `value`.
    ///
    /// An existing mapping for `key` is superseded in the returned map only.
    #[must_use]
    pub fn insert(&self, key: K, value: V) -> Self {
        let mut next = self.clone();
        next.insert_in_place(key, value);
        next
    }

    /// Returns a new map without `key`.
    ///
    /// If `key` is absent the result shares this map's root.
    #[must_use]
    pub fn remove(&self, key: &K) -> Self {
        let mut next = self.clone();
        next.remove_in_place(key);
        next
    }

    /// Returns a new map without any of `keys`. Absent keys are skipped.
    #[must_use]
    pub fn remove_all<'k, I>(&self, keys: I) -> Self
    where
        I: IntoIterator<Item = &'k K>,
        K: 'k,
    {
        let mut next = self.clone();
        for key in keys {
            if next.is_empty() {
                break;
            }
            next.remove_in_place(key);
        }
        next
    }

    /// Returns a new map holding only this map's mappings for `keys`.
    ///
    /// Keys absent from this map are skipped; repeated keys are harmless.
    #[must_use]
    pub fn select<'k, I>(&self, keys: I) -> Self
    where
        I: IntoIterator<Item = &'k K>,
        K: 'k,
    {
        let mut selected = Self::new();
        for key in keys {
            if let Some(value) = self.get(key) {
                selected.insert_in_place(key.clone(), value.clone());
            }
        }
        selected
    }

    /// Re-points this handle at a new root that includes `(key, value)`.
    ///
    /// Only this handle changes; nodes shared with other snapshots are
    /// copied, never written.
    fn insert_in_place(&mut self, key: K, value: V) {
        let hash = adhash::hash_one(&key);
        let entry = Entry { hash, key, value };

        if let Some(root) = &self.root {
            let outcome = insert_recursive(root, entry, 0);
            self.root = Some(outcome.node);
            self.adhash = self.adhash.wrapping_add(outcome.adhash_delta);
            if outcome.inserted {
                self.size += 1;
            }
        } else {
            let contribution = adhash::contribution(hash, &entry.value);
            self.root = Some(Arc::new(Node::singleton(entry, contribution, 0)));
            self.size = 1;
            self.adhash = contribution;
        }
    }

    fn remove_in_place(&mut self, key: &K) {
        let Some(root) = &self.root else {
            return;
        };
        let hash = adhash::hash_one(key);
        if let RemoveOutcome::Removed { node, adhash_delta } = remove_recursive(root, hash, key, 0) {
            self.root = node;
            self.size -= 1;
            self.adhash = self.adhash.wrapping_sub(adhash_delta);
        }
    }
}

// ---------------------------------------------------------------------------
// Structural equality
// ---------------------------------------------------------------------------

/// Compares two subtrees of canonical tries.
///
/// Canonical form guarantees equal contents have equal shapes, so inner
/// nodes compare position by position. Collision buckets keep insertion
/// order and compare as sets.
fn nodes_eq<K: Eq, V: PartialEq>(a: &Arc<Node<K, V>>, b: &Arc<Node<K, V>>) -> bool {
    if Arc::ptr_eq(a, b) {
        return true;
    }
    if a.adhash() != b.adhash() {
        return false;
    }
    match (&**a, &**b) {
        (
            Node::Inner {
                data_map: dm_a,
                node_map: nm_a,
                entries: es_a,
                children: cs_a,
                ..
            },
            Node::Inner {
                data_map: dm_b,
                node_map: nm_b,
                entries: es_b,
                children: cs_b,
                ..
            },
        ) => {
            dm_a == dm_b
                && nm_a == nm_b
                && es_a
                    .iter()
                    .zip(es_b)
                    .all(|(x, y)| x.hash == y.hash && x.key == y.key && x.value == y.value)
                && cs_a.iter().zip(cs_b).all(|(x, y)| nodes_eq(x, y))
        }
        (
            Node::Collision {
                hash: h_a,
                entries: es_a,
                ..
            },
            Node::Collision {
                hash: h_b,
                entries: es_b,
                ..
            },
        ) => {
            h_a == h_b
                && es_a.len() == es_b.len()
                && es_a
                    .iter()
                    .all(|x| es_b.iter().any(|y| x.key == y.key && x.value == y.value))
        }
        _ => false,
    }
}

impl<K: Eq, V: PartialEq> PartialEq for PersistentMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        if self.size != other.size || self.adhash != other.adhash {
            return false;
        }
        match (&self.root, &other.root) {
            (Some(a), Some(b)) => nodes_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<K: Eq, V: Eq> Eq for PersistentMap<K, V> {}

impl<K, V> Hash for PersistentMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.size);
        state.write_u64(self.adhash);
    }
}

// ---------------------------------------------------------------------------
// Trait impls
// ---------------------------------------------------------------------------

// Manual Clone — a snapshot clone is a root pointer copy, no `K: Clone, V: Clone`.
impl<K, V> Clone for PersistentMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            size: self.size,
            adhash: self.adhash,
        }
    }
}

impl<K, V> Default for PersistentMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for PersistentMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistentMap")
            .field("len", &self.size)
            .field("adhash", &format_args!("{:#018x}", self.adhash))
            .finish_non_exhaustive()
    }
}

impl<K: Hash + Eq + Clone, V: Hash + Clone> Extend<(K, V)> for PersistentMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert_in_place(k, v);
        }
    }
}

impl<K: Hash + Eq + Clone, V: Hash + Clone> FromIterator<(K, V)> for PersistentMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Hash + Eq, V> ops::Index<&K> for PersistentMap<K, V> {
    type Output = V;

    fn index(&self, key: &K) -> &V {
        self.get(key).expect("key not found")
    }
}

impl<'a, K, V> IntoIterator for &'a PersistentMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}
