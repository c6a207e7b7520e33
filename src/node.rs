//! CHAMP trie node types and bitmap helpers.

use std::fmt;
use std::sync::Arc;

/// Bits per trie level (5 → 32-way branching).
pub const BITS_PER_LEVEL: u32 = 5;

/// Maximum bit-shift value (depth 12, last level uses 4 bits).
pub const MAX_SHIFT: u32 = 60;

/// Inline entry storing a key-value pair with its precomputed hash.
pub struct Entry<K, V> {
    /// Precomputed 64-bit hash of the key.
    pub hash: u64,
    /// The key.
    pub key: K,
    /// The value.
    pub value: V,
}

/// CHAMP trie node.
///
/// Nodes are immutable once wrapped in an [`Arc`]: every update builds new
/// nodes along the touched path and links the untouched children by
/// reference.
///
/// Two variants maintain the canonical form invariant:
/// - [`Inner`](Self::Inner) — bitmap-compressed node at depth `d < D`
/// - [`Collision`](Self::Collision) — linear node for full 64-bit hash collisions
pub enum Node<K, V> {
    /// Bitmap-compressed inner node.
    ///
    /// Invariant: `data_map & node_map == 0` (disjoint positions),
    /// `entries.len() == data_map.count_ones()`,
    /// `children.len() == node_map.count_ones()`.
    Inner {
        /// Bitmap of positions occupied by inline entries.
        data_map: u32,
        /// Bitmap of positions occupied by child subtrees.
        node_map: u32,
        /// Inline entries, ordered by bitmap position.
        entries: Vec<Entry<K, V>>,
        /// Child subtrees, ordered by bitmap position.
        children: Vec<Arc<Self>>,
        /// `AdHash` of this subtree.
        adhash: u64,
    },
    /// Collision node for keys sharing the same 64-bit hash.
    ///
    /// Invariant: `entries.len() >= 2`.
    Collision {
        /// The shared 64-bit hash value.
        hash: u64,
        /// Colliding entries, in insertion order.
        entries: Vec<Entry<K, V>>,
        /// `AdHash` of this subtree.
        adhash: u64,
    },
}

// ---------------------------------------------------------------------------
// Bitmap helpers
// ---------------------------------------------------------------------------

/// Extracts the 5-bit hash fragment at the given bit-shift depth.
#[inline]
#[must_use]
pub const fn fragment(hash: u64, shift: u32) -> u32 {
    ((hash >> shift) & 0x1F) as u32
}

/// Returns the single-bit mask for the given fragment (0..31).
#[inline]
#[must_use]
pub const fn mask(frag: u32) -> u32 {
    1 << frag
}

/// Returns the compact index of `bit` within `bitmap`.
///
/// Counts the number of set bits below `bit`.
#[inline]
#[must_use]
pub const fn index(bitmap: u32, bit: u32) -> usize {
    (bitmap & (bit - 1)).count_ones() as usize
}

// ---------------------------------------------------------------------------
// Constructors & accessors
// ---------------------------------------------------------------------------

impl<K, V> Node<K, V> {
    /// Builds an inner node holding a single inline entry.
    pub fn singleton(entry: Entry<K, V>, contribution: u64, shift: u32) -> Self {
        Self::Inner {
            data_map: mask(fragment(entry.hash, shift)),
            node_map: 0,
            entries: vec![entry],
            children: Vec::new(),
            adhash: contribution,
        }
    }

    /// Returns the `AdHash` of this node's subtree.
    #[must_use]
    pub const fn adhash(&self) -> u64 {
        match self {
            Self::Inner { adhash, .. } | Self::Collision { adhash, .. } => *adhash,
        }
    }

    /// Returns the inline data entries.
    #[must_use]
    pub fn entries(&self) -> &[Entry<K, V>] {
        match self {
            Self::Inner { entries, .. } | Self::Collision { entries, .. } => entries,
        }
    }

    /// Returns the child subtrees (always empty for collision nodes).
    #[must_use]
    pub fn children(&self) -> &[Arc<Self>] {
        match self {
            Self::Inner { children, .. } => children,
            Self::Collision { .. } => &[],
        }
    }
}

impl<K: Clone, V: Clone> Clone for Entry<K, V> {
    fn clone(&self) -> Self {
        Self {
            hash: self.hash,
            key: self.key.clone(),
            value: self.value.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Manual Debug — print the trie shape without requiring `K: Debug, V: Debug`.
// ---------------------------------------------------------------------------

impl<K, V> fmt::Debug for Node<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inner {
                data_map,
                node_map,
                children,
                adhash,
                ..
            } => f
                .debug_struct("Inner")
                .field("data_map", &format_args!("{data_map:#034b}"))
                .field("node_map", &format_args!("{node_map:#034b}"))
                .field("children", children)
                .field("adhash", adhash)
                .finish_non_exhaustive(),
            Self::Collision {
                hash,
                entries,
                adhash,
            } => f
                .debug_struct("Collision")
                .field("hash", hash)
                .field("entries_len", &entries.len())
                .field("adhash", adhash)
                .finish(),
        }
    }
}
