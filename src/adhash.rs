//! `AdHash` — incremental, order-independent structural hashing.
//!
//! A snapshot's hash is `φ(S) = Σ f(hash(k), hash(v))` over its entries,
//! summed with wrapping arithmetic. Addition commutes, so the result does not
//! depend on insertion order, and each insert or remove adjusts it by a
//! single term.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// First mixing seed (golden ratio constant).
const SEED_1: u64 = 0x9E37_79B9_7F4A_7C15;

/// Second mixing seed (large prime).
const SEED_2: u64 = 0x517C_C1B7_2722_0A95;

/// Computes the 64-bit hash of a value with the fixed-key standard hasher.
///
/// Deterministic for the lifetime of the process, which is what both trie
/// placement and structural hashing rely on.
#[must_use]
pub fn hash_one<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Mixes a key hash and a value hash into one entry's contribution.
///
/// `f(k, v) = key_hash · SEED₁ ⊕ value_hash · SEED₂`
#[must_use]
pub const fn entry_adhash(key_hash: u64, value_hash: u64) -> u64 {
    key_hash.wrapping_mul(SEED_1) ^ value_hash.wrapping_mul(SEED_2)
}

/// Contribution of an entry whose key hash is already known.
#[must_use]
pub fn contribution<V: Hash + ?Sized>(key_hash: u64, value: &V) -> u64 {
    entry_adhash(key_hash, hash_one(value))
}
