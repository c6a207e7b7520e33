//! Immutable heterogeneous records with typed keys.
//!
//! A [`Record`] maps [`Key`] tokens to values of the type each token
//! carries. Records never change: `with`, `without`, and `select_keys`
//! return new records that share structure with their source, so they can be
//! passed between threads and kept as history without copying or locking.
//!
//! ```
//! use std::sync::LazyLock;
//! use champ_record::{Key, Record};
//!
//! static NAME: LazyLock<Key<String>> = LazyLock::new(|| Key::labeled("name"));
//! static AGE: LazyLock<Key<u32>> = LazyLock::new(|| Key::labeled("age"));
//!
//! let base: Record = Record::new().with(&NAME, "alice".to_owned());
//! let older = base.with(&AGE, 30);
//!
//! assert_eq!(older.get(&AGE), Some(&30));
//! assert_eq!(base.get(&AGE), None);
//! assert_eq!(older.get_or(&AGE, 0), 30);
//! ```
//!
//! # Layers
//!
//! - [`Key`] / [`RawKey`]: identity-compared tokens. The value type is a
//!   phantom parameter; labels are for diagnostics only.
//! - [`PersistentMap`]: the engine, a CHAMP (Compressed Hash-Array Mapped
//!   Prefix-tree) with `Arc`-shared nodes. Updates path-copy `O(log₃₂ n)`
//!   nodes and leave every older snapshot intact.
//! - [`Record`]: the typed facade. Values are erased into [`AnyValue`] on the
//!   way in and recovered through the key's type on the way out.
//!
//! # Engine properties
//!
//! - **Canonical form**: same contents = same trie shape, whatever the
//!   insertion and removal history
//! - **Incremental structural hash** via `AdHash`
//! - **Structural sharing**: untouched subtrees are shared between versions
//! - **Zero `unsafe`**: enforced by `#![forbid(unsafe_code)]`
//!
//! # References
//!
//! - Steindorfer & Vinju, 2015 — "Optimizing Hash-Array Mapped Tries
//!   for Fast and Lean Immutable JVM Collections", OOPSLA 2015
//! - Bagwell, 2001 — "Ideal Hash Trees"

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod adhash;
pub mod error;
pub mod iter;
pub mod key;
pub mod record;
pub mod value;

mod map;
mod node;
mod ops;

#[cfg(test)]
mod tests;

pub use error::{RecordError, Result};
pub use key::{Key, KeyId, RawKey};
pub use map::PersistentMap;
pub use record::Record;
pub use value::{AnyValue, Value};
