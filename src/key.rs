//! Key tokens: identity-compared handles that carry their value type.

use std::any::{TypeId, type_name};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use tracing::trace;

use crate::value::Value;

/// Source of process-wide key identities.
static NEXT_KEY_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a key token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyId(u64);

impl KeyId {
    fn next() -> Self {
        Self(NEXT_KEY_ID.fetch_add(1, AtomicOrdering::Relaxed))
    }

    /// Returns the raw sequence number.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A key token with its value type erased.
///
/// This is what a record stores. Equality, ordering, and hashing use the
/// identity alone; the label and type information are for diagnostics and
/// for checking erased entries.
#[derive(Clone, Copy)]
pub struct RawKey {
    id: KeyId,
    label: Option<&'static str>,
    value_type: TypeId,
    type_name: &'static str,
}

impl RawKey {
    /// Returns the key's identity.
    #[must_use]
    pub const fn id(&self) -> KeyId {
        self.id
    }

    /// Returns the diagnostic label, if any.
    #[must_use]
    pub const fn label(&self) -> Option<&'static str> {
        self.label
    }

    /// Returns the [`TypeId`] of the key's declared value type.
    #[must_use]
    pub const fn value_type(&self) -> TypeId {
        self.value_type
    }

    /// Returns the name of the key's declared value type.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl PartialEq for RawKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for RawKey {}

impl PartialOrd for RawKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RawKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl Hash for RawKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for RawKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawKey")
            .field("id", &self.id.0)
            .field("label", &self.label)
            .field("type", &self.type_name)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for RawKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.label {
            Some(label) => f.write_str(label),
            None => fmt::Display::fmt(&self.id, f),
        }
    }
}

/// A key token addressing values of type `A`.
///
/// Every token is distinct from every other token created in the process,
/// whatever its label or value type. Create one per logical field and keep
/// it around, typically in a `static`:
///
/// ```
/// use std::sync::LazyLock;
/// use champ_record::{Key, Record};
///
/// static USER: LazyLock<Key<String>> = LazyLock::new(|| Key::labeled("user"));
///
/// let r: Record = Record::new().with(&USER, "alice".to_owned());
/// assert_eq!(r.get(&USER).map(String::as_str), Some("alice"));
///
/// // Same label, different token.
/// let other: Key<String> = Key::labeled("user");
/// assert_ne!(other, *USER);
/// assert_eq!(r.get(&other), None);
/// ```
pub struct Key<A> {
    raw: RawKey,
    _value: PhantomData<fn() -> A>,
}

impl<A: Value> Key<A> {
    /// Creates a fresh unlabeled token.
    #[must_use]
    pub fn new() -> Self {
        Self::with_label(None)
    }

    /// Creates a fresh token with a diagnostic label.
    #[must_use]
    pub fn labeled(label: &'static str) -> Self {
        Self::with_label(Some(label))
    }

    /// Creates a fresh token with an optional diagnostic label.
    #[must_use]
    pub fn with_label(label: Option<&'static str>) -> Self {
        let raw = RawKey {
            id: KeyId::next(),
            label,
            value_type: TypeId::of::<A>(),
            type_name: type_name::<A>(),
        };
        trace!(key_id = raw.id.0, label = ?label, value_type = raw.type_name, "allocated key token");
        Self {
            raw,
            _value: PhantomData,
        }
    }
}

impl<A> Key<A> {
    /// Returns the token's identity.
    #[must_use]
    pub const fn id(&self) -> KeyId {
        self.raw.id
    }

    /// Returns the diagnostic label, if any.
    #[must_use]
    pub const fn label(&self) -> Option<&'static str> {
        self.raw.label
    }

    /// Returns the erased form of this token.
    #[must_use]
    pub const fn raw(&self) -> &RawKey {
        &self.raw
    }
}

// ---------------------------------------------------------------------------
// Manual trait impls — avoid false `A: Trait` bounds.
// A token holds no `A`; only its identity matters.
// ---------------------------------------------------------------------------

impl<A: Value> Default for Key<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Clone for Key<A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A> Copy for Key<A> {}

impl<A> PartialEq for Key<A> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<A> Eq for Key<A> {}

impl<A> Hash for Key<A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<A> PartialEq<RawKey> for Key<A> {
    fn eq(&self, other: &RawKey) -> bool {
        self.raw == *other
    }
}

impl<A> fmt::Debug for Key<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key")
            .field("id", &self.raw.id.0)
            .field("label", &self.raw.label)
            .field("type", &self.raw.type_name)
            .finish()
    }
}

impl<A> fmt::Display for Key<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.raw, f)
    }
}

impl<A> From<Key<A>> for RawKey {
    fn from(key: Key<A>) -> Self {
        key.raw
    }
}
