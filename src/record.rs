//! Immutable heterogeneous records addressed by typed key tokens.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops;

use tracing::{debug, trace};

use crate::error::{RecordError, Result};
use crate::iter::{Iter, Keys, Values};
use crate::key::{Key, RawKey};
use crate::map::PersistentMap;
use crate::value::{AnyValue, Value};

/// An immutable map from key tokens to values of each token's type.
///
/// Every derivation (`with`, `without`, `select_keys`) returns a new record
/// that shares structure with the receiver; the receiver never changes.
/// `T` is a marker that lets call sites name the kind of record they pass
/// around. It has no runtime representation and is not checked against the
/// keys actually stored.
///
/// ```
/// use std::sync::LazyLock;
/// use champ_record::{Key, Record};
///
/// static NAME: LazyLock<Key<String>> = LazyLock::new(|| Key::labeled("name"));
/// static AGE: LazyLock<Key<u32>> = LazyLock::new(|| Key::labeled("age"));
///
/// let r: Record = Record::new();
/// let r2 = r.with(&NAME, "alice".to_owned()).with(&AGE, 30);
///
/// assert_eq!(r2.get(&AGE), Some(&30));
/// assert_eq!(r2.len(), 2);
/// assert!(r.is_empty());
///
/// let r3 = r2.without([AGE.raw()]);
/// assert!(!r3.contains_key(AGE.raw()));
/// assert!(r2.contains_key(AGE.raw()));
/// ```
///
/// There is no way to change a record in place:
///
/// ```compile_fail
/// use champ_record::{Key, Record};
///
/// let age: Key<u32> = Key::new();
/// let mut r: Record = Record::new();
/// r.insert(&age, 30);
/// ```
///
/// and a value must have its key's type:
///
/// ```compile_fail
/// use champ_record::{Key, Record};
///
/// let age: Key<u32> = Key::new();
/// let r: Record = Record::new().with(&age, "thirty");
/// ```
pub struct Record<T = ()> {
    map: PersistentMap<RawKey, AnyValue>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Record<T> {
    /// Creates an empty record.
    #[must_use]
    pub const fn new() -> Self {
        Self::from_snapshot(PersistentMap::new())
    }

    const fn from_snapshot(map: PersistentMap<RawKey, AnyValue>) -> Self {
        Self {
            map,
            _marker: PhantomData,
        }
    }

    /// Builds a record from erased entries, checking every value against its
    /// key's declared type.
    ///
    /// Later entries for the same key supersede earlier ones.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::TypeMismatch`] for the first entry whose value
    /// type differs from its key's value type.
    pub fn try_from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (RawKey, AnyValue)>,
    {
        let map = entries
            .into_iter()
            .map(|(key, value)| {
                if key.value_type() == value.value_type() {
                    return Ok((key, value));
                }
                debug!(
                    key = %key,
                    expected = key.type_name(),
                    found = value.type_name(),
                    "rejected mistyped record entry"
                );
                Err(RecordError::TypeMismatch {
                    key,
                    expected: key.type_name(),
                    found: value.type_name(),
                })
            })
            .collect::<Result<PersistentMap<_, _>>>()?;
        Ok(Self::from_snapshot(map))
    }

    /// Returns a new record with `key` associated to `value`.
    ///
    /// Any previous value for `key` is superseded in the new record only.
    #[must_use]
    pub fn with<A: Value>(&self, key: &Key<A>, value: A) -> Self {
        Self::from_snapshot(self.map.insert(*key.raw(), AnyValue::new(value)))
    }

    /// Returns a new record without mappings for `keys`.
    ///
    /// Keys not present are ignored.
    #[must_use]
    pub fn without<'k, I>(&self, keys: I) -> Self
    where
        I: IntoIterator<Item = &'k RawKey>,
    {
        let map = self.map.remove_all(keys);
        trace!(before = self.len(), after = map.len(), "record without");
        Self::from_snapshot(map)
    }

    /// Returns a new record with only this record's mappings for `keys`.
    ///
    /// Keys not present are skipped.
    #[must_use]
    pub fn select_keys<'k, I>(&self, keys: I) -> Self
    where
        I: IntoIterator<Item = &'k RawKey>,
    {
        let map = self.map.select(keys);
        trace!(before = self.len(), after = map.len(), "record select_keys");
        Self::from_snapshot(map)
    }

    /// Returns the value stored for `key`.
    #[must_use]
    pub fn get<A: Value>(&self, key: &Key<A>) -> Option<&A> {
        self.map
            .get(key.raw())
            .and_then(|value| value.downcast_ref::<A>())
    }

    /// Returns a clone of the value stored for `key`, or `default`.
    #[must_use]
    pub fn get_or<A: Value + Clone>(&self, key: &Key<A>, default: A) -> A {
        self.get(key).cloned().unwrap_or(default)
    }

    /// Returns the erased value stored for `key`.
    #[must_use]
    pub fn get_raw(&self, key: &RawKey) -> Option<&AnyValue> {
        self.map.get(key)
    }

    /// Returns the number of mappings.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the record has no mappings.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns `true` if the record has a mapping for `key`.
    #[must_use]
    pub fn contains_key(&self, key: &RawKey) -> bool {
        self.map.contains_key(key)
    }

    /// Returns `true` if some key maps to a value equal to `value`.
    ///
    /// Linear in the number of mappings.
    #[must_use]
    pub fn contains_value<A: Value>(&self, value: &A) -> bool {
        self.values().any(|v| v.downcast_ref::<A>() == Some(value))
    }

    /// Returns an iterator over `(&RawKey, &AnyValue)` pairs, in unspecified
    /// order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, RawKey, AnyValue> {
        self.map.iter()
    }

    /// Returns an iterator over the keys.
    #[must_use]
    pub fn keys(&self) -> Keys<'_, RawKey, AnyValue> {
        self.map.keys()
    }

    /// Returns an iterator over the values.
    #[must_use]
    pub fn values(&self) -> Values<'_, RawKey, AnyValue> {
        self.map.values()
    }

    /// Returns the underlying persistent map snapshot.
    #[must_use]
    pub const fn snapshot(&self) -> &PersistentMap<RawKey, AnyValue> {
        &self.map
    }

    /// Re-labels the record with a different marker type.
    #[must_use]
    pub fn retag<U>(self) -> Record<U> {
        Record::from_snapshot(self.map)
    }
}

// ---------------------------------------------------------------------------
// Trait impls — the marker `T` never needs bounds.
// ---------------------------------------------------------------------------

impl<T> Clone for Record<T> {
    fn clone(&self) -> Self {
        Self::from_snapshot(self.map.clone())
    }
}

impl<T> Default for Record<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Records are equal when their mappings are, whatever their markers.
///
/// The right-hand marker is a free parameter, so comparing against a
/// freshly built record needs it spelled out: `r == Record::<()>::new()`.
impl<T, U> PartialEq<Record<U>> for Record<T> {
    fn eq(&self, other: &Record<U>) -> bool {
        self.map == other.map
    }
}

impl<T> Eq for Record<T> {}

impl<T> Hash for Record<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.map.hash(state);
    }
}

impl<T> fmt::Debug for Record<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in self {
            map.key(&format_args!("{key}")).value(value);
        }
        map.finish()
    }
}

impl<T> fmt::Display for Record<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl<T, A: Value> ops::Index<&Key<A>> for Record<T> {
    type Output = A;

    fn index(&self, key: &Key<A>) -> &A {
        self.get(key).expect("key not found")
    }
}

impl<'a, T> IntoIterator for &'a Record<T> {
    type Item = (&'a RawKey, &'a AnyValue);
    type IntoIter = Iter<'a, RawKey, AnyValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Builds a [`Record`] from `key => value` pairs.
///
/// Each value is checked against its key's type at compile time. Later pairs
/// for the same key win.
///
/// ```
/// use champ_record::{Key, Record, record};
///
/// let name: Key<&'static str> = Key::labeled("name");
/// let age: Key<u32> = Key::labeled("age");
///
/// let r: Record = record! { name => "alice", age => 30 };
/// assert_eq!(r.get(&name), Some(&"alice"));
/// assert_eq!(r.to_string(), r.with(&age, 30).to_string());
///
/// let empty: Record = record! {};
/// assert!(empty.is_empty());
/// ```
#[macro_export]
macro_rules! record {
    () => {
        $crate::Record::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let record = $crate::Record::new();
        $(let record = record.with(&$key, $value);)+
        record
    }};
}
