//! Type-erased values stored in a [`Record`](crate::Record).

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::adhash;

/// Capability bound for anything stored in a record.
///
/// `Eq + Hash` give records structural equality and hashing, `Send + Sync`
/// let snapshots cross threads, `Debug` feeds diagnostics. Implemented for
/// every type that qualifies.
pub trait Value: Any + Send + Sync + fmt::Debug + Eq + Hash {}

impl<T> Value for T where T: Any + Send + Sync + fmt::Debug + Eq + Hash {}

/// Object-safe face of [`Value`] used behind the erased pointer.
trait ErasedValue: Send + Sync + fmt::Debug {
    fn as_any(&self) -> &dyn Any;
    fn dyn_eq(&self, other: &dyn ErasedValue) -> bool;
    fn dyn_hash(&self) -> u64;
}

impl<T: Value> ErasedValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn ErasedValue) -> bool {
        other.as_any().downcast_ref::<T>().is_some_and(|other| self == other)
    }

    fn dyn_hash(&self) -> u64 {
        adhash::hash_one(self)
    }
}

/// A shared, immutable value whose static type has been erased.
///
/// Cloning bumps a reference count. Two `AnyValue`s are equal when they hold
/// the same concrete type and the held values compare equal.
///
/// ```
/// use champ_record::AnyValue;
///
/// let v = AnyValue::new(42_u32);
/// assert_eq!(v.downcast_ref::<u32>(), Some(&42));
/// assert_eq!(v.downcast_ref::<i64>(), None);
/// assert_ne!(v, AnyValue::new(42_i64));
/// ```
#[derive(Clone)]
pub struct AnyValue {
    type_id: TypeId,
    type_name: &'static str,
    inner: Arc<dyn ErasedValue>,
}

impl AnyValue {
    /// Erases `value`.
    #[must_use]
    pub fn new<A: Value>(value: A) -> Self {
        Self {
            type_id: TypeId::of::<A>(),
            type_name: std::any::type_name::<A>(),
            inner: Arc::new(value),
        }
    }

    /// Returns the [`TypeId`] of the held value.
    #[must_use]
    pub const fn value_type(&self) -> TypeId {
        self.type_id
    }

    /// Returns the type name of the held value, for diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns `true` if the held value is an `A`.
    #[must_use]
    pub fn is<A: Value>(&self) -> bool {
        self.type_id == TypeId::of::<A>()
    }

    /// Returns the held value if it is an `A`.
    #[must_use]
    pub fn downcast_ref<A: Value>(&self) -> Option<&A> {
        self.inner.as_any().downcast_ref::<A>()
    }
}

impl PartialEq for AnyValue {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id && self.inner.dyn_eq(&*other.inner)
    }
}

impl Eq for AnyValue {}

impl Hash for AnyValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.inner.dyn_hash());
    }
}

impl fmt::Debug for AnyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.inner, f)
    }
}
