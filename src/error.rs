//! Error types for record construction.
//!
//! Statically-typed operations cannot fail. [`RecordError`] covers the one
//! place where types are checked at runtime: building a record from erased
//! entries.

use thiserror::Error;

use crate::key::RawKey;

/// Error type for runtime-checked record operations.
///
/// Every variant signals a programmer error at the call site; nothing here
/// is transient or worth retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// An erased value's type differs from its key's declared value type.
    #[error("type mismatch for key {key}: expected {expected}, found {found}")]
    TypeMismatch {
        /// The key whose value was rejected.
        key: RawKey,
        /// The key's declared value type.
        expected: &'static str,
        /// The type of the supplied value.
        found: &'static str,
    },
}

/// Result type alias for record operations.
pub type Result<T> = std::result::Result<T, RecordError>;
