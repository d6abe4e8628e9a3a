//! Error types for the key-value cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

use crate::cache::ValueKind;

// == KV Error Enum ==
/// Unified error type for every store operation.
///
/// Misses on `get`, `exists` and `set_members` are not errors; they come back
/// as `None`/`false`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KvError {
    /// Key not present in the store
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    /// Stored value cannot take the requested mutation
    #[error("Type mismatch on key {key}: stored {stored}, given {given}")]
    TypeMismatch {
        key: String,
        stored: ValueKind,
        given: ValueKind,
    },

    /// Invalid configuration input
    #[error("Invalid configuration: {0}")]
    Config(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, KvError>;
