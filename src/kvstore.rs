//! Store Contract
//!
//! The operations every key-value backend exposes, whether it keeps data in
//! process or forwards to an external service.

use std::collections::HashMap;

use crate::cache::{Fragment, Value};
use crate::error::Result;

// == KV Store ==
/// Abstract key-value store.
///
/// Implementations are shared between threads, so every method takes `&self`.
pub trait KvStore: Send + Sync {
    /// Returns the value for `key`, or None if absent.
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: Value) -> Result<()>;

    /// Removes `key`.
    fn delete(&self, key: &str) -> Result<()>;

    /// Checks if `key` is present.
    fn exists(&self, key: &str) -> bool;

    /// Removes every entry.
    fn flush(&self) -> Result<()>;

    /// Releases backend resources.
    fn close(&self) -> Result<()>;

    /// Extends the scalar value stored at `key`.
    fn append(&self, key: &str, fragment: Fragment) -> Result<()>;

    /// Adds `member` to the string set at `key`, creating the set if needed.
    fn set_add(&self, key: &str, member: &str) -> Result<()>;

    /// Members of the string set at `key`; None if absent or not a set.
    fn set_members(&self, key: &str) -> Option<Vec<String>>;

    /// Looks up several keys at once; misses map to None.
    ///
    /// Each hit counts as a `get`, so it is touched.
    fn get_many(&self, keys: &[&str]) -> Result<HashMap<String, Option<Value>>> {
        keys.iter()
            .map(|key| Ok((key.to_string(), self.get(key)?)))
            .collect()
    }

    /// True only if every key is present. An empty list is trivially true.
    fn exists_all(&self, keys: &[&str]) -> bool {
        keys.iter().all(|key| self.exists(key))
    }
}
