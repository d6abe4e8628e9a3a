//! No-op store used when caching is disabled.

use crate::cache::{Fragment, Value};
use crate::error::Result;
use crate::kvstore::KvStore;

/// Accepts every write and stores nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DummyStore;

impl KvStore for DummyStore {
    fn get(&self, _key: &str) -> Result<Option<Value>> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: Value) -> Result<()> {
        Ok(())
    }

    fn delete(&self, _key: &str) -> Result<()> {
        Ok(())
    }

    fn exists(&self, _key: &str) -> bool {
        false
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }

    fn append(&self, _key: &str, _fragment: Fragment) -> Result<()> {
        Ok(())
    }

    fn set_add(&self, _key: &str, _member: &str) -> Result<()> {
        Ok(())
    }

    fn set_members(&self, _key: &str) -> Option<Vec<String>> {
        None
    }
}
