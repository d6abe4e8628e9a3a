//! Cache Store Module
//!
//! Main cache engine: a recency list and its key index behind one lock, with
//! LRU eviction when the capacity bound is exceeded.

use std::fmt;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, info, trace, warn};

use crate::cache::{CacheStats, Entry, Fragment, RecencyList, Value};
use crate::config::{Capacity, Config};
use crate::error::{KvError, Result};
use crate::kvstore::KvStore;

#[derive(Debug, Default)]
struct Inner {
    list: RecencyList,
    stats: CacheStats,
}

impl Inner {
    // == Evict Oldest ==
    fn evict_oldest(&mut self) -> Option<Entry> {
        let entry = self.list.evict_back()?;
        self.stats.record_eviction();
        debug!(key = %entry.key, kind = %entry.value.kind(), "evicted least recently used entry");
        Some(entry)
    }

    // == Enforce Capacity ==
    /// Drops the back entry if the list grew past `capacity`.
    ///
    /// Each call adds at most one key, so one eviction restores the bound.
    fn enforce(&mut self, capacity: Capacity) {
        if capacity.is_exceeded_by(self.list.len()) {
            self.evict_oldest();
        }
    }
}

// == Cache Store ==
/// Thread-safe in-memory store with LRU eviction.
///
/// Every operation holds a single mutex for its whole duration, so concurrent
/// callers observe the operations in some total order. No operation calls back
/// into the store while holding the lock.
pub struct CacheStore {
    inner: Mutex<Inner>,
    capacity: Capacity,
    /// Not enforced here; kept for callers sharing one configuration.
    expiration: Option<Duration>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore.
    ///
    /// # Arguments
    /// * `capacity` - Entry bound, or `Capacity::Unbounded` to never evict
    /// * `expiration` - Entry lifetime for time-driven backends; unused by this store
    pub fn new(capacity: impl Into<Capacity>, expiration: Option<Duration>) -> Self {
        let capacity = capacity.into();
        info!(%capacity, ?expiration, "cache store created");
        Self {
            inner: Mutex::new(Inner::default()),
            capacity,
            expiration,
        }
    }

    /// Creates a new CacheStore from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.capacity, config.expiration)
    }

    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    pub fn expiration(&self) -> Option<Duration> {
        self.expiration
    }

    // == Get ==
    /// Retrieves a copy of the value and marks the key most recently used.
    pub fn get(&self, key: &str) -> Option<Value> {
        let mut inner = self.inner.lock();
        let value = inner.list.get(key).map(|entry| entry.value.clone());
        inner.stats.record_lookup(value.is_some());
        if value.is_some() {
            inner.list.touch(key);
            trace!(key, "get hit");
        } else {
            trace!(key, "get miss");
        }
        value
    }

    // == Set ==
    /// Stores a value, replacing and touching any existing entry.
    ///
    /// If the insert pushes the store past capacity, the least recently used
    /// entry is evicted silently.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let mut inner = self.inner.lock();

        match inner.list.get_mut(key) {
            Some(current) => {
                *current = value;
                inner.list.touch(key);
            }
            None => inner.list.insert_front(Entry::new(key, value)),
        }

        inner.enforce(self.capacity);
        Ok(())
    }

    // == Append ==
    /// Concatenates a fragment onto the text or bytes stored at `key`.
    ///
    /// # Errors
    /// * `KeyNotFound` - the key is absent
    /// * `TypeMismatch` - the stored value is a string set, or the fragment
    ///   variant differs from the stored one
    pub fn append(&self, key: &str, fragment: impl Into<Fragment>) -> Result<()> {
        let fragment = fragment.into();
        let mut inner = self.inner.lock();

        let current = inner
            .list
            .get_mut(key)
            .ok_or_else(|| KvError::KeyNotFound(key.to_string()))?;

        if let Err(mismatch) = current.append(fragment) {
            warn!(key, stored = %mismatch.stored, given = %mismatch.given, "append rejected");
            return Err(KvError::TypeMismatch {
                key: key.to_string(),
                stored: mismatch.stored,
                given: mismatch.given,
            });
        }

        inner.list.touch(key);
        inner.enforce(self.capacity);
        Ok(())
    }

    // == Set Add ==
    /// Adds a member to the string set at `key`, creating the set if absent.
    ///
    /// The member is stored as its `Display` rendering, so values that render
    /// identically collapse into one member.
    pub fn set_add(&self, key: &str, member: impl fmt::Display) -> Result<()> {
        let member = member.to_string();
        let mut inner = self.inner.lock();

        match inner.list.get_mut(key) {
            Some(current) => {
                if let Err(mismatch) = current.set_add(member) {
                    warn!(key, stored = %mismatch.stored, "set_add on non-set value");
                    return Err(KvError::TypeMismatch {
                        key: key.to_string(),
                        stored: mismatch.stored,
                        given: mismatch.given,
                    });
                }
                inner.list.touch(key);
            }
            None => inner
                .list
                .insert_front(Entry::new(key, Value::set_of([member]))),
        }

        inner.enforce(self.capacity);
        Ok(())
    }

    // == Set Members ==
    /// Returns the members of the string set at `key` in unspecified order.
    ///
    /// None if the key is absent or holds a scalar. Only a set hit touches.
    pub fn set_members(&self, key: &str) -> Option<Vec<String>> {
        let mut inner = self.inner.lock();
        let members: Option<Vec<String>> = inner
            .list
            .get(key)
            .and_then(|entry| entry.value.members())
            .map(|set| set.iter().cloned().collect());

        inner.stats.record_lookup(members.is_some());
        if members.is_some() {
            inner.list.touch(key);
        }
        members
    }

    // == Exists ==
    /// Checks membership without affecting recency.
    pub fn exists(&self, key: &str) -> bool {
        self.inner.lock().list.contains(key)
    }

    // == Delete ==
    /// Removes an entry by key.
    pub fn delete(&self, key: &str) -> Result<()> {
        match self.inner.lock().list.remove_by_key(key) {
            Some(_) => Ok(()),
            None => Err(KvError::KeyNotFound(key.to_string())),
        }
    }

    // == Flush ==
    /// Removes every entry. Counters are kept.
    pub fn flush(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        let dropped = inner.list.len();
        inner.list.clear();
        debug!(dropped, "cache flushed");
        Ok(())
    }

    // == Remove Oldest ==
    /// Evicts and returns the least recently used entry.
    ///
    /// Returns None if the store is empty.
    pub fn remove_oldest(&self) -> Option<(String, Value)> {
        self.inner
            .lock()
            .evict_oldest()
            .map(|entry| (entry.key, entry.value))
    }

    // == Length ==
    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.inner.lock().list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().list.is_empty()
    }

    /// Keys from most to least recently used. Does not touch.
    pub fn keys(&self) -> Vec<String> {
        self.inner.lock().list.keys()
    }

    // == Stats ==
    /// Returns a snapshot of the store counters.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        let mut stats = inner.stats.clone();
        stats.entries = inner.list.len();
        stats
    }

    /// Holds no external resources.
    pub fn close(&self) -> Result<()> {
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let inner = self.inner.lock();
        inner.list.assert_consistent();
        if let Capacity::Bounded(max) = self.capacity {
            assert!(inner.list.len() <= max, "{} entries over bound {}", inner.list.len(), max);
        }
    }
}

impl fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheStore")
            .field("capacity", &self.capacity)
            .field("expiration", &self.expiration)
            .field("len", &self.len())
            .finish()
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl KvStore for CacheStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(CacheStore::get(self, key))
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        CacheStore::set(self, key, value)
    }

    fn delete(&self, key: &str) -> Result<()> {
        CacheStore::delete(self, key)
    }

    fn exists(&self, key: &str) -> bool {
        CacheStore::exists(self, key)
    }

    fn flush(&self) -> Result<()> {
        CacheStore::flush(self)
    }

    fn close(&self) -> Result<()> {
        CacheStore::close(self)
    }

    fn append(&self, key: &str, fragment: Fragment) -> Result<()> {
        CacheStore::append(self, key, fragment)
    }

    fn set_add(&self, key: &str, member: &str) -> Result<()> {
        CacheStore::set_add(self, key, member)
    }

    fn set_members(&self, key: &str) -> Option<Vec<String>> {
        CacheStore::set_members(self, key)
    }
}
