//! kvcache - An in-process key-value cache
//!
//! A bounded store with least-recently-used eviction, typed values (text,
//! bytes, string sets) and a single lock guarding every operation.

pub mod cache;
pub mod config;
pub mod dummy;
pub mod error;
pub mod kvstore;

pub use cache::{CacheStats, CacheStore, Fragment, Value, ValueKind};
pub use config::{Capacity, Config};
pub use dummy::DummyStore;
pub use error::{KvError, Result};
pub use kvstore::KvStore;
