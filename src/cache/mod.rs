//! Cache Module
//!
//! Provides the in-memory store: typed values, LRU recency tracking and the
//! lock-protected store built on them.

mod entry;
mod lru;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::{Entry, Fragment, Value, ValueKind};
pub use lru::RecencyList;
pub use stats::CacheStats;
pub use store::CacheStore;
