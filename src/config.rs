//! Configuration Module
//!
//! Capacity policy and store options, loadable from environment variables.

use std::env::{self, VarError};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{KvError, Result};

/// Default bound when nothing is configured.
pub const DEFAULT_MAX_ENTRIES: usize = 1000;

// == Capacity ==
/// How many entries a store may hold before it evicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capacity {
    /// At most this many entries
    Bounded(usize),
    /// Never evict
    Unbounded,
}

impl Capacity {
    /// Returns true when `len` entries overflow this capacity.
    pub fn is_exceeded_by(&self, len: usize) -> bool {
        match self {
            Capacity::Bounded(max) => len > *max,
            Capacity::Unbounded => false,
        }
    }
}

impl Default for Capacity {
    fn default() -> Self {
        Capacity::Bounded(DEFAULT_MAX_ENTRIES)
    }
}

impl From<usize> for Capacity {
    fn from(max: usize) -> Self {
        Capacity::Bounded(max)
    }
}

impl FromStr for Capacity {
    type Err = KvError;

    /// Accepts a non-negative entry count, or `unbounded`/`unlimited`/`-1`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s == "-1"
            || s.eq_ignore_ascii_case("unbounded")
            || s.eq_ignore_ascii_case("unlimited")
        {
            return Ok(Capacity::Unbounded);
        }
        s.parse::<usize>()
            .map(Capacity::Bounded)
            .map_err(|_| KvError::Config(format!("invalid capacity {:?}", s)))
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capacity::Bounded(max) => write!(f, "{}", max),
            Capacity::Unbounded => f.write_str("unbounded"),
        }
    }
}

/// Store configuration parameters.
///
/// `expiration` is carried for backends that enforce it; the LRU store only
/// enforces `capacity`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of entries
    pub capacity: Capacity,
    /// Time-to-live for entries, None = never expire
    pub expiration: Option<Duration>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(mut self, capacity: impl Into<Capacity>) -> Self {
        self.capacity = capacity.into();
        self
    }

    pub fn with_expiration(mut self, expiration: Duration) -> Self {
        self.expiration = Some(expiration);
        self
    }

    /// Creates a Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `KVCACHE_MAX_ENTRIES` - Entry bound, or `unbounded` (default: 1000)
    /// - `KVCACHE_EXPIRATION_SECS` - Entry lifetime in seconds, 0 = none (default: none)
    ///
    /// Unset variables fall back to defaults; set but unparseable ones are errors.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = read_var("KVCACHE_MAX_ENTRIES")? {
            config.capacity = raw.parse()?;
        }

        if let Some(raw) = read_var("KVCACHE_EXPIRATION_SECS")? {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                KvError::Config(format!("invalid KVCACHE_EXPIRATION_SECS {:?}", raw))
            })?;
            config.expiration = (secs > 0).then(|| Duration::from_secs(secs));
        }

        Ok(config)
    }
}

/// Reads `name`; unset is None, set but not unicode is an error.
fn read_var(name: &str) -> Result<Option<String>> {
    match env::var(name) {
        Ok(raw) => Ok(Some(raw)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(raw)) => Err(KvError::Config(format!(
            "{} is not valid unicode: {:?}",
            name, raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.capacity, Capacity::Bounded(1000));
        assert_eq!(config.expiration, None);
    }

    #[test]
    fn test_config_builder() {
        let config = Config::new()
            .with_capacity(Capacity::Unbounded)
            .with_expiration(Duration::from_secs(30));
        assert_eq!(config.capacity, Capacity::Unbounded);
        assert_eq!(config.expiration, Some(Duration::from_secs(30)));

        let config = Config::new().with_capacity(5usize);
        assert_eq!(config.capacity, Capacity::Bounded(5));
    }

    #[test]
    fn test_capacity_parse() {
        assert_eq!("10".parse::<Capacity>().unwrap(), Capacity::Bounded(10));
        assert_eq!(" 0 ".parse::<Capacity>().unwrap(), Capacity::Bounded(0));
        assert_eq!("-1".parse::<Capacity>().unwrap(), Capacity::Unbounded);
        assert_eq!("Unbounded".parse::<Capacity>().unwrap(), Capacity::Unbounded);
        assert_eq!("unlimited".parse::<Capacity>().unwrap(), Capacity::Unbounded);
        assert!(matches!("-2".parse::<Capacity>(), Err(KvError::Config(_))));
        assert!(matches!("lots".parse::<Capacity>(), Err(KvError::Config(_))));
    }

    #[test]
    fn test_capacity_exceeded() {
        assert!(!Capacity::Bounded(2).is_exceeded_by(2));
        assert!(Capacity::Bounded(2).is_exceeded_by(3));
        assert!(!Capacity::Unbounded.is_exceeded_by(usize::MAX));
    }

    #[test]
    fn test_capacity_display() {
        assert_eq!(Capacity::Bounded(3).to_string(), "3");
        assert_eq!(Capacity::Unbounded.to_string(), "unbounded");
    }
}
