//! Cache Entry Module
//!
//! Defines the typed values a cache slot can hold and the entry pairing a key
//! with its value.

use std::collections::HashSet;
use std::fmt;

// == Value Kind ==
/// Tag naming which variant a value or fragment is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Text,
    Bytes,
    StringSet,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Text => "text",
            ValueKind::Bytes => "bytes",
            ValueKind::StringSet => "string set",
        };
        f.write_str(name)
    }
}

// == Value ==
/// What a cache slot holds. Exactly one variant is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Scalar text
    Text(String),
    /// Scalar byte sequence
    Bytes(Vec<u8>),
    /// Distinct text members, unordered
    StringSet(HashSet<String>),
}

impl Value {
    /// Returns the variant tag.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Text(_) => ValueKind::Text,
            Value::Bytes(_) => ValueKind::Bytes,
            Value::StringSet(_) => ValueKind::StringSet,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the members when this is a string set.
    pub fn members(&self) -> Option<&HashSet<String>> {
        match self {
            Value::StringSet(set) => Some(set),
            _ => None,
        }
    }

    /// Builds a string set from any iterator of members.
    pub fn set_of<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::StringSet(members.into_iter().map(Into::into).collect())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl From<HashSet<String>> for Value {
    fn from(set: HashSet<String>) -> Self {
        Value::StringSet(set)
    }
}

// == Fragment ==
/// A piece of data that can be appended to a scalar value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Text(String),
    Bytes(Vec<u8>),
}

impl Fragment {
    pub fn kind(&self) -> ValueKind {
        match self {
            Fragment::Text(_) => ValueKind::Text,
            Fragment::Bytes(_) => ValueKind::Bytes,
        }
    }
}

impl From<String> for Fragment {
    fn from(s: String) -> Self {
        Fragment::Text(s)
    }
}

impl From<&str> for Fragment {
    fn from(s: &str) -> Self {
        Fragment::Text(s.to_string())
    }
}

impl From<Vec<u8>> for Fragment {
    fn from(b: Vec<u8>) -> Self {
        Fragment::Bytes(b)
    }
}

impl From<&[u8]> for Fragment {
    fn from(b: &[u8]) -> Self {
        Fragment::Bytes(b.to_vec())
    }
}

// == Append Outcome ==
/// Reason an append was refused; the caller attaches the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Mismatch {
    pub stored: ValueKind,
    pub given: ValueKind,
}

// == Value Mutation ==
impl Value {
    // == Append ==
    /// Extends a scalar value in place.
    ///
    /// Text only takes text and bytes only take bytes; string sets take nothing.
    /// On mismatch the value is left untouched.
    pub(crate) fn append(&mut self, fragment: Fragment) -> Result<(), Mismatch> {
        match (self, fragment) {
            (Value::Text(current), Fragment::Text(more)) => {
                current.push_str(&more);
                Ok(())
            }
            (Value::Bytes(current), Fragment::Bytes(more)) => {
                current.extend_from_slice(&more);
                Ok(())
            }
            (stored, given) => Err(Mismatch {
                stored: stored.kind(),
                given: given.kind(),
            }),
        }
    }

    // == Set Add ==
    /// Inserts a member when the value is a string set.
    ///
    /// Returns whether the member was new.
    pub(crate) fn set_add(&mut self, member: String) -> Result<bool, Mismatch> {
        match self {
            Value::StringSet(set) => Ok(set.insert(member)),
            stored => Err(Mismatch {
                stored: stored.kind(),
                given: ValueKind::StringSet,
            }),
        }
    }
}

// == Cache Entry ==
/// A key paired with its value. Owned by its slot in the recency list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: Value,
}

impl Entry {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}
