//! Recency List Module
//!
//! Implements the least-recently-used ordering for cache eviction: an arena of
//! doubly linked slots plus a key index, giving O(1) touch, insert, eviction
//! and removal.

use std::collections::HashMap;

use crate::cache::{Entry, Value};

/// Stable position of a node inside the arena.
type Handle = usize;

#[derive(Debug)]
struct Node {
    entry: Entry,
    prev: Option<Handle>,
    next: Option<Handle>,
}

// == Recency List ==
/// Entries ordered by last touch.
///
/// - Front = most recently used
/// - Back = least recently used
///
/// Links are arena handles rather than pointers; a freed slot goes on the free
/// list and is reused by the next insert. The index maps each key to the handle
/// of its node and never owns the entry.
#[derive(Debug, Default)]
pub struct RecencyList {
    slots: Vec<Option<Node>>,
    free: Vec<Handle>,
    head: Option<Handle>,
    tail: Option<Handle>,
    index: HashMap<String, Handle>,
}

impl RecencyList {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self::default()
    }

    // == Length ==
    /// Returns the number of linked entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // == Contains ==
    /// Checks membership without touching.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    // == Lookup ==
    /// Returns the entry for `key` without changing its position.
    pub fn get(&self, key: &str) -> Option<&Entry> {
        let handle = *self.index.get(key)?;
        self.node(handle).map(|node| &node.entry)
    }

    /// Mutable access to the value for `key` without changing position.
    ///
    /// Only the value is exposed; the key of a linked entry never changes.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        let handle = *self.index.get(key)?;
        self.node_mut(handle).map(|node| &mut node.entry.value)
    }

    // == Touch ==
    /// Moves the entry for `key` to the front.
    ///
    /// Returns false (and does nothing) if the key is unknown.
    pub fn touch(&mut self, key: &str) -> bool {
        let Some(&handle) = self.index.get(key) else {
            return false;
        };
        if self.head != Some(handle) {
            self.unlink(handle);
            self.link_front(handle);
        }
        true
    }

    // == Insert Front ==
    /// Links a new entry at the front and registers it in the index.
    ///
    /// An existing entry under the same key is dropped first, so keys stay unique.
    pub fn insert_front(&mut self, entry: Entry) {
        if self.index.contains_key(&entry.key) {
            self.remove_by_key(&entry.key);
        }

        let key = entry.key.clone();
        let node = Node {
            entry,
            prev: None,
            next: None,
        };
        let handle = match self.free.pop() {
            Some(handle) => {
                self.slots[handle] = Some(node);
                handle
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };

        self.link_front(handle);
        self.index.insert(key, handle);
    }

    // == Evict Back ==
    /// Unlinks and returns the least recently used entry.
    ///
    /// Returns None if the list is empty.
    pub fn evict_back(&mut self) -> Option<Entry> {
        let handle = self.tail?;
        let entry = self.release(handle)?;
        self.index.remove(&entry.key);
        Some(entry)
    }

    // == Peek Back ==
    /// Returns the least recently used entry without removing it.
    pub fn peek_back(&self) -> Option<&Entry> {
        self.tail.and_then(|h| self.node(h)).map(|node| &node.entry)
    }

    // == Remove ==
    /// Unlinks the entry for `key` wherever it sits.
    pub fn remove_by_key(&mut self, key: &str) -> Option<Entry> {
        let handle = self.index.remove(key)?;
        self.release(handle)
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.index.clear();
        self.head = None;
        self.tail = None;
    }

    // == Keys ==
    /// Keys from most to least recently used.
    pub fn keys(&self) -> Vec<String> {
        let mut keys = Vec::with_capacity(self.len());
        let mut cursor = self.head;
        while let Some(handle) = cursor {
            let Some(node) = self.node(handle) else { break };
            keys.push(node.entry.key.clone());
            cursor = node.next;
        }
        keys
    }

    // == Internal Linking ==

    fn node(&self, handle: Handle) -> Option<&Node> {
        self.slots.get(handle).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, handle: Handle) -> Option<&mut Node> {
        self.slots.get_mut(handle).and_then(Option::as_mut)
    }

    fn release(&mut self, handle: Handle) -> Option<Entry> {
        self.unlink(handle);
        let node = self.slots.get_mut(handle)?.take()?;
        self.free.push(handle);
        Some(node.entry)
    }

    fn unlink(&mut self, handle: Handle) {
        let (prev, next) = match self.node_mut(handle) {
            Some(node) => (node.prev.take(), node.next.take()),
            None => return,
        };

        match prev {
            Some(p) => {
                if let Some(node) = self.node_mut(p) {
                    node.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(node) = self.node_mut(n) {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }
    }

    fn link_front(&mut self, handle: Handle) {
        let old_head = self.head;
        if let Some(node) = self.node_mut(handle) {
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(h) => {
                if let Some(node) = self.node_mut(h) {
                    node.prev = Some(handle);
                }
            }
            None => self.tail = Some(handle),
        }
        self.head = Some(handle);
    }

    /// Panics if the list and the index disagree.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        use std::collections::HashSet;

        let mut seen = HashSet::new();
        let mut prev = None;
        let mut cursor = self.head;
        while let Some(handle) = cursor {
            let node = self.node(handle).expect("linked handle points at empty slot");
            assert_eq!(node.prev, prev, "broken back link at {}", node.entry.key);
            assert!(seen.insert(node.entry.key.clone()), "duplicate key {}", node.entry.key);
            assert_eq!(self.index.get(&node.entry.key), Some(&handle));
            prev = cursor;
            cursor = node.next;
        }
        assert_eq!(self.tail, prev);
        assert_eq!(seen.len(), self.index.len());
        for &handle in &self.free {
            assert!(self.slots[handle].is_none(), "free slot {} still occupied", handle);
        }
    }
}
