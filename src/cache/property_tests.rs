//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the store against a plain recency-order model.

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

use crate::cache::{CacheStore, Value};
use crate::config::Capacity;
use crate::error::KvError;

// == Strategies ==
/// Small key space so operations collide often. `set` only writes `t` keys;
/// `append` and `set_add` hit every key, so both get rejected on the wrong
/// kind and the model decides which calls should have been.
fn text_key_strategy() -> impl Strategy<Value = String> {
    "t[a-e]".prop_map(|s| s)
}

fn set_key_strategy() -> impl Strategy<Value = String> {
    "s[a-e]".prop_map(|s| s)
}

fn any_key_strategy() -> impl Strategy<Value = String> {
    prop_oneof![text_key_strategy(), set_key_strategy()]
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9 ]{0,16}".prop_map(|s| s)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
    Append { key: String, fragment: String },
    SetAdd { key: String, member: String },
    SetMembers { key: String },
    Exists { key: String },
    Delete { key: String },
    RemoveOldest,
    Flush,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        4 => (text_key_strategy(), value_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        3 => any_key_strategy().prop_map(|key| CacheOp::Get { key }),
        2 => (any_key_strategy(), value_strategy())
            .prop_map(|(key, fragment)| CacheOp::Append { key, fragment }),
        3 => (any_key_strategy(), "[a-c]")
            .prop_map(|(key, member)| CacheOp::SetAdd { key, member }),
        2 => any_key_strategy().prop_map(|key| CacheOp::SetMembers { key }),
        1 => any_key_strategy().prop_map(|key| CacheOp::Exists { key }),
        1 => any_key_strategy().prop_map(|key| CacheOp::Delete { key }),
        1 => Just(CacheOp::RemoveOldest),
        1 => Just(CacheOp::Flush),
    ]
}

// == Reference Model ==
/// Recency order (front first) plus values, maintained the obvious O(n) way.
#[derive(Default)]
struct Model {
    order: Vec<String>,
    values: HashMap<String, Value>,
}

impl Model {
    fn touch(&mut self, key: &str) {
        self.order.retain(|k| k != key);
        self.order.insert(0, key.to_string());
    }

    fn remove(&mut self, key: &str) -> Option<Value> {
        self.order.retain(|k| k != key);
        self.values.remove(key)
    }

    fn enforce(&mut self, capacity: Capacity) {
        if capacity.is_exceeded_by(self.order.len()) {
            if let Some(oldest) = self.order.pop() {
                self.values.remove(&oldest);
            }
        }
    }

    fn apply(&mut self, op: &CacheOp, capacity: Capacity) {
        match op {
            CacheOp::Set { key, value } => {
                self.values.insert(key.clone(), Value::from(value.as_str()));
                self.touch(key);
                self.enforce(capacity);
            }
            CacheOp::Get { key } => {
                if self.values.contains_key(key) {
                    self.touch(key);
                }
            }
            CacheOp::Append { key, fragment } => {
                if let Some(Value::Text(current)) = self.values.get_mut(key) {
                    current.push_str(fragment);
                    self.touch(key);
                    self.enforce(capacity);
                }
            }
            CacheOp::SetAdd { key, member } => {
                let entry = self
                    .values
                    .entry(key.clone())
                    .or_insert_with(|| Value::StringSet(HashSet::new()));
                // rejected on a scalar: no touch, no eviction
                if let Value::StringSet(set) = entry {
                    set.insert(member.clone());
                    self.touch(key);
                    self.enforce(capacity);
                }
            }
            CacheOp::SetMembers { key } => {
                if let Some(Value::StringSet(_)) = self.values.get(key) {
                    self.touch(key);
                }
            }
            CacheOp::Exists { .. } => {}
            CacheOp::Delete { key } => {
                self.remove(key);
            }
            CacheOp::RemoveOldest => {
                if let Some(oldest) = self.order.last().cloned() {
                    self.remove(&oldest);
                }
            }
            CacheOp::Flush => {
                self.order.clear();
                self.values.clear();
            }
        }
    }
}

fn apply_to_store(store: &CacheStore, op: &CacheOp) {
    match op {
        CacheOp::Set { key, value } => store.set(key, value.as_str()).unwrap(),
        CacheOp::Get { key } => {
            store.get(key);
        }
        CacheOp::Append { key, fragment } => {
            match store.append(key, fragment.as_str()) {
                Ok(()) | Err(KvError::KeyNotFound(_)) | Err(KvError::TypeMismatch { .. }) => {}
                Err(other) => panic!("unexpected append error: {}", other),
            }
        }
        CacheOp::SetAdd { key, member } => match store.set_add(key, member) {
            Ok(()) | Err(KvError::TypeMismatch { .. }) => {}
            Err(other) => panic!("unexpected set_add error: {}", other),
        },
        CacheOp::SetMembers { key } => {
            store.set_members(key);
        }
        CacheOp::Exists { key } => {
            store.exists(key);
        }
        CacheOp::Delete { key } => {
            let _ = store.delete(key);
        }
        CacheOp::RemoveOldest => {
            store.remove_oldest();
        }
        CacheOp::Flush => store.flush().unwrap(),
    }
}

fn capacity_strategy() -> impl Strategy<Value = Capacity> {
    prop_oneof![
        (1usize..6).prop_map(Capacity::Bounded),
        Just(Capacity::Unbounded),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Any operation sequence leaves the store in the same recency order and
    // with the same values as the model, with list and index agreeing.
    #[test]
    fn prop_matches_recency_model(
        capacity in capacity_strategy(),
        ops in prop::collection::vec(cache_op_strategy(), 1..80)
    ) {
        let store = CacheStore::new(capacity, None);
        let mut model = Model::default();

        for op in &ops {
            apply_to_store(&store, op);
            model.apply(op, capacity);
            store.assert_consistent();
            prop_assert_eq!(store.keys(), model.order.clone(), "order diverged after {:?}", op);
        }

        for (key, value) in &model.values {
            prop_assert_eq!(store.get(key), Some(value.clone()));
        }
    }

    // Length never exceeds a bounded capacity.
    #[test]
    fn prop_capacity_enforcement(
        max in 1usize..20,
        keys in prop::collection::vec("[a-z]{1,4}", 1..200)
    ) {
        let store = CacheStore::new(max, None);

        for (i, key) in keys.iter().enumerate() {
            if i % 3 == 0 {
                store.set_add(&format!("set:{}", key), i).unwrap();
            } else {
                store.set(key, "v").unwrap();
            }
            prop_assert!(store.len() <= max, "{} entries exceeds max {}", store.len(), max);
        }
    }

    // The first-inserted, never-touched key is the one evicted.
    #[test]
    fn prop_lru_eviction_order(
        keys in prop::collection::hash_set("[a-z]{1,8}", 2..10),
        new_key in "[A-Z]{1,8}"
    ) {
        let keys: Vec<String> = keys.into_iter().collect();
        let store = CacheStore::new(keys.len(), None);
        for key in &keys {
            store.set(key, "v").unwrap();
        }

        store.set(&new_key, "v").unwrap();

        prop_assert!(!store.exists(&keys[0]));
        prop_assert!(store.exists(&new_key));
        for key in keys.iter().skip(1) {
            prop_assert!(store.exists(key), "{} should survive", key);
        }
    }

    // A get on the oldest key shifts eviction to the next oldest.
    #[test]
    fn prop_lru_access_tracking(
        keys in prop::collection::hash_set("[a-z]{1,8}", 3..10),
        new_key in "[A-Z]{1,8}"
    ) {
        let keys: Vec<String> = keys.into_iter().collect();
        let store = CacheStore::new(keys.len(), None);
        for key in &keys {
            store.set(key, "v").unwrap();
        }

        prop_assert!(store.get(&keys[0]).is_some());
        store.set(&new_key, "v").unwrap();

        prop_assert!(store.exists(&keys[0]));
        prop_assert!(!store.exists(&keys[1]));
    }

    // Repeated set_add calls never grow the set beyond its distinct members.
    #[test]
    fn prop_set_add_idempotent(members in prop::collection::vec("[a-f]{1,3}", 1..40)) {
        let store = CacheStore::new(Capacity::Unbounded, None);
        for member in &members {
            store.set_add("s", member).unwrap();
            store.set_add("s", member).unwrap();
        }

        let expected: HashSet<String> = members.into_iter().collect();
        let got: HashSet<String> = store.set_members("s").unwrap().into_iter().collect();
        prop_assert_eq!(got, expected);
    }
}

// == Additional Unit Tests for Edge Cases ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_and_store_agree_on_known_sequence() {
        let capacity = Capacity::Bounded(2);
        let store = CacheStore::new(capacity, None);
        let mut model = Model::default();
        let ops = [
            CacheOp::Set {
                key: "ta".into(),
                value: "1".into(),
            },
            CacheOp::SetAdd {
                key: "sa".into(),
                member: "x".into(),
            },
            CacheOp::Get { key: "ta".into() },
            CacheOp::Set {
                key: "tb".into(),
                value: "2".into(),
            },
        ];

        for op in &ops {
            apply_to_store(&store, op);
            model.apply(op, capacity);
        }

        assert_eq!(store.keys(), vec!["tb", "ta"]);
        assert_eq!(model.order, vec!["tb", "ta"]);
    }

    #[test]
    fn test_rejected_mutations_follow_model() {
        let capacity = Capacity::Bounded(2);
        let store = CacheStore::new(capacity, None);
        let mut model = Model::default();
        let ops = [
            CacheOp::Set {
                key: "ta".into(),
                value: "1".into(),
            },
            CacheOp::SetAdd {
                key: "sa".into(),
                member: "x".into(),
            },
            CacheOp::SetAdd {
                key: "ta".into(),
                member: "y".into(),
            },
            CacheOp::Append {
                key: "sa".into(),
                fragment: "z".into(),
            },
            CacheOp::Set {
                key: "tb".into(),
                value: "2".into(),
            },
        ];

        for op in &ops {
            apply_to_store(&store, op);
            model.apply(op, capacity);
            store.assert_consistent();
        }

        // neither rejected call touched, so "ta" stayed oldest and was evicted
        assert_eq!(store.keys(), vec!["tb", "sa"]);
        assert_eq!(model.order, store.keys());
        assert_eq!(store.set_members("sa"), Some(vec!["x".to_string()]));
    }
}
