//! Deep-merge primitives for the bulk-merge path.
//!
//! The store receives full normalized payloads from the transport and folds
//! them into the current snapshot key by key. JSON values split into two
//! kinds for merge purposes: maps merge recursively, everything else is
//! replaced by the incoming value. Keys absent from the incoming side are
//! preserved.

use serde_json::Value;
use std::collections::BTreeMap;

pub trait Merge {
    fn merge(&mut self, incoming: Self);
}

impl Merge for Value {
    fn merge(&mut self, incoming: Self) {
        match (self, incoming) {
            (Value::Object(existing), Value::Object(incoming)) => {
                for (key, value) in incoming {
                    match existing.entry(key) {
                        serde_json::map::Entry::Occupied(slot) => slot.into_mut().merge(value),
                        serde_json::map::Entry::Vacant(slot) => {
                            slot.insert(value);
                        }
                    }
                }
            }
            (slot, incoming) => *slot = incoming,
        }
    }
}

impl<K: Ord, V: Merge> Merge for BTreeMap<K, V> {
    fn merge(&mut self, incoming: Self) {
        for (key, value) in incoming {
            match self.entry(key) {
                std::collections::btree_map::Entry::Occupied(slot) => {
                    slot.into_mut().merge(value);
                }
                std::collections::btree_map::Entry::Vacant(slot) => {
                    slot.insert(value);
                }
            }
        }
    }
}
