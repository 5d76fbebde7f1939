//! The normalized store snapshot and the bulk-merge payload.
//!
//! Every entity lives exactly once in its type-map, keyed by id;
//! relationships are id references held by the parent record. Boards,
//! lists, and cards are typed because incremental events mutate them.
//! Users, comments, and activity entries are opaque leaves: the bulk-merge
//! path is the only thing that ever touches them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::merge::Merge;
use crate::model::{
    ActivityId, Board, BoardId, BoardPatch, Card, CardId, CardPatch, CommentId, List, ListId,
    ListPatch, UserId,
};

/// One full store snapshot. `Default` is the empty store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityStore {
    pub boards: BTreeMap<BoardId, Board>,
    pub lists: BTreeMap<ListId, List>,
    pub cards: BTreeMap<CardId, Card>,
    pub users: BTreeMap<UserId, Value>,
    pub comments: BTreeMap<CommentId, Value>,
    pub activity: BTreeMap<ActivityId, Value>,
}

/// A normalized payload as produced by the transport layer: the same six
/// type-maps, holding partial records. Any subset of the maps may appear.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityPayload {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub boards: BTreeMap<BoardId, BoardPatch>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub lists: BTreeMap<ListId, ListPatch>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub cards: BTreeMap<CardId, CardPatch>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub users: BTreeMap<UserId, Value>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub comments: BTreeMap<CommentId, Value>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub activity: BTreeMap<ActivityId, Value>,
}

impl EntityPayload {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
            && self.lists.is_empty()
            && self.cards.is_empty()
            && self.users.is_empty()
            && self.comments.is_empty()
            && self.activity.is_empty()
    }
}

impl EntityStore {
    /// Fold a normalized payload into this snapshot.
    ///
    /// Composite entities apply their patches onto the stored record,
    /// materializing it first when the id is new. Leaf entities deep-merge
    /// per id. Ids absent from the payload are untouched; nothing is ever
    /// removed.
    pub fn merge_entities(&mut self, payload: EntityPayload) {
        for (id, patch) in payload.boards {
            let board = self
                .boards
                .entry(id.clone())
                .or_insert_with(|| Board::new(id));
            patch.apply_to(board);
        }
        for (id, patch) in payload.lists {
            let list = self
                .lists
                .entry(id.clone())
                .or_insert_with(|| List::new(id));
            patch.apply_to(list);
        }
        for (id, patch) in payload.cards {
            let card = self
                .cards
                .entry(id.clone())
                .or_insert_with(|| Card::new(id));
            patch.apply_to(card);
        }
        self.users.merge(payload.users);
        self.comments.merge(payload.comments);
        self.activity.merge(payload.activity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> EntityPayload {
        serde_json::from_value(value).expect("payload fixture")
    }

    #[test]
    fn merge_materializes_new_records_from_partial_payloads() {
        let mut store = EntityStore::default();
        store.merge_entities(payload(json!({
            "boards": { "b1": { "title": "Backlog" } },
            "cards": { "c1": { "title": "x" } },
        })));

        let board = store.boards.get(&BoardId::new("b1")).unwrap();
        assert_eq!(board.id, BoardId::new("b1"));
        assert_eq!(board.title, "Backlog");
        assert!(board.lists.is_empty());
        assert_eq!(board.lists_length, 0);

        assert!(store.cards.contains_key(&CardId::new("c1")));
        assert!(store.lists.is_empty());
    }

    #[test]
    fn merge_overwrites_present_attributes_and_keeps_the_rest() {
        let mut store = EntityStore::default();
        store.merge_entities(payload(json!({
            "cards": { "c1": { "title": "y", "comments": [] } },
        })));
        store.merge_entities(payload(json!({
            "cards": { "c1": { "title": "x" } },
        })));

        let card = store.cards.get(&CardId::new("c1")).unwrap();
        assert_eq!(card.title, "x");
        assert!(card.comments.is_empty());
    }

    #[test]
    fn merge_leaves_untouched_ids_alone() {
        let mut store = EntityStore::default();
        store.merge_entities(payload(json!({
            "boards": { "b1": { "title": "one" }, "b2": { "title": "two" } },
        })));
        store.merge_entities(payload(json!({
            "boards": { "b2": { "title": "二" } },
        })));

        assert_eq!(store.boards.get(&BoardId::new("b1")).unwrap().title, "one");
        assert_eq!(store.boards.get(&BoardId::new("b2")).unwrap().title, "二");
    }

    #[test]
    fn leaf_entities_deep_merge_per_id() {
        let mut store = EntityStore::default();
        store.merge_entities(payload(json!({
            "users": { "u1": { "username": "ada", "status": { "away": false } } },
        })));
        store.merge_entities(payload(json!({
            "users": { "u1": { "status": { "note": "brb" } }, "u2": { "username": "grace" } },
        })));

        assert_eq!(
            store.users.get(&UserId::new("u1")).unwrap(),
            &json!({ "username": "ada", "status": { "away": false, "note": "brb" } })
        );
        assert!(store.users.contains_key(&UserId::new("u2")));
    }

    #[test]
    fn snapshot_serializes_with_all_six_maps() {
        let store = EntityStore::default();
        let value = serde_json::to_value(&store).unwrap();
        for key in ["boards", "lists", "cards", "users", "comments", "activity"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn empty_payload_is_empty() {
        assert!(EntityPayload::default().is_empty());
        assert!(!payload(json!({ "users": { "u1": {} } })).is_empty());
    }
}
