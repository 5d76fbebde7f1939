//! List records and bulk-merge patches.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::ids::{CardId, ListId};
use crate::merge::Merge;

/// A list as held in the store. Cards are kept as an ordered id sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct List {
    pub id: ListId,
    pub title: String,
    pub cards: Vec<CardId>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl List {
    #[must_use]
    pub fn new(id: ListId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }
}

/// Partial list attributes arriving in a normalized payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ListId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cards: Option<Vec<CardId>>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ListPatch {
    pub fn apply_to(self, list: &mut List) {
        if let Some(id) = self.id {
            list.id = id;
        }
        if let Some(title) = self.title {
            list.title = title;
        }
        if let Some(cards) = self.cards {
            list.cards = cards;
        }
        list.extra.merge(self.extra);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn patch_preserves_absent_fields() {
        let mut list = List::new(ListId::new("l1"));
        list.title = "Doing".to_string();
        list.cards = vec![CardId::new("c1")];

        let patch: ListPatch = serde_json::from_value(json!({ "title": "Done" })).unwrap();
        patch.apply_to(&mut list);

        assert_eq!(list.title, "Done");
        assert_eq!(list.cards, vec![CardId::new("c1")]);
    }

    #[test]
    fn default_list_has_empty_card_sequence() {
        let list = List::new(ListId::new("l1"));
        assert!(list.cards.is_empty());
        assert!(list.title.is_empty());
    }
}
