//! Card records and bulk-merge patches.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::ids::{CardId, CommentId};
use crate::merge::Merge;

/// A card as held in the store. Comments are kept as an ordered id sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Card {
    pub id: CardId,
    pub title: String,
    pub comments: Vec<CommentId>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Card {
    #[must_use]
    pub fn new(id: CardId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }
}

/// Partial card attributes arriving in a normalized payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<CardId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<CommentId>>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl CardPatch {
    pub fn apply_to(self, card: &mut Card) {
        if let Some(id) = self.id {
            card.id = id;
        }
        if let Some(title) = self.title {
            card.title = title;
        }
        if let Some(comments) = self.comments {
            card.comments = comments;
        }
        card.extra.merge(self.extra);
    }
}
