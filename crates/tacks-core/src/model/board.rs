//! Board records and bulk-merge patches.
//!
//! A board holds its lists as an ordered sequence of [`ListId`]s (insertion
//! order is display order) plus two denormalized counters. The counters are
//! independent integers maintained by their own events; they are never
//! derived from sequence lengths and can drift if the caller drops or
//! duplicates events.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::ids::{BoardId, ListId};
use crate::merge::Merge;

/// A board as held in the store. `#[serde(default)]` lets the bulk-merge
/// path materialize a board from a partial payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Board {
    pub id: BoardId,
    pub title: String,
    pub lists: Vec<ListId>,
    pub lists_length: i64,
    pub cards_length: i64,
    /// Attributes outside the closed schema, preserved verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Board {
    #[must_use]
    pub fn new(id: BoardId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }
}

/// Partial board attributes arriving in a normalized payload. Present
/// fields replace the stored ones; absent fields are preserved; `extra`
/// deep-merges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoardPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<BoardId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lists: Option<Vec<ListId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lists_length: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cards_length: Option<i64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl BoardPatch {
    pub fn apply_to(self, board: &mut Board) {
        if let Some(id) = self.id {
            board.id = id;
        }
        if let Some(title) = self.title {
            board.title = title;
        }
        if let Some(lists) = self.lists {
            board.lists = lists;
        }
        if let Some(lists_length) = self.lists_length {
            board.lists_length = lists_length;
        }
        if let Some(cards_length) = self.cards_length {
            board.cards_length = cards_length;
        }
        board.extra.merge(self.extra);
    }
}
