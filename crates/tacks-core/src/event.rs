//! The closed event vocabulary of the store.
//!
//! Events arrive from the transport in the wire form
//! `{ "type": "<kind>", "payload": { ... } }` with dotted kind tags and
//! camelCase payload keys. One variant exists per structural mutation,
//! plus [`Event::Merge`] for full normalized payloads.
//!
//! **Structural detection**: a payload carrying an `entities` member is a
//! bulk merge no matter what the `type` tag says — even an unknown one.
//! Without `entities`, unknown tags are a deserialize error; the
//! vocabulary is closed and there is no "unrecognized event string" state
//! an event value can be in.

use serde::de::DeserializeOwned;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::{BoardId, CardId, CommentId, ListId};
use crate::state::EntityPayload;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Deep-merge a full normalized payload into the store.
    Merge(EntityPayload),
    /// Append a list id to `board.lists`.
    AddListToBoard { board_id: BoardId, list_id: ListId },
    /// Remove the first occurrence of a list id from `board.lists`.
    RemoveListFromBoard { board_id: BoardId, list_id: ListId },
    /// `board.lists_length += 1`.
    IncrementListsLength { board_id: BoardId },
    /// `board.lists_length -= 1`. Never clamped; negative counters signal
    /// a caller-side ordering bug.
    DecrementListsLength { board_id: BoardId },
    /// `board.cards_length += 1`.
    IncrementCardsLength { board_id: BoardId },
    /// `board.cards_length -= 1`.
    DecrementCardsLength { board_id: BoardId },
    /// Append a card id to `list.cards`.
    AddCardToList { list_id: ListId, card_id: CardId },
    /// Remove the first occurrence of a card id from `list.cards`.
    RemoveCardFromList { list_id: ListId, card_id: CardId },
    /// Append a comment id to `card.comments`.
    AddCommentToCard {
        card_id: CardId,
        comment_id: CommentId,
    },
}

/// Error returned when decoding a wire event fails.
#[derive(Debug, Error)]
pub enum WireEventError {
    #[error(
        "unknown event type '{raw}': expected one of entities.merge, boards.add_list, \
         boards.remove_list, boards.inc_lists_length, boards.dec_lists_length, \
         boards.inc_cards_length, boards.dec_cards_length, lists.add_card, \
         lists.remove_card, cards.add_comment"
    )]
    UnknownKind { raw: String },
    #[error("invalid {kind} payload: {source}")]
    InvalidPayload {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl Event {
    /// All kind tags in catalog order.
    pub const ALL_KINDS: [&'static str; 10] = [
        "entities.merge",
        "boards.add_list",
        "boards.remove_list",
        "boards.inc_lists_length",
        "boards.dec_lists_length",
        "boards.inc_cards_length",
        "boards.dec_cards_length",
        "lists.add_card",
        "lists.remove_card",
        "cards.add_comment",
    ];

    /// The wire tag for this event.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Merge(_) => "entities.merge",
            Self::AddListToBoard { .. } => "boards.add_list",
            Self::RemoveListFromBoard { .. } => "boards.remove_list",
            Self::IncrementListsLength { .. } => "boards.inc_lists_length",
            Self::DecrementListsLength { .. } => "boards.dec_lists_length",
            Self::IncrementCardsLength { .. } => "boards.inc_cards_length",
            Self::DecrementCardsLength { .. } => "boards.dec_cards_length",
            Self::AddCardToList { .. } => "lists.add_card",
            Self::RemoveCardFromList { .. } => "lists.remove_card",
            Self::AddCommentToCard { .. } => "cards.add_comment",
        }
    }

    /// Decode an event from its tag and payload value. The structural
    /// `entities` check lives in `Deserialize`; this is the typed-path
    /// dispatch.
    pub fn from_wire(kind: &str, payload: serde_json::Value) -> Result<Self, WireEventError> {
        match kind {
            "entities.merge" => {
                let p: MergePayload<EntityPayload> = parse("entities.merge", payload)?;
                Ok(Self::Merge(p.entities))
            }
            "boards.add_list" => {
                let p: BoardListPayload<BoardId, ListId> = parse("boards.add_list", payload)?;
                Ok(Self::AddListToBoard {
                    board_id: p.board_id,
                    list_id: p.list_id,
                })
            }
            "boards.remove_list" => {
                let p: BoardListPayload<BoardId, ListId> = parse("boards.remove_list", payload)?;
                Ok(Self::RemoveListFromBoard {
                    board_id: p.board_id,
                    list_id: p.list_id,
                })
            }
            "boards.inc_lists_length" => {
                let p: BoardPayload<BoardId> = parse("boards.inc_lists_length", payload)?;
                Ok(Self::IncrementListsLength {
                    board_id: p.board_id,
                })
            }
            "boards.dec_lists_length" => {
                let p: BoardPayload<BoardId> = parse("boards.dec_lists_length", payload)?;
                Ok(Self::DecrementListsLength {
                    board_id: p.board_id,
                })
            }
            "boards.inc_cards_length" => {
                let p: BoardPayload<BoardId> = parse("boards.inc_cards_length", payload)?;
                Ok(Self::IncrementCardsLength {
                    board_id: p.board_id,
                })
            }
            "boards.dec_cards_length" => {
                let p: BoardPayload<BoardId> = parse("boards.dec_cards_length", payload)?;
                Ok(Self::DecrementCardsLength {
                    board_id: p.board_id,
                })
            }
            "lists.add_card" => {
                let p: ListCardPayload<ListId, CardId> = parse("lists.add_card", payload)?;
                Ok(Self::AddCardToList {
                    list_id: p.list_id,
                    card_id: p.card_id,
                })
            }
            "lists.remove_card" => {
                let p: ListCardPayload<ListId, CardId> = parse("lists.remove_card", payload)?;
                Ok(Self::RemoveCardFromList {
                    list_id: p.list_id,
                    card_id: p.card_id,
                })
            }
            "cards.add_comment" => {
                let p: CardCommentPayload<CardId, CommentId> =
                    parse("cards.add_comment", payload)?;
                Ok(Self::AddCommentToCard {
                    card_id: p.card_id,
                    comment_id: p.comment_id,
                })
            }
            _ => Err(WireEventError::UnknownKind {
                raw: kind.to_string(),
            }),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}

fn parse<T: DeserializeOwned>(
    kind: &'static str,
    payload: serde_json::Value,
) -> Result<T, WireEventError> {
    serde_json::from_value(payload).map_err(|source| WireEventError::InvalidPayload { kind, source })
}

// Wire payload shapes, generic so the same struct serializes borrows and
// deserializes owned values.

#[derive(Serialize, Deserialize)]
struct MergePayload<E> {
    entities: E,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BoardListPayload<B, L> {
    board_id: B,
    list_id: L,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BoardPayload<B> {
    board_id: B,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListCardPayload<L, C> {
    list_id: L,
    card_id: C,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CardCommentPayload<C, M> {
    card_id: C,
    comment_id: M,
}

impl Serialize for Event {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut wire = serializer.serialize_struct("Event", 2)?;
        wire.serialize_field("type", self.kind())?;
        match self {
            Self::Merge(entities) => {
                wire.serialize_field("payload", &MergePayload { entities })?;
            }
            Self::AddListToBoard { board_id, list_id }
            | Self::RemoveListFromBoard { board_id, list_id } => {
                wire.serialize_field("payload", &BoardListPayload { board_id, list_id })?;
            }
            Self::IncrementListsLength { board_id }
            | Self::DecrementListsLength { board_id }
            | Self::IncrementCardsLength { board_id }
            | Self::DecrementCardsLength { board_id } => {
                wire.serialize_field("payload", &BoardPayload { board_id })?;
            }
            Self::AddCardToList { list_id, card_id }
            | Self::RemoveCardFromList { list_id, card_id } => {
                wire.serialize_field("payload", &ListCardPayload { list_id, card_id })?;
            }
            Self::AddCommentToCard {
                card_id,
                comment_id,
            } => {
                wire.serialize_field("payload", &CardCommentPayload { card_id, comment_id })?;
            }
        }
        wire.end()
    }
}

impl<'de> Deserialize<'de> for Event {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct RawEvent {
            #[serde(rename = "type")]
            kind: Option<String>,
            #[serde(default)]
            payload: Option<serde_json::Value>,
        }

        let raw = RawEvent::deserialize(deserializer)?;

        // Bulk path wins over the tag whenever the payload carries entities.
        if let Some(payload) = &raw.payload {
            if payload.get("entities").is_some() {
                let p: MergePayload<EntityPayload> =
                    serde_json::from_value(payload.clone()).map_err(serde::de::Error::custom)?;
                return Ok(Self::Merge(p.entities));
            }
        }

        let kind = raw
            .kind
            .ok_or_else(|| serde::de::Error::missing_field("type"))?;
        let payload = raw.payload.unwrap_or(serde_json::Value::Null);
        Self::from_wire(&kind, payload).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_events() -> Vec<Event> {
        let payload: EntityPayload =
            serde_json::from_value(json!({ "boards": { "b1": { "title": "Backlog" } } }))
                .expect("payload fixture");
        vec![
            Event::Merge(payload),
            Event::AddListToBoard {
                board_id: "b1".into(),
                list_id: "l1".into(),
            },
            Event::RemoveListFromBoard {
                board_id: "b1".into(),
                list_id: "l1".into(),
            },
            Event::IncrementListsLength {
                board_id: "b1".into(),
            },
            Event::DecrementListsLength {
                board_id: "b1".into(),
            },
            Event::IncrementCardsLength {
                board_id: "b1".into(),
            },
            Event::DecrementCardsLength {
                board_id: "b1".into(),
            },
            Event::AddCardToList {
                list_id: "l1".into(),
                card_id: "c1".into(),
            },
            Event::RemoveCardFromList {
                list_id: "l1".into(),
                card_id: "c1".into(),
            },
            Event::AddCommentToCard {
                card_id: "c1".into(),
                comment_id: "m1".into(),
            },
        ]
    }

    #[test]
    fn every_kind_roundtrips_through_the_wire() {
        for event in sample_events() {
            let wire = serde_json::to_value(&event).expect("serialize");
            assert_eq!(wire.get("type"), Some(&json!(event.kind())));
            let back: Event = serde_json::from_value(wire).expect("deserialize");
            assert_eq!(back, event);
        }
    }

    #[test]
    fn kinds_match_catalog_order() {
        let kinds: Vec<&str> = sample_events().iter().map(Event::kind).collect();
        assert_eq!(kinds, Event::ALL_KINDS);
    }

    #[test]
    fn entities_payload_wins_over_the_type_tag() {
        let wire = json!({
            "type": "boards.add_list",
            "payload": { "entities": { "cards": { "c1": { "title": "x" } } } },
        });
        let event: Event = serde_json::from_value(wire).expect("deserialize");
        match event {
            Event::Merge(payload) => assert!(payload.cards.contains_key(&"c1".into())),
            other => panic!("expected Merge, got {other}"),
        }
    }

    #[test]
    fn entities_payload_rescues_unknown_tags() {
        let wire = json!({
            "type": "boards.fetch_success",
            "payload": { "entities": { "users": { "u1": { "username": "ada" } } } },
        });
        let event: Event = serde_json::from_value(wire).expect("deserialize");
        assert_eq!(event.kind(), "entities.merge");
    }

    #[test]
    fn unknown_tag_without_entities_is_rejected() {
        let wire = json!({ "type": "boards.fetch_success", "payload": {} });
        let err = serde_json::from_value::<Event>(wire).unwrap_err();
        assert!(err.to_string().contains("boards.fetch_success"));
        assert!(err.to_string().contains("expected one of"));
    }

    #[test]
    fn missing_type_is_rejected() {
        let wire = json!({ "payload": { "boardId": "b1", "listId": "l1" } });
        assert!(serde_json::from_value::<Event>(wire).is_err());
    }

    #[test]
    fn malformed_payload_names_the_kind() {
        let wire = json!({ "type": "boards.add_list", "payload": { "boardId": "b1" } });
        let err = serde_json::from_value::<Event>(wire).unwrap_err();
        assert!(err.to_string().contains("boards.add_list"));
    }

    #[test]
    fn wire_uses_camel_case_payload_keys() {
        let event = Event::AddListToBoard {
            board_id: "b1".into(),
            list_id: "l2".into(),
        };
        let wire = serde_json::to_value(&event).expect("serialize");
        assert_eq!(
            wire,
            json!({ "type": "boards.add_list", "payload": { "boardId": "b1", "listId": "l2" } })
        );
    }
}
