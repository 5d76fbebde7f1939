//! Normalization of raw API responses.
//!
//! The server returns boards in nested form: a board embeds its lists,
//! lists embed their cards, cards embed their comments. The store wants
//! the flat `{ result, entities }` shape, so the transport runs responses
//! through this module before emitting a merge event. Each nested entity
//! is hoisted into its type-map and replaced by an id reference in its
//! parent.
//!
//! Nested containers may be absent: a board without a `lists` member
//! normalizes to a patch without a `lists` field, and the merge path will
//! leave whatever the store already holds.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::model::{BoardId, BoardPatch, CardId, CardPatch, CommentId, ListId, ListPatch};
use crate::state::EntityPayload;

/// The flat shape the bulk-merge path consumes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizedResponse {
    pub result: Vec<BoardId>,
    pub entities: EntityPayload,
}

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("{entity} object is missing an id")]
    MissingId { entity: &'static str },
    #[error("{entity} id must be a string or a number")]
    InvalidId { entity: &'static str },
    #[error("expected {entity} to be an object")]
    ExpectedObject { entity: &'static str },
    #[error("expected {entity}.{field} to be an array")]
    ExpectedArray {
        entity: &'static str,
        field: &'static str,
    },
    #[error("{entity}.{field} has an unexpected type")]
    InvalidField {
        entity: &'static str,
        field: &'static str,
    },
}

/// Normalize a response carrying a single board.
pub fn normalize_board(raw: &Value) -> Result<NormalizedResponse, NormalizeError> {
    let mut response = NormalizedResponse::default();
    let id = normalize_board_into(raw, &mut response.entities)?;
    response.result.push(id);
    Ok(response)
}

/// Normalize a response carrying an array of boards.
pub fn normalize_boards(raw: &[Value]) -> Result<NormalizedResponse, NormalizeError> {
    let mut response = NormalizedResponse::default();
    for board in raw {
        let id = normalize_board_into(board, &mut response.entities)?;
        response.result.push(id);
    }
    Ok(response)
}

fn normalize_board_into(
    raw: &Value,
    entities: &mut EntityPayload,
) -> Result<BoardId, NormalizeError> {
    let object = raw
        .as_object()
        .ok_or(NormalizeError::ExpectedObject { entity: "board" })?;
    let id: BoardId = entity_id(object, "board")?;

    let mut patch = BoardPatch {
        id: Some(id.clone()),
        ..BoardPatch::default()
    };
    for (key, value) in object {
        match key.as_str() {
            "id" => {}
            "title" => patch.title = Some(string_field(value, "board", "title")?),
            "lists" => {
                let nested = array_field(value, "board", "lists")?;
                let mut lists = Vec::with_capacity(nested.len());
                for list in nested {
                    lists.push(normalize_list_into(list, entities)?);
                }
                patch.lists = Some(lists);
            }
            "listsLength" => patch.lists_length = Some(int_field(value, "board", "listsLength")?),
            "cardsLength" => patch.cards_length = Some(int_field(value, "board", "cardsLength")?),
            _ => {
                patch.extra.insert(key.clone(), value.clone());
            }
        }
    }

    entities.boards.insert(id.clone(), patch);
    Ok(id)
}

fn normalize_list_into(
    raw: &Value,
    entities: &mut EntityPayload,
) -> Result<ListId, NormalizeError> {
    let object = raw
        .as_object()
        .ok_or(NormalizeError::ExpectedObject { entity: "list" })?;
    let id: ListId = entity_id(object, "list")?;

    let mut patch = ListPatch {
        id: Some(id.clone()),
        ..ListPatch::default()
    };
    for (key, value) in object {
        match key.as_str() {
            "id" => {}
            "title" => patch.title = Some(string_field(value, "list", "title")?),
            "cards" => {
                let nested = array_field(value, "list", "cards")?;
                let mut cards = Vec::with_capacity(nested.len());
                for card in nested {
                    cards.push(normalize_card_into(card, entities)?);
                }
                patch.cards = Some(cards);
            }
            _ => {
                patch.extra.insert(key.clone(), value.clone());
            }
        }
    }

    entities.lists.insert(id.clone(), patch);
    Ok(id)
}

fn normalize_card_into(
    raw: &Value,
    entities: &mut EntityPayload,
) -> Result<CardId, NormalizeError> {
    let object = raw
        .as_object()
        .ok_or(NormalizeError::ExpectedObject { entity: "card" })?;
    let id: CardId = entity_id(object, "card")?;

    let mut patch = CardPatch {
        id: Some(id.clone()),
        ..CardPatch::default()
    };
    for (key, value) in object {
        match key.as_str() {
            "id" => {}
            "title" => patch.title = Some(string_field(value, "card", "title")?),
            "comments" => {
                let nested = array_field(value, "card", "comments")?;
                let mut comments = Vec::with_capacity(nested.len());
                for comment in nested {
                    comments.push(hoist_comment(comment, entities)?);
                }
                patch.comments = Some(comments);
            }
            _ => {
                patch.extra.insert(key.clone(), value.clone());
            }
        }
    }

    entities.cards.insert(id.clone(), patch);
    Ok(id)
}

// Comments are leaves: the whole object is hoisted verbatim, id included.
fn hoist_comment(
    raw: &Value,
    entities: &mut EntityPayload,
) -> Result<CommentId, NormalizeError> {
    let object = raw
        .as_object()
        .ok_or(NormalizeError::ExpectedObject { entity: "comment" })?;
    let id: CommentId = entity_id(object, "comment")?;
    entities.comments.insert(id.clone(), raw.clone());
    Ok(id)
}

fn entity_id<T: From<String>>(
    object: &serde_json::Map<String, Value>,
    entity: &'static str,
) -> Result<T, NormalizeError> {
    match object.get("id") {
        Some(Value::String(id)) => Ok(T::from(id.clone())),
        // The original client tolerates numeric ids; render them as text.
        Some(Value::Number(id)) => Ok(T::from(id.to_string())),
        Some(_) => Err(NormalizeError::InvalidId { entity }),
        None => Err(NormalizeError::MissingId { entity }),
    }
}

fn string_field(
    value: &Value,
    entity: &'static str,
    field: &'static str,
) -> Result<String, NormalizeError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or(NormalizeError::InvalidField { entity, field })
}

fn int_field(
    value: &Value,
    entity: &'static str,
    field: &'static str,
) -> Result<i64, NormalizeError> {
    value
        .as_i64()
        .ok_or(NormalizeError::InvalidField { entity, field })
}

fn array_field<'a>(
    value: &'a Value,
    entity: &'static str,
    field: &'static str,
) -> Result<&'a Vec<Value>, NormalizeError> {
    value
        .as_array()
        .ok_or(NormalizeError::ExpectedArray { entity, field })
}
