//! Pure event application over store snapshots.
//!
//! [`apply`] consumes the previous snapshot and returns the next one; it
//! has no other effect, so determinism only depends on the event order the
//! caller feeds in. Ordering between concurrent callers is the dispatch
//! queue's job ([`crate::dispatch::Store`]), not this module's.

use std::collections::BTreeMap;
use thiserror::Error;

use crate::event::Event;
use crate::model::{Board, BoardId, Card, CardId, List, ListId};
use crate::state::EntityStore;

/// Precondition violation: an event referenced a parent id the store does
/// not hold. Fatal for that call — masking it would hide data corruption.
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("board '{id}' not found")]
    BoardNotFound { id: BoardId },
    #[error("list '{id}' not found")]
    ListNotFound { id: ListId },
    #[error("card '{id}' not found")]
    CardNotFound { id: CardId },
}

/// Apply one event to a snapshot, producing the next snapshot.
///
/// Behavior, in priority order:
/// 1. [`Event::Merge`] deep-merges the payload and returns immediately.
/// 2. Anything else is offered to the three per-type sub-reducers; each
///    sees only its own map and ignores events it does not recognize.
///
/// Removing an id that is not in the sequence is a no-op. Counters never
/// clamp. Appending an id that is already present duplicates it — the
/// vocabulary has no membership guard, and this function does not invent
/// one.
pub fn apply(mut state: EntityStore, event: &Event) -> Result<EntityStore, ApplyError> {
    if let Event::Merge(payload) = event {
        state.merge_entities(payload.clone());
        return Ok(state);
    }

    apply_boards(&mut state.boards, event)?;
    apply_lists(&mut state.lists, event)?;
    apply_cards(&mut state.cards, event)?;
    Ok(state)
}

fn apply_boards(boards: &mut BTreeMap<BoardId, Board>, event: &Event) -> Result<(), ApplyError> {
    match event {
        Event::AddListToBoard { board_id, list_id } => {
            board_mut(boards, board_id)?.lists.push(list_id.clone());
        }
        Event::RemoveListFromBoard { board_id, list_id } => {
            remove_first(&mut board_mut(boards, board_id)?.lists, list_id);
        }
        Event::IncrementListsLength { board_id } => {
            board_mut(boards, board_id)?.lists_length += 1;
        }
        Event::DecrementListsLength { board_id } => {
            board_mut(boards, board_id)?.lists_length -= 1;
        }
        Event::IncrementCardsLength { board_id } => {
            board_mut(boards, board_id)?.cards_length += 1;
        }
        Event::DecrementCardsLength { board_id } => {
            board_mut(boards, board_id)?.cards_length -= 1;
        }
        // Not a board event; identity.
        _ => {}
    }
    Ok(())
}

fn apply_lists(lists: &mut BTreeMap<ListId, List>, event: &Event) -> Result<(), ApplyError> {
    match event {
        Event::AddCardToList { list_id, card_id } => {
            list_mut(lists, list_id)?.cards.push(card_id.clone());
        }
        Event::RemoveCardFromList { list_id, card_id } => {
            remove_first(&mut list_mut(lists, list_id)?.cards, card_id);
        }
        // Not a list event; identity.
        _ => {}
    }
    Ok(())
}

fn apply_cards(cards: &mut BTreeMap<CardId, Card>, event: &Event) -> Result<(), ApplyError> {
    match event {
        Event::AddCommentToCard {
            card_id,
            comment_id,
        } => {
            card_mut(cards, card_id)?.comments.push(comment_id.clone());
        }
        // Not a card event; identity.
        _ => {}
    }
    Ok(())
}

fn board_mut<'a>(
    boards: &'a mut BTreeMap<BoardId, Board>,
    id: &BoardId,
) -> Result<&'a mut Board, ApplyError> {
    boards
        .get_mut(id)
        .ok_or_else(|| ApplyError::BoardNotFound { id: id.clone() })
}

fn list_mut<'a>(
    lists: &'a mut BTreeMap<ListId, List>,
    id: &ListId,
) -> Result<&'a mut List, ApplyError> {
    lists
        .get_mut(id)
        .ok_or_else(|| ApplyError::ListNotFound { id: id.clone() })
}

fn card_mut<'a>(
    cards: &'a mut BTreeMap<CardId, Card>,
    id: &CardId,
) -> Result<&'a mut Card, ApplyError> {
    cards
        .get_mut(id)
        .ok_or_else(|| ApplyError::CardNotFound { id: id.clone() })
}

fn remove_first<T: PartialEq>(sequence: &mut Vec<T>, value: &T) {
    if let Some(position) = sequence.iter().position(|held| held == value) {
        sequence.remove(position);
    }
}
