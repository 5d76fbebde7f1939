//! Ordered event application.
//!
//! [`apply`](crate::apply::apply) guarantees determinism for a fixed event
//! sequence but imposes no ordering between concurrent callers. `Store` is
//! that ordering: one owned snapshot, events applied strictly in the order
//! `dispatch` is called.

use tracing::{debug, warn};

use crate::apply::{ApplyError, apply};
use crate::event::Event;
use crate::state::EntityStore;

/// A snapshot behind a serialized dispatch queue.
#[derive(Debug, Clone, Default)]
pub struct Store {
    state: EntityStore,
}

impl Store {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_state(state: EntityStore) -> Self {
        Self { state }
    }

    /// Apply one event. On failure the previous snapshot stays in place.
    pub fn dispatch(&mut self, event: &Event) -> Result<&EntityStore, ApplyError> {
        match apply(self.state.clone(), event) {
            Ok(next) => {
                debug!(kind = event.kind(), "applied event");
                self.state = next;
                Ok(&self.state)
            }
            Err(err) => {
                warn!(kind = event.kind(), error = %err, "rejected event");
                Err(err)
            }
        }
    }

    /// Apply a sequence of events in order, stopping at the first failure.
    pub fn dispatch_all<'a, I>(&mut self, events: I) -> Result<&EntityStore, ApplyError>
    where
        I: IntoIterator<Item = &'a Event>,
    {
        for event in events {
            self.dispatch(event)?;
        }
        Ok(&self.state)
    }

    #[must_use]
    pub fn state(&self) -> &EntityStore {
        &self.state
    }

    #[must_use]
    pub fn into_state(self) -> EntityStore {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dispatch_applies_in_call_order() {
        let mut store = Store::new();
        let merge = Event::Merge(
            serde_json::from_value(json!({
                "boards": { "b1": { "title": "Backlog" } },
            }))
            .unwrap(),
        );
        let events = [
            merge,
            Event::AddListToBoard {
                board_id: "b1".into(),
                list_id: "l1".into(),
            },
            Event::IncrementListsLength {
                board_id: "b1".into(),
            },
        ];

        store.dispatch_all(&events).unwrap();

        let board = store.state().boards.get(&"b1".into()).unwrap();
        assert_eq!(board.lists.len(), 1);
        assert_eq!(board.lists_length, 1);
    }

    #[test]
    fn failed_dispatch_keeps_the_previous_snapshot() {
        let mut store = Store::new();
        store
            .dispatch(&Event::Merge(
                serde_json::from_value(json!({
                    "boards": { "b1": { "title": "Backlog" } },
                }))
                .unwrap(),
            ))
            .unwrap();
        let before = store.state().clone();

        let err = store
            .dispatch(&Event::AddListToBoard {
                board_id: "ghost".into(),
                list_id: "l1".into(),
            })
            .unwrap_err();

        assert!(matches!(err, ApplyError::BoardNotFound { .. }));
        assert_eq!(store.state(), &before);
    }

    #[test]
    fn dispatch_all_stops_at_the_first_failure() {
        let mut store = Store::new();
        let events = [
            Event::Merge(
                serde_json::from_value(json!({
                    "boards": { "b1": {} },
                }))
                .unwrap(),
            ),
            Event::IncrementListsLength {
                board_id: "ghost".into(),
            },
            Event::IncrementListsLength {
                board_id: "b1".into(),
            },
        ];

        assert!(store.dispatch_all(&events).is_err());
        // The third event never ran.
        assert_eq!(store.state().boards.get(&"b1".into()).unwrap().lists_length, 0);
    }
}
