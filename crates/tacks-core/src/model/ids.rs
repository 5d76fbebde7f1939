//! Typed entity identifiers.
//!
//! Every entity family gets its own string-backed newtype so a card id can
//! never be handed to a board lookup. Ids are minted by the server; no
//! format is enforced here.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

entity_id!(
    /// Identifier of a board.
    BoardId
);
entity_id!(
    /// Identifier of a list within a board.
    ListId
);
entity_id!(
    /// Identifier of a card within a list.
    CardId
);
entity_id!(
    /// Identifier of a comment on a card.
    CommentId
);
entity_id!(
    /// Identifier of a user account.
    UserId
);
entity_id!(
    /// Identifier of an activity-feed entry.
    ActivityId
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = BoardId::new("b1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"b1\"");

        let parsed: BoardId = serde_json::from_str("\"b1\"").unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn ids_work_as_json_map_keys() {
        let mut map = BTreeMap::new();
        map.insert(ListId::new("l1"), 1u32);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, "{\"l1\":1}");

        let back: BTreeMap<ListId, u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn display_matches_inner() {
        assert_eq!(CardId::new("c9").to_string(), "c9");
        assert_eq!(CardId::from("c9").as_str(), "c9");
    }
}
