//! Entity records, patches, and typed identifiers.

pub mod board;
pub mod card;
pub mod ids;
pub mod list;

pub use board::{Board, BoardPatch};
pub use card::{Card, CardPatch};
pub use ids::{ActivityId, BoardId, CardId, CommentId, ListId, UserId};
pub use list::{List, ListPatch};
