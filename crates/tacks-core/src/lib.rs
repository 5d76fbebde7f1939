//! Normalized entity store for collaborative task boards.
//!
//! The store keeps every entity once, keyed by type and id, with
//! relationships held as id references. Two update paths exist:
//!
//! - **bulk merge** — a normalized payload from the transport is
//!   deep-merged into the snapshot ([`Event::Merge`]);
//! - **incremental events** — a closed vocabulary of structural
//!   mutations, applied by the pure reducer [`apply`].
//!
//! # Conventions
//!
//! - **Errors**: typed enums (`thiserror`) propagated with `?`; no panics
//!   in library code.
//! - **Logging**: `tracing` macros (`debug!`, `warn!`) at dispatch and
//!   rejection points.

pub mod apply;
pub mod dispatch;
pub mod event;
pub mod merge;
pub mod model;
pub mod normalize;
pub mod state;

pub use apply::{ApplyError, apply};
pub use dispatch::Store;
pub use event::{Event, WireEventError};
pub use normalize::{NormalizeError, NormalizedResponse, normalize_board, normalize_boards};
pub use state::{EntityPayload, EntityStore};
