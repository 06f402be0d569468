//! Application layer - sequencing between the store and live viewers.
//!
//! - `BroadcastCoordinator` - record then fan out an event after a mutation
//! - `SnapshotJoin` - register a viewer and hand it a consistent snapshot
//! - `LiveContext` - owned handle with a start/stop lifecycle

mod broadcast;
mod context;
mod join;

pub use broadcast::BroadcastCoordinator;
pub use context::LiveContext;
pub use join::{JoinError, SnapshotJoin};
