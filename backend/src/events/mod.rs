//! Scheduled events and the event timeline
//!
//! - `types`: the `ScheduledEvent` record and its `EventKind`
//! - `queue`: the min-ordered `EventQueue` the simulation pops from

pub mod queue;
pub mod types;

pub use queue::EventQueue;
pub use types::{EventKind, ScheduledEvent};
