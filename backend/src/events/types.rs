//! Scheduled event types
//!
//! A `ScheduledEvent` is a pending state transition for one actor. It is
//! created by an actor handler, sits in the `EventQueue` until its time
//! comes up, and is consumed when dispatched.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What the owning actor should do when the event fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Try to pick up both adjacent resources
    Request,

    /// Put both resources back down
    Finish,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Request => write!(f, "request"),
            EventKind::Finish => write!(f, "finish"),
        }
    }
}

/// A timestamped transition for one actor
///
/// `actor` is an index into the simulation's actor arena.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub actor: usize,
    pub time: f64,
    pub kind: EventKind,
}

impl ScheduledEvent {
    pub fn request(actor: usize, time: f64) -> Self {
        Self {
            actor,
            time,
            kind: EventKind::Request,
        }
    }

    pub fn finish(actor: usize, time: f64) -> Self {
        Self {
            actor,
            time,
            kind: EventKind::Finish,
        }
    }
}
