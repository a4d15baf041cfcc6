//! Event logging for simulation replay and auditing.
//!
//! Records every dispatched transition when `record_events` is enabled in
//! the simulation config. The log allows:
//! - Checking invariants after the fact (time ordering, mutual exclusion)
//! - Reconstructing each actor's eating intervals
//! - Comparing two runs event by event
//!
//! # Example
//!
//! ```rust
//! use dining_sim_core_rs::models::{Event, EventLog};
//!
//! let mut log = EventLog::new();
//! log.log(Event::RequestDenied {
//!     time: 0.4,
//!     actor: 2,
//!     retry_at: 1.1,
//!     failed_attempts: 1,
//! });
//!
//! assert_eq!(log.events_for_actor(2).len(), 1);
//! assert_eq!(log.events()[0].event_type(), "RequestDenied");
//! ```

use serde::{Deserialize, Serialize};

/// A processed state transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Actor picked up both resources and started eating
    RequestGranted {
        time: f64,
        actor: usize,
        finish_at: f64,
    },

    /// At least one resource was held; actor will retry
    RequestDenied {
        time: f64,
        actor: usize,
        retry_at: f64,
        failed_attempts: u64,
    },

    /// Actor put both resources down
    Finished {
        time: f64,
        actor: usize,
        /// Start of the eating interval that just ended
        started_at: f64,
        next_request_at: f64,
    },
}

impl Event {
    /// Simulated time at which the event was processed
    pub fn time(&self) -> f64 {
        match self {
            Event::RequestGranted { time, .. } => *time,
            Event::RequestDenied { time, .. } => *time,
            Event::Finished { time, .. } => *time,
        }
    }

    /// Actor the event belongs to
    pub fn actor(&self) -> usize {
        match self {
            Event::RequestGranted { actor, .. } => *actor,
            Event::RequestDenied { actor, .. } => *actor,
            Event::Finished { actor, .. } => *actor,
        }
    }

    /// Get a short description of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::RequestGranted { .. } => "RequestGranted",
            Event::RequestDenied { .. } => "RequestDenied",
            Event::Finished { .. } => "Finished",
        }
    }

    /// Time of the follow-up event this transition scheduled
    pub fn next_time(&self) -> f64 {
        match self {
            Event::RequestGranted { finish_at, .. } => *finish_at,
            Event::RequestDenied { retry_at, .. } => *retry_at,
            Event::Finished {
                next_request_at, ..
            } => *next_request_at,
        }
    }
}

/// Event log for storing and querying simulation events.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Events for one actor, in processing order
    pub fn events_for_actor(&self, actor: usize) -> Vec<&Event> {
        self.events.iter().filter(|e| e.actor() == actor).collect()
    }

    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Events processed in the half-open window [start, end)
    pub fn events_between(&self, start: f64, end: f64) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.time() >= start && e.time() < end)
            .collect()
    }

    /// Eating intervals `(start, end)` completed by `actor`
    pub fn busy_intervals(&self, actor: usize) -> Vec<(f64, f64)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Finished {
                    time,
                    actor: a,
                    started_at,
                    ..
                } if *a == actor => Some((*started_at, *time)),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
