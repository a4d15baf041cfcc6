//! Actor (philosopher) model
//!
//! Each actor sits between two resources in the ring and alternates
//! between waiting and eating:
//!
//! ```text
//!            REQUEST, both free
//!   WAITING ───────────────────► EATING
//!     ▲  │                         │
//!     │  └─ REQUEST, busy:         │ FINISH
//!     │     retry after Exp(λ)     │
//!     └────────────────────────────┘
//!           next REQUEST after Exp(λ)
//! ```
//!
//! Every handler call consumes one event and returns exactly one
//! follow-up event, so the number of live events never changes after
//! seeding.
//!
//! The actor refers to its resources by index into the simulation's
//! resource arena and draws all delays from the `RngManager` it is
//! handed.

use crate::events::{EventKind, ScheduledEvent};
use crate::models::resource::{Resource, ResourceError};
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised by actor handlers
#[derive(Debug, Error, PartialEq)]
pub enum ActorError {
    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),

    #[error("Actor {actor} references missing resource {index}")]
    MissingResource { actor: usize, index: usize },

    #[error("Actor {actor} received {kind} event while {state}")]
    UnexpectedEvent {
        actor: usize,
        kind: EventKind,
        state: ActorState,
    },

    #[error("Actor {actor} has invalid {name} rate {rate}")]
    InvalidRate {
        actor: usize,
        name: &'static str,
        rate: f64,
    },
}

/// Position in the waiting/eating cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorState {
    /// Holds neither resource
    Waiting,

    /// Holds both resources
    Eating,
}

impl fmt::Display for ActorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActorState::Waiting => write!(f, "waiting"),
            ActorState::Eating => write!(f, "eating"),
        }
    }
}

/// One ring participant and its accumulated statistics
///
/// # Example
/// ```
/// use dining_sim_core_rs::{Actor, ActorState, Resource, RngManager};
/// use dining_sim_core_rs::events::EventKind;
///
/// let mut resources = vec![Resource::new(0), Resource::new(1), Resource::new(2)];
/// let mut rng = RngManager::new(1);
/// let mut actor = Actor::new(0, 0, 1, 1.0, 1.0).unwrap();
///
/// let next = actor.request(0.0, &mut resources, &mut rng).unwrap();
/// assert_eq!(next.kind, EventKind::Finish);
/// assert_eq!(actor.state(), ActorState::Eating);
/// assert!(!resources[0].is_free() && !resources[1].is_free());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    index: usize,

    /// μ: rate of the exponential eating duration
    service_rate: f64,

    /// λ: rate of the exponential delay before the next request
    request_rate: f64,

    /// Resource arena index on the left
    left: usize,

    /// Resource arena index on the right
    right: usize,

    state: ActorState,

    failed_attempts: u64,

    /// Total time spent eating
    busy_time: f64,

    /// Time of the most recent successful acquisition
    last_acquired_at: f64,

    /// Timestamp of every REQUEST dispatched to this actor, in order
    request_log: Vec<f64>,

    finish_count: u64,
}

impl Actor {
    /// Create a waiting actor between resources `left` and `right`
    pub fn new(
        index: usize,
        left: usize,
        right: usize,
        service_rate: f64,
        request_rate: f64,
    ) -> Result<Self, ActorError> {
        if !(service_rate > 0.0 && service_rate.is_finite()) {
            return Err(ActorError::InvalidRate {
                actor: index,
                name: "service",
                rate: service_rate,
            });
        }
        if !(request_rate > 0.0 && request_rate.is_finite()) {
            return Err(ActorError::InvalidRate {
                actor: index,
                name: "request",
                rate: request_rate,
            });
        }

        Ok(Self {
            index,
            service_rate,
            request_rate,
            left,
            right,
            state: ActorState::Waiting,
            failed_attempts: 0,
            busy_time: 0.0,
            last_acquired_at: 0.0,
            request_log: Vec::new(),
            finish_count: 0,
        })
    }

    // ========================================================================
    // Handlers
    // ========================================================================

    /// Handle a REQUEST event at `time`
    ///
    /// Picks up both resources if both are free and schedules FINISH after
    /// Exp(μ); otherwise counts a failed attempt and schedules another
    /// REQUEST after Exp(λ). Failed attempts never wait on the resource.
    pub fn request(
        &mut self,
        time: f64,
        resources: &mut [Resource],
        rng: &mut RngManager,
    ) -> Result<ScheduledEvent, ActorError> {
        if self.state != ActorState::Waiting {
            return Err(self.unexpected(EventKind::Request));
        }

        self.request_log.push(time);

        let left_free = self.resource(resources, self.left)?.is_free();
        let right_free = self.resource(resources, self.right)?.is_free();

        if left_free && right_free {
            self.resource_mut(resources, self.left)?.acquire()?;
            self.resource_mut(resources, self.right)?.acquire()?;
            self.last_acquired_at = time;
            self.state = ActorState::Eating;
            Ok(ScheduledEvent::finish(
                self.index,
                time + rng.exponential(self.service_rate),
            ))
        } else {
            self.failed_attempts += 1;
            Ok(ScheduledEvent::request(
                self.index,
                time + rng.exponential(self.request_rate),
            ))
        }
    }

    /// Handle a FINISH event at `time`
    ///
    /// Releases both resources, banks the eating interval and schedules
    /// the next REQUEST after Exp(λ).
    pub fn finish(
        &mut self,
        time: f64,
        resources: &mut [Resource],
        rng: &mut RngManager,
    ) -> Result<ScheduledEvent, ActorError> {
        if self.state != ActorState::Eating {
            return Err(self.unexpected(EventKind::Finish));
        }

        self.resource_mut(resources, self.left)?.release()?;
        self.resource_mut(resources, self.right)?.release()?;
        self.busy_time += time - self.last_acquired_at;
        self.finish_count += 1;
        self.state = ActorState::Waiting;

        Ok(ScheduledEvent::request(
            self.index,
            time + rng.exponential(self.request_rate),
        ))
    }

    /// Route an event to the matching handler
    pub fn handle(
        &mut self,
        event: &ScheduledEvent,
        resources: &mut [Resource],
        rng: &mut RngManager,
    ) -> Result<ScheduledEvent, ActorError> {
        match event.kind {
            EventKind::Request => self.request(event.time, resources, rng),
            EventKind::Finish => self.finish(event.time, resources, rng),
        }
    }

    fn unexpected(&self, kind: EventKind) -> ActorError {
        ActorError::UnexpectedEvent {
            actor: self.index,
            kind,
            state: self.state,
        }
    }

    fn resource<'a>(
        &self,
        resources: &'a [Resource],
        index: usize,
    ) -> Result<&'a Resource, ActorError> {
        resources.get(index).ok_or(ActorError::MissingResource {
            actor: self.index,
            index,
        })
    }

    fn resource_mut<'a>(
        &self,
        resources: &'a mut [Resource],
        index: usize,
    ) -> Result<&'a mut Resource, ActorError> {
        resources.get_mut(index).ok_or(ActorError::MissingResource {
            actor: self.index,
            index,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn service_rate(&self) -> f64 {
        self.service_rate
    }

    pub fn request_rate(&self) -> f64 {
        self.request_rate
    }

    pub fn left(&self) -> usize {
        self.left
    }

    pub fn right(&self) -> usize {
        self.right
    }

    pub fn state(&self) -> ActorState {
        self.state
    }

    pub fn is_eating(&self) -> bool {
        self.state == ActorState::Eating
    }

    pub fn failed_attempts(&self) -> u64 {
        self.failed_attempts
    }

    pub fn busy_time(&self) -> f64 {
        self.busy_time
    }

    pub fn last_acquired_at(&self) -> f64 {
        self.last_acquired_at
    }

    pub fn request_log(&self) -> &[f64] {
        &self.request_log
    }

    /// Number of completed eating intervals
    pub fn finish_count(&self) -> u64 {
        self.finish_count
    }
}
