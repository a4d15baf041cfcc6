//! Simulation State
//!
//! Index-based arena holding every resource and actor of the ring.
//! Actors refer to resources by position in `resources`; nothing holds a
//! direct reference to anything else, so the whole state is plain owned
//! data.
//!
//! # Critical Invariants
//!
//! 1. **Ring wiring**: actor `i` has left = `i`, right = `(i + 1) % n`
//! 2. **Mutual exclusion**: a resource is held by at most one eating actor
//! 3. **All or nothing**: an actor holds both of its resources or neither
//! 4. **No stray holds**: a held resource always belongs to an eating neighbour

use crate::events::ScheduledEvent;
use crate::models::actor::{Actor, ActorError};
use crate::models::resource::Resource;
use crate::rng::RngManager;
use thiserror::Error;

/// Errors raised while dispatching into or checking the arena
#[derive(Debug, Error, PartialEq)]
pub enum StateError {
    #[error("No actor at index {0}")]
    UnknownActor(usize),

    #[error(transparent)]
    Actor(#[from] ActorError),

    #[error("Invariant violated: {0}")]
    Invariant(String),
}

/// Complete ring state
///
/// # Example
///
/// ```rust
/// use dining_sim_core_rs::SimulationState;
///
/// let state = SimulationState::ring(1.0, &[0.5, 0.5, 0.5, 0.5, 0.5]).unwrap();
/// assert_eq!(state.num_actors(), 5);
///
/// let last = state.actor(4).unwrap();
/// assert_eq!((last.left(), last.right()), (4, 0));
/// ```
#[derive(Debug, Clone)]
pub struct SimulationState {
    resources: Vec<Resource>,
    actors: Vec<Actor>,
}

impl SimulationState {
    /// Wire one actor per request rate into a ring over as many resources
    ///
    /// Rates are validated by `Actor::new`; ring size rules are checked by
    /// the simulation config.
    pub fn ring(service_rate: f64, request_rates: &[f64]) -> Result<Self, StateError> {
        let n = request_rates.len();
        let resources = (0..n).map(Resource::new).collect();
        let actors = request_rates
            .iter()
            .enumerate()
            .map(|(i, &rate)| Actor::new(i, i, (i + 1) % n, service_rate, rate))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { resources, actors })
    }

    pub fn num_actors(&self) -> usize {
        self.actors.len()
    }

    pub fn actor(&self, index: usize) -> Option<&Actor> {
        self.actors.get(index)
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn resource(&self, index: usize) -> Option<&Resource> {
        self.resources.get(index)
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// Number of actors currently eating
    pub fn eating_count(&self) -> usize {
        self.actors.iter().filter(|a| a.is_eating()).count()
    }

    /// Number of resources currently held
    pub fn held_count(&self) -> usize {
        self.resources.iter().filter(|r| !r.is_free()).count()
    }

    /// Hand `event` to its owning actor and return the follow-up event
    pub fn dispatch(
        &mut self,
        event: &ScheduledEvent,
        rng: &mut RngManager,
    ) -> Result<ScheduledEvent, StateError> {
        let actor = self
            .actors
            .get_mut(event.actor)
            .ok_or(StateError::UnknownActor(event.actor))?;

        Ok(actor.handle(event, &mut self.resources, rng)?)
    }

    /// Check mutual exclusion and all-or-nothing holding across the ring
    ///
    /// Resource `j` is adjacent to actor `j` (as its left) and actor
    /// `j - 1` (as its right). It must be held iff exactly one of those
    /// two actors is eating.
    pub fn check_invariants(&self) -> Result<(), StateError> {
        let n = self.actors.len();
        if self.resources.len() != n {
            return Err(StateError::Invariant(format!(
                "{} actors but {} resources",
                n,
                self.resources.len()
            )));
        }

        for (j, resource) in self.resources.iter().enumerate() {
            let left_owner = &self.actors[j];
            let right_owner = &self.actors[(j + n - 1) % n];

            let holders = [left_owner, right_owner]
                .iter()
                .filter(|a| a.is_eating())
                .count();

            if holders > 1 {
                return Err(StateError::Invariant(format!(
                    "resource {} claimed by eating actors {} and {}",
                    j,
                    right_owner.index(),
                    left_owner.index()
                )));
            }

            let held = !resource.is_free();
            if held && holders == 0 {
                return Err(StateError::Invariant(format!(
                    "resource {} held with no eating neighbour",
                    j
                )));
            }
            if !held && holders == 1 {
                return Err(StateError::Invariant(format!(
                    "resource {} free while a neighbour is eating",
                    j
                )));
            }
        }

        Ok(())
    }
}
