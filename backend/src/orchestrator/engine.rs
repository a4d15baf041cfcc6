//! Simulation Engine
//!
//! Main event loop wiring the ring, the event queue, the clock and the
//! random source together.
//!
//! # Architecture
//!
//! ```text
//! Seed (t = 0):
//!   for each actor i in index order: dispatch REQUEST(i, 0), push follow-up
//!
//! Loop while clock < horizon:
//! 1. Pop earliest event (time, then actor index, then insertion order)
//! 2. Advance clock to event time
//! 3. Dispatch to owning actor (REQUEST or FINISH handler)
//! 4. Push the single follow-up event
//! 5. Optionally verify ring invariants and log the transition
//!
//! Horizon reached: discard the remaining queue and snapshot statistics.
//! ```
//!
//! The horizon check runs before each pop, so the event that carries the
//! clock to or past the horizon is still dispatched and its effects are
//! included in the output.
//!
//! # Example
//!
//! ```rust
//! use dining_sim_core_rs::orchestrator::{Simulation, SimulationConfig};
//!
//! let config = SimulationConfig::new(1.0, vec![1.0, 1.0, 1.0], 100.0).with_seed(7);
//! let mut simulation = Simulation::new(config).unwrap();
//! let output = simulation.run().unwrap();
//!
//! assert_eq!(output.actors.len(), 3);
//! assert!(output.final_time >= 100.0);
//! ```

use crate::core::time::{ClockError, SimClock};
use crate::events::{EventKind, EventQueue, ScheduledEvent};
use crate::models::actor::ActorError;
use crate::models::event::{Event, EventLog};
use crate::models::state::{SimulationState, StateError};
use crate::orchestrator::snapshot::{compute_config_hash, SimulationOutput};
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, trace};

// ============================================================================
// Configuration Types
// ============================================================================

/// Smallest ring that can exhibit contention
pub const MIN_ACTORS: usize = 3;

fn default_verify_invariants() -> bool {
    true
}

/// Complete simulation configuration
///
/// # Fields
///
/// * `num_actors` - Ring size; odd and at least 3
/// * `horizon` - Simulated time at which the run stops
/// * `service_rate` - μ, shared by every actor
/// * `request_rates` - λ per actor, one entry per ring position
/// * `rng_seed` - Seed for the explicit random source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub num_actors: usize,

    pub horizon: f64,

    pub service_rate: f64,

    pub request_rates: Vec<f64>,

    #[serde(default)]
    pub rng_seed: u64,

    /// Keep a full `EventLog` of every dispatch
    #[serde(default)]
    pub record_events: bool,

    /// Check ring invariants after every dispatch and abort on breach
    #[serde(default = "default_verify_invariants")]
    pub verify_invariants: bool,
}

impl SimulationConfig {
    /// Build a config whose ring size is the number of request rates
    pub fn new(service_rate: f64, request_rates: Vec<f64>, horizon: f64) -> Self {
        Self {
            num_actors: request_rates.len(),
            horizon,
            service_rate,
            request_rates,
            rng_seed: 0,
            record_events: false,
            verify_invariants: true,
        }
    }

    pub fn with_seed(mut self, rng_seed: u64) -> Self {
        self.rng_seed = rng_seed;
        self
    }

    pub fn with_event_recording(mut self, record_events: bool) -> Self {
        self.record_events = record_events;
        self
    }

    pub fn with_invariant_checks(mut self, verify_invariants: bool) -> Self {
        self.verify_invariants = verify_invariants;
        self
    }

    /// Validate every input before any state is built
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_ring_size(self.num_actors)?;
        validate_horizon(self.horizon)?;
        validate_service_rate(self.service_rate)?;

        if self.request_rates.len() != self.num_actors {
            return Err(ConfigError::RateCountMismatch {
                expected: self.num_actors,
                actual: self.request_rates.len(),
            });
        }
        validate_request_rates(&self.request_rates)
    }
}

/// Input validation failures
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Number of actors must be at least 3, got {0}")]
    TooFewActors(usize),

    #[error("Number of actors must be odd, got {0}")]
    EvenActorCount(usize),

    #[error("Horizon must be positive and finite, got {0}")]
    NonPositiveHorizon(f64),

    #[error("Service rate must be positive and finite, got {0}")]
    NonPositiveServiceRate(f64),

    #[error("Request rate of actor {index} must be positive and finite, got {rate}")]
    NonPositiveRequestRate { index: usize, rate: f64 },

    #[error("Expected {expected} request rates, got {actual}")]
    RateCountMismatch { expected: usize, actual: usize },

    #[error("Invalid randomization range [{min}, {max})")]
    InvalidRandomizationRange { min: f64, max: f64 },

    #[error("Starvation threshold must be in (0, 1], got {0}")]
    InvalidThreshold(f64),

    #[error("Search needs at least one attempt")]
    ZeroAttempts,
}

pub(crate) fn validate_ring_size(num_actors: usize) -> Result<(), ConfigError> {
    if num_actors < MIN_ACTORS {
        return Err(ConfigError::TooFewActors(num_actors));
    }
    if num_actors % 2 == 0 {
        return Err(ConfigError::EvenActorCount(num_actors));
    }
    Ok(())
}

pub(crate) fn validate_horizon(horizon: f64) -> Result<(), ConfigError> {
    if !(horizon > 0.0 && horizon.is_finite()) {
        return Err(ConfigError::NonPositiveHorizon(horizon));
    }
    Ok(())
}

pub(crate) fn validate_service_rate(rate: f64) -> Result<(), ConfigError> {
    if !(rate > 0.0 && rate.is_finite()) {
        return Err(ConfigError::NonPositiveServiceRate(rate));
    }
    Ok(())
}

pub(crate) fn validate_request_rates(rates: &[f64]) -> Result<(), ConfigError> {
    for (index, &rate) in rates.iter().enumerate() {
        if !(rate > 0.0 && rate.is_finite()) {
            return Err(ConfigError::NonPositiveRequestRate { index, rate });
        }
    }
    Ok(())
}

// ============================================================================
// Errors and Results
// ============================================================================

/// Simulation error types
///
/// `InvalidConfig` is returned before anything runs. Every other variant
/// means a run was aborted because the model broke one of its own rules.
#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    #[error("Invalid config: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("Actor error: {0}")]
    Actor(#[from] ActorError),

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Simulated time moved backwards: {from} -> {to}")]
    TimeRegression { from: f64, to: f64 },

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("No starved actor found after {attempts} attempts")]
    SearchExhausted { attempts: usize },
}

impl From<StateError> for SimulationError {
    fn from(err: StateError) -> Self {
        match err {
            StateError::Actor(e) => SimulationError::Actor(e),
            StateError::Invariant(msg) => SimulationError::InvariantViolation(msg),
            StateError::UnknownActor(index) => {
                SimulationError::InvariantViolation(format!("event for unknown actor {}", index))
            }
        }
    }
}

impl From<ClockError> for SimulationError {
    fn from(err: ClockError) -> Self {
        match err {
            ClockError::Regression { from, to } => SimulationError::TimeRegression { from, to },
            ClockError::InvalidTime(t) => {
                SimulationError::InvariantViolation(format!("invalid event time {}", t))
            }
        }
    }
}

/// Result of dispatching a single event
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// The event that was dispatched
    pub event: ScheduledEvent,

    /// The follow-up event pushed in its place
    pub next: ScheduledEvent,

    /// Whether the clock has now reached the horizon
    pub horizon_reached: bool,
}

// ============================================================================
// Simulation
// ============================================================================

/// Owns the ring, the timeline and the random source for one run
///
/// # Determinism
///
/// All randomness comes from `rng`, seeded from `config.rng_seed`, and
/// simultaneous events pop in actor-index order. Same config ⇒ identical
/// output.
pub struct Simulation {
    config: SimulationConfig,

    state: SimulationState,

    clock: SimClock,

    queue: EventQueue,

    rng: RngManager,

    event_log: EventLog,

    /// Dispatches so far, seeding included
    events_processed: u64,

    started: bool,

    config_hash: String,
}

impl Simulation {
    /// Create a simulation from configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Simulation)` - Ring built, no events seeded yet
    /// * `Err(SimulationError::InvalidConfig)` - Validation failed
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;

        let state = SimulationState::ring(config.service_rate, &config.request_rates)?;
        let clock = SimClock::new(config.horizon);
        let queue = EventQueue::with_capacity(config.num_actors);
        let rng = RngManager::new(config.rng_seed);
        let config_hash = compute_config_hash(&config)?;

        Ok(Self {
            config,
            state,
            clock,
            queue,
            rng,
            event_log: EventLog::new(),
            events_processed: 0,
            started: false,
            config_hash,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Current simulated time
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    pub fn horizon(&self) -> f64 {
        self.clock.horizon()
    }

    pub fn is_finished(&self) -> bool {
        self.clock.horizon_reached()
    }

    /// Events currently waiting in the timeline
    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    pub fn events_processed(&self) -> u64 {
        self.events_processed
    }

    /// Recorded transitions (empty unless `record_events` is set)
    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    pub fn config_hash(&self) -> &str {
        &self.config_hash
    }

    // ========================================================================
    // Event Loop
    // ========================================================================

    /// Dispatch the initial REQUEST of every actor at time zero
    ///
    /// Called automatically by `step` and `run`; calling it twice is a
    /// no-op.
    pub fn start(&mut self) -> Result<(), SimulationError> {
        if self.started {
            return Ok(());
        }
        self.started = true;

        info!(
            num_actors = self.config.num_actors,
            horizon = self.config.horizon,
            service_rate = self.config.service_rate,
            seed = self.config.rng_seed,
            "starting simulation"
        );

        for actor in 0..self.state.num_actors() {
            let event = ScheduledEvent::request(actor, 0.0);
            let next = self.dispatch(&event)?;
            self.queue.push(next);
        }

        Ok(())
    }

    /// Pop and dispatch one event
    ///
    /// Returns `Ok(None)` once the horizon has been reached; nothing is
    /// popped after that.
    pub fn step(&mut self) -> Result<Option<StepResult>, SimulationError> {
        self.start()?;

        if self.clock.horizon_reached() {
            return Ok(None);
        }

        let event = self.queue.pop_earliest().ok_or_else(|| {
            SimulationError::InvariantViolation("event queue drained before horizon".to_string())
        })?;

        self.clock.advance_to(event.time)?;
        let next = self.dispatch(&event)?;
        self.queue.push(next);

        Ok(Some(StepResult {
            event,
            next,
            horizon_reached: self.clock.horizon_reached(),
        }))
    }

    /// Run to the horizon and return the statistics snapshot
    ///
    /// Events still pending when the horizon is reached are discarded.
    pub fn run(&mut self) -> Result<SimulationOutput, SimulationError> {
        self.start()?;

        while self.step()?.is_some() {}

        self.queue.clear();

        let output = self.output();
        info!(
            final_time = output.final_time,
            events_processed = output.events_processed,
            total_busy_time = output.total_busy_time(),
            total_failed_attempts = output.total_failed_attempts(),
            "simulation finished"
        );
        Ok(output)
    }

    /// Snapshot of the current statistics
    pub fn output(&self) -> SimulationOutput {
        SimulationOutput::capture(self)
    }

    /// Route one event to its actor, then log and verify
    fn dispatch(&mut self, event: &ScheduledEvent) -> Result<ScheduledEvent, SimulationError> {
        let started_at = self
            .state
            .actor(event.actor)
            .map(|a| a.last_acquired_at())
            .unwrap_or_default();

        let next = self.state.dispatch(event, &mut self.rng).map_err(|e| {
            error!(actor = event.actor, time = event.time, error = %e, "dispatch failed");
            SimulationError::from(e)
        })?;
        self.events_processed += 1;

        trace!(
            actor = event.actor,
            time = event.time,
            kind = %event.kind,
            next_kind = %next.kind,
            next_time = next.time,
            "dispatched"
        );

        if self.config.verify_invariants {
            self.state.check_invariants().map_err(|e| {
                error!(actor = event.actor, time = event.time, error = %e, "ring invariant broken");
                SimulationError::from(e)
            })?;
        }

        if self.config.record_events {
            self.event_log.log(transition(event, &next, started_at, &self.state));
        }

        Ok(next)
    }
}

/// Build the log entry for a dispatched event
fn transition(
    event: &ScheduledEvent,
    next: &ScheduledEvent,
    started_at: f64,
    state: &SimulationState,
) -> Event {
    match (event.kind, next.kind) {
        (EventKind::Request, EventKind::Finish) => Event::RequestGranted {
            time: event.time,
            actor: event.actor,
            finish_at: next.time,
        },
        (EventKind::Request, EventKind::Request) => Event::RequestDenied {
            time: event.time,
            actor: event.actor,
            retry_at: next.time,
            failed_attempts: state
                .actor(event.actor)
                .map(|a| a.failed_attempts())
                .unwrap_or_default(),
        },
        (EventKind::Finish, _) => Event::Finished {
            time: event.time,
            actor: event.actor,
            started_at,
            next_request_at: next.time,
        },
    }
}
