//! Starvation search
//!
//! Repeats randomized runs until one of them leaves an actor starved,
//! i.e. with busy time below `threshold_fraction × horizon`.
//!
//! ```text
//! rng ← seed
//! for attempt in 1..=max_attempts:
//!     attempt seed ← rng
//!     μ, λ ← given values, or sampled from rng
//!     run simulation
//!     if some actor starved: return it
//! fail with SearchExhausted
//! ```
//!
//! When μ and every λ are fixed there is nothing to vary, so the search
//! runs once and reports whether that run starved anyone.

use crate::models::event::Event;
use crate::orchestrator::engine::{ConfigError, Simulation, SimulationConfig, SimulationError};
use crate::orchestrator::snapshot::SimulationOutput;
use crate::params::{ParameterSpec, RateSampler};
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Busy-time fraction of the horizon below which an actor counts as starved
pub const DEFAULT_STARVATION_FRACTION: f64 = 0.01;

pub const DEFAULT_MAX_ATTEMPTS: usize = 10_000;

/// Stopping rules for the search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub threshold_fraction: f64,
    pub max_attempts: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            threshold_fraction: DEFAULT_STARVATION_FRACTION,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.threshold_fraction > 0.0 && self.threshold_fraction <= 1.0) {
            return Err(ConfigError::InvalidThreshold(self.threshold_fraction));
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        Ok(())
    }
}

/// What the search found
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// The last run performed (the starving one, if found)
    pub output: SimulationOutput,

    /// Lowest-index starved actor, if any
    pub starved_actor: Option<usize>,

    /// Runs performed, including the final one
    pub attempts: usize,

    /// Event log of the final run, present when `record_events` is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<Event>>,
}

/// Driver that looks for a starving parameter set
///
/// # Example
///
/// ```
/// use dining_sim_core_rs::orchestrator::{SearchConfig, StarvationSearch};
/// use dining_sim_core_rs::params::ParameterSpec;
///
/// let spec = ParameterSpec {
///     num_actors: 3,
///     horizon: 1.0,
///     service_rate: Some(0.01),
///     request_rates: Some(vec![100.0, 100.0, 100.0]),
///     ..Default::default()
/// };
///
/// let outcome = StarvationSearch::new(spec, SearchConfig::default())
///     .unwrap()
///     .run()
///     .unwrap();
/// assert_eq!(outcome.attempts, 1);
/// assert!(outcome.starved_actor.is_some());
/// ```
#[derive(Debug, Clone)]
pub struct StarvationSearch {
    spec: ParameterSpec,
    sampler: RateSampler,
    config: SearchConfig,
}

impl StarvationSearch {
    pub fn new(spec: ParameterSpec, config: SearchConfig) -> Result<Self, SimulationError> {
        spec.validate()?;
        config.validate()?;
        Ok(Self {
            spec,
            sampler: RateSampler::default(),
            config,
        })
    }

    pub fn with_sampler(mut self, sampler: RateSampler) -> Self {
        self.sampler = sampler;
        self
    }

    pub fn spec(&self) -> &ParameterSpec {
        &self.spec
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn run(&self) -> Result<SearchOutcome, SimulationError> {
        let mut rng = RngManager::new(self.spec.rng_seed);

        if self.spec.is_fully_specified() {
            let config = self.spec.resolve(&self.sampler, &mut rng)?;
            let (output, events) = simulate(config)?;
            let starved_actor = self.first_starved(&output);
            if let Some(actor) = starved_actor {
                info!(actor, "fixed parameters starve an actor");
            }
            return Ok(SearchOutcome {
                output,
                starved_actor,
                attempts: 1,
                events,
            });
        }

        for attempt in 1..=self.config.max_attempts {
            let mut attempt_spec = self.spec.clone();
            attempt_spec.rng_seed = rng.derive_seed();
            let config = attempt_spec.resolve(&self.sampler, &mut rng)?;

            let (output, events) = simulate(config)?;

            match self.first_starved(&output) {
                Some(actor) => {
                    info!(
                        attempt,
                        actor,
                        busy_time = output.actors[actor].busy_time,
                        service_rate = output.params.service_rate,
                        "found starved actor"
                    );
                    return Ok(SearchOutcome {
                        output,
                        starved_actor: Some(actor),
                        attempts: attempt,
                        events,
                    });
                }
                None => debug!(attempt, "no starvation"),
            }
        }

        Err(SimulationError::SearchExhausted {
            attempts: self.config.max_attempts,
        })
    }

    fn first_starved(&self, output: &SimulationOutput) -> Option<usize> {
        output
            .starved_actors(self.config.threshold_fraction)
            .first()
            .copied()
    }
}

/// Run one simulation, keeping its event log only if it was recorded
fn simulate(
    config: SimulationConfig,
) -> Result<(SimulationOutput, Option<Vec<Event>>), SimulationError> {
    let record = config.record_events;
    let mut simulation = Simulation::new(config)?;
    let output = simulation.run()?;
    let events = record.then(|| simulation.event_log().events().to_vec());
    Ok((output, events))
}
