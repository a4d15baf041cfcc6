//! Snapshot - Read-only Run Statistics
//!
//! Captures what a finished (or paused) run produced so it can be handed
//! to an external consumer: plotting scripts, the starvation search, the
//! CLI's JSON output.
//!
//! # Critical Invariants
//!
//! - **Determinism**: Same config (seed included) produces an identical
//!   snapshot, byte for byte, and therefore the same `digest()`
//! - **Ordered request logs**: every actor's request log is non-decreasing
//! - **Bounded busy time**: no actor ate for longer than the run lasted
//! - **Config matching**: `config_hash` identifies the exact inputs

use crate::models::actor::Actor;
use crate::orchestrator::engine::{Simulation, SimulationConfig, SimulationError};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

// ============================================================================
// Snapshot Structures
// ============================================================================

/// Inputs of the run, echoed next to its results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunParameters {
    pub num_actors: usize,
    pub service_rate: f64,
    pub request_rates: Vec<f64>,
    pub horizon: f64,
    pub rng_seed: u64,
}

impl From<&SimulationConfig> for RunParameters {
    fn from(config: &SimulationConfig) -> Self {
        RunParameters {
            num_actors: config.num_actors,
            service_rate: config.service_rate,
            request_rates: config.request_rates.clone(),
            horizon: config.horizon,
            rng_seed: config.rng_seed,
        }
    }
}

/// Per-actor statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorStats {
    pub index: usize,
    pub request_rate: f64,
    /// Total time spent holding both resources
    pub busy_time: f64,
    pub failed_attempts: u64,
    pub finish_count: u64,
    /// Every REQUEST timestamp, in dispatch order
    pub request_log: Vec<f64>,
}

impl From<&Actor> for ActorStats {
    fn from(actor: &Actor) -> Self {
        ActorStats {
            index: actor.index(),
            request_rate: actor.request_rate(),
            busy_time: actor.busy_time(),
            failed_attempts: actor.failed_attempts(),
            finish_count: actor.finish_count(),
            request_log: actor.request_log().to_vec(),
        }
    }
}

impl ActorStats {
    /// Number of REQUEST events dispatched to this actor
    pub fn request_count(&self) -> usize {
        self.request_log.len()
    }
}

/// Complete output of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub params: RunParameters,

    pub actors: Vec<ActorStats>,

    /// Clock reading after the last dispatched event
    pub final_time: f64,

    pub events_processed: u64,

    /// SHA256 of the canonical config JSON
    pub config_hash: String,
}

impl SimulationOutput {
    /// Read the current statistics out of a simulation
    pub fn capture(simulation: &Simulation) -> Self {
        SimulationOutput {
            params: RunParameters::from(simulation.config()),
            actors: simulation
                .state()
                .actors()
                .iter()
                .map(ActorStats::from)
                .collect(),
            final_time: simulation.now(),
            events_processed: simulation.events_processed(),
            config_hash: simulation.config_hash().to_string(),
        }
    }

    /// Indices of actors whose busy time is below `fraction × horizon`
    pub fn starved_actors(&self, fraction: f64) -> Vec<usize> {
        let threshold = self.params.horizon * fraction;
        self.actors
            .iter()
            .filter(|a| a.busy_time < threshold)
            .map(|a| a.index)
            .collect()
    }

    pub fn total_busy_time(&self) -> f64 {
        self.actors.iter().map(|a| a.busy_time).sum()
    }

    pub fn total_failed_attempts(&self) -> u64 {
        self.actors.iter().map(|a| a.failed_attempts).sum()
    }

    pub fn total_finish_count(&self) -> u64 {
        self.actors.iter().map(|a| a.finish_count).sum()
    }

    pub fn to_json(&self) -> Result<String, SimulationError> {
        serde_json::to_string(self).map_err(|e| {
            SimulationError::SerializationError(format!("Output serialization failed: {}", e))
        })
    }

    pub fn to_json_pretty(&self) -> Result<String, SimulationError> {
        serde_json::to_string_pretty(self).map_err(|e| {
            SimulationError::SerializationError(format!("Output serialization failed: {}", e))
        })
    }

    /// SHA256 hex digest of the compact JSON form
    ///
    /// Two runs with equal digests produced byte-identical statistics.
    pub fn digest(&self) -> Result<String, SimulationError> {
        let json = self.to_json()?;
        let mut hasher = Sha256::new();
        hasher.update(json.as_bytes());
        Ok(format!("{:x}", hasher.finalize()))
    }
}

// ============================================================================
// Config Hashing
// ============================================================================

/// Compute deterministic SHA256 hash of config
///
/// Uses canonical JSON serialization with sorted keys so the hash does
/// not depend on field or map ordering.
pub fn compute_config_hash<T: Serialize>(config: &T) -> Result<String, SimulationError> {
    use serde_json::Value;
    use std::collections::BTreeMap;

    let value = serde_json::to_value(config).map_err(|e| {
        SimulationError::SerializationError(format!("Config serialization failed: {}", e))
    })?;

    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let json = serde_json::to_string(&canonicalize(value)).map_err(|e| {
        SimulationError::SerializationError(format!("Config serialization failed: {}", e))
    })?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Validate snapshot integrity
///
/// Checks:
/// - One stats entry per actor, in ring order
/// - Request logs are non-decreasing and never run past `final_time`
/// - Busy time is non-negative and at most `final_time` per actor
/// - Total busy time ≤ completed intervals × `final_time`
pub fn validate_output(output: &SimulationOutput) -> Result<(), SimulationError> {
    let n = output.params.num_actors;
    if output.actors.len() != n || output.params.request_rates.len() != n {
        return Err(SimulationError::InvariantViolation(format!(
            "expected {} actors, snapshot has {} stats and {} rates",
            n,
            output.actors.len(),
            output.params.request_rates.len()
        )));
    }

    for (position, stats) in output.actors.iter().enumerate() {
        if stats.index != position {
            return Err(SimulationError::InvariantViolation(format!(
                "stats at position {} belong to actor {}",
                position, stats.index
            )));
        }

        if stats.request_log.windows(2).any(|w| w[1] < w[0]) {
            return Err(SimulationError::InvariantViolation(format!(
                "request log of actor {} is not ordered",
                stats.index
            )));
        }

        if let Some(&last) = stats.request_log.last() {
            if last > output.final_time {
                return Err(SimulationError::InvariantViolation(format!(
                    "actor {} has a request at {} after final time {}",
                    stats.index, last, output.final_time
                )));
            }
        }

        if stats.busy_time < 0.0 || stats.busy_time > output.final_time {
            return Err(SimulationError::InvariantViolation(format!(
                "actor {} busy time {} outside [0, {}]",
                stats.index, stats.busy_time, output.final_time
            )));
        }
    }

    let bound = output.total_finish_count() as f64 * output.final_time;
    if output.total_busy_time() > bound {
        return Err(SimulationError::InvariantViolation(format!(
            "total busy time {} exceeds {} completed intervals over {}",
            output.total_busy_time(),
            output.total_finish_count(),
            output.final_time
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_output() -> SimulationOutput {
        SimulationOutput {
            params: RunParameters {
                num_actors: 3,
                service_rate: 1.0,
                request_rates: vec![1.0, 2.0, 3.0],
                horizon: 10.0,
                rng_seed: 1,
            },
            actors: vec![
                ActorStats {
                    index: 0,
                    request_rate: 1.0,
                    busy_time: 4.0,
                    failed_attempts: 2,
                    finish_count: 2,
                    request_log: vec![0.0, 1.0, 5.0],
                },
                ActorStats {
                    index: 1,
                    request_rate: 2.0,
                    busy_time: 0.05,
                    failed_attempts: 9,
                    finish_count: 1,
                    request_log: vec![0.0, 0.4, 0.9],
                },
                ActorStats {
                    index: 2,
                    request_rate: 3.0,
                    busy_time: 3.0,
                    failed_attempts: 1,
                    finish_count: 1,
                    request_log: vec![0.0, 2.0],
                },
            ],
            final_time: 10.2,
            events_processed: 30,
            config_hash: "abc".to_string(),
        }
    }

    #[test]
    fn test_compute_config_hash_deterministic() {
        let config = SimulationConfig::new(1.0, vec![0.5; 3], 10.0);

        let hash1 = compute_config_hash(&config).unwrap();
        let hash2 = compute_config_hash(&config.clone()).unwrap();

        assert_eq!(hash1, hash2, "Same config should produce same hash");
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_compute_config_hash_different_for_different_seeds() {
        let config = SimulationConfig::new(1.0, vec![0.5; 3], 10.0);

        let hash1 = compute_config_hash(&config.clone().with_seed(1)).unwrap();
        let hash2 = compute_config_hash(&config.with_seed(2)).unwrap();

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_starved_actors_uses_horizon_fraction() {
        let output = sample_output();

        assert_eq!(output.starved_actors(0.01), vec![1]);
        assert_eq!(output.starved_actors(0.35), vec![1, 2]);
        assert!(output.starved_actors(0.001).is_empty());
    }

    #[test]
    fn test_totals() {
        let output = sample_output();

        assert!((output.total_busy_time() - 7.05).abs() < 1e-12);
        assert_eq!(output.total_failed_attempts(), 12);
        assert_eq!(output.total_finish_count(), 4);
        assert_eq!(output.actors[0].request_count(), 3);
    }

    #[test]
    fn test_validate_output_accepts_consistent_snapshot() {
        validate_output(&sample_output()).unwrap();
    }

    #[test]
    fn test_validate_output_rejects_unordered_log() {
        let mut output = sample_output();
        output.actors[2].request_log = vec![3.0, 2.0];

        assert!(matches!(
            validate_output(&output),
            Err(SimulationError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_validate_output_rejects_excess_busy_time() {
        let mut output = sample_output();
        output.actors[0].busy_time = 11.0;

        assert!(validate_output(&output).is_err());
    }

    #[test]
    fn test_digest_changes_with_content() {
        let output = sample_output();
        let mut other = sample_output();
        other.actors[1].failed_attempts += 1;

        assert_eq!(output.digest().unwrap(), sample_output().digest().unwrap());
        assert_ne!(output.digest().unwrap(), other.digest().unwrap());
    }
}
