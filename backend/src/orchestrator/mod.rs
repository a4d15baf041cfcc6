//! Orchestrator - simulation driver
//!
//! - `engine`: config, validation and the event loop
//! - `snapshot`: read-only output statistics and hashing
//! - `search`: repeated randomized runs until an actor starves

pub mod engine;
pub mod search;
pub mod snapshot;

// Re-export main types for convenience
pub use engine::{
    ConfigError, Simulation, SimulationConfig, SimulationError, StepResult, MIN_ACTORS,
};
pub use search::{
    SearchConfig, SearchOutcome, StarvationSearch, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_STARVATION_FRACTION,
};
pub use snapshot::{
    compute_config_hash, validate_output, ActorStats, RunParameters, SimulationOutput,
};
