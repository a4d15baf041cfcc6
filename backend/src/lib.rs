//! Dining Simulator Core - Rust Engine
//!
//! Stochastic discrete-event simulation of N actors in a ring competing
//! for N shared resources, each actor needing both neighbours at once.
//!
//! # Architecture
//!
//! - **core**: Monotonic simulation clock
//! - **models**: Domain types (Resource, Actor, SimulationState, EventLog)
//! - **events**: Scheduled events and the priority timeline
//! - **orchestrator**: Event loop, output snapshots, starvation search
//! - **params**: Partial parameter specs and rate randomization
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. A resource is held by at most one actor at a time
//! 2. An actor holds both of its resources or neither
//! 3. Simulated time never decreases
//! 4. All randomness is deterministic (seeded RNG passed explicitly)
//!
//! # Example
//!
//! ```
//! use dining_sim_core_rs::{Simulation, SimulationConfig};
//!
//! let config = SimulationConfig::new(1.0, vec![0.5, 0.5, 0.5, 0.5, 0.5], 100.0).with_seed(1);
//! let output = Simulation::new(config).unwrap().run().unwrap();
//!
//! for actor in &output.actors {
//!     println!(
//!         "actor {}: busy {:.2}, failed {}",
//!         actor.index, actor.busy_time, actor.failed_attempts
//!     );
//! }
//! ```

// Module declarations
pub mod core;
pub mod events;
pub mod models;
pub mod orchestrator;
pub mod params;
pub mod rng;

// Re-exports for convenience
pub use crate::core::time::{ClockError, SimClock};
pub use events::{EventKind, EventQueue, ScheduledEvent};
pub use models::{
    actor::{Actor, ActorError, ActorState},
    event::{Event, EventLog},
    resource::{Resource, ResourceError},
    state::{SimulationState, StateError},
};
pub use orchestrator::{
    ActorStats, ConfigError, RunParameters, SearchConfig, SearchOutcome, Simulation,
    SimulationConfig, SimulationError, SimulationOutput, StarvationSearch, StepResult,
};
pub use params::{ParameterSpec, RateSampler};
pub use rng::RngManager;

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn dining_sim_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::simulation::PySimulation>()?;
    m.add_function(wrap_pyfunction!(ffi::simulation::find_starvation, m)?)?;
    Ok(())
}
