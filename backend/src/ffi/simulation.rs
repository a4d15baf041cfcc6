//! PyO3 wrapper for Simulation
//!
//! # Example (from Python)
//!
//! ```python
//! from dining_sim_core_rs import Simulation, find_starvation
//!
//! sim = Simulation({
//!     "service_rate": 1.0,
//!     "request_rates": [1.0, 1.0, 1.0],
//!     "horizon": 100.0,
//!     "rng_seed": 7,
//! })
//! out = sim.run()
//! events = sim.event_log()  # [] unless "record_events" was set
//! busy = [a["busy_time"] for a in out["actors"]]
//!
//! found = find_starvation({"num_actors": 5, "horizon": 500.0})
//! print(found["starved_actor"], found["attempts"])
//! ```

use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use super::types::{
    events_to_py, output_to_py, parse_parameter_spec, parse_simulation_config,
    search_outcome_to_py, step_result_to_py,
};
use crate::orchestrator::{
    SearchConfig, Simulation as RustSimulation, StarvationSearch, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_STARVATION_FRACTION,
};

fn runtime_error(context: &str, err: impl std::fmt::Display) -> PyErr {
    PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(format!("{}: {}", context, err))
}

/// Python wrapper for the Rust Simulation
#[pyclass(name = "Simulation")]
pub struct PySimulation {
    inner: RustSimulation,
}

#[pymethods]
impl PySimulation {
    /// Create a simulation from a config dict
    ///
    /// Raises ValueError on missing fields and RuntimeError on invalid
    /// values (even ring size, non-positive rates, ...).
    #[new]
    fn new(config: &Bound<'_, PyDict>) -> PyResult<Self> {
        let rust_config = parse_simulation_config(config)?;
        let inner = RustSimulation::new(rust_config)
            .map_err(|e| runtime_error("Failed to create simulation", e))?;
        Ok(PySimulation { inner })
    }

    /// Dispatch one event; returns None once the horizon is reached
    fn step(&mut self, py: Python<'_>) -> PyResult<Option<Py<PyDict>>> {
        let result = self
            .inner
            .step()
            .map_err(|e| runtime_error("Step failed", e))?;

        result.map(|r| step_result_to_py(py, &r)).transpose()
    }

    /// Run to the horizon and return the statistics dict
    fn run(&mut self, py: Python<'_>) -> PyResult<Py<PyDict>> {
        let output = self
            .inner
            .run()
            .map_err(|e| runtime_error("Simulation failed", e))?;
        output_to_py(py, &output)
    }

    /// Statistics so far, without advancing
    fn output(&self, py: Python<'_>) -> PyResult<Py<PyDict>> {
        output_to_py(py, &self.inner.output())
    }

    fn now(&self) -> f64 {
        self.inner.now()
    }

    fn horizon(&self) -> f64 {
        self.inner.horizon()
    }

    fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }

    fn pending_events(&self) -> usize {
        self.inner.pending_events()
    }

    fn events_processed(&self) -> u64 {
        self.inner.events_processed()
    }

    /// Recorded transitions as a list of dicts
    ///
    /// Empty unless the config set `record_events`.
    fn event_log(&self, py: Python<'_>) -> PyResult<Py<PyList>> {
        events_to_py(py, self.inner.event_log().events())
    }

    /// "waiting" / "eating" per actor, in ring order
    fn actor_states(&self) -> Vec<String> {
        self.inner
            .state()
            .actors()
            .iter()
            .map(|a| a.state().to_string())
            .collect()
    }
}

/// Run randomized simulations until an actor starves
///
/// `spec` may omit `service_rate` and/or `request_rates`; omitted values
/// are sampled per attempt.
#[pyfunction]
#[pyo3(signature = (
    spec,
    threshold = DEFAULT_STARVATION_FRACTION,
    max_attempts = DEFAULT_MAX_ATTEMPTS
))]
pub fn find_starvation(
    py: Python<'_>,
    spec: &Bound<'_, PyDict>,
    threshold: f64,
    max_attempts: usize,
) -> PyResult<Py<PyDict>> {
    let spec = parse_parameter_spec(spec)?;
    let config = SearchConfig {
        threshold_fraction: threshold,
        max_attempts,
    };

    let outcome = StarvationSearch::new(spec, config)
        .and_then(|search| search.run())
        .map_err(|e| runtime_error("Starvation search failed", e))?;

    search_outcome_to_py(py, &outcome)
}
