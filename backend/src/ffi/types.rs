//! Type conversion utilities for FFI boundary
//!
//! Converts between Python dicts and the simulator's config and output
//! types.

use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::models::event::Event;
use crate::orchestrator::{SearchOutcome, SimulationConfig, SimulationOutput, StepResult};
use crate::params::ParameterSpec;

// ========================================================================
// PyDict Extraction Helpers
// ========================================================================

/// Extract a required field from a Python dict with clear error messages.
///
/// # Errors
/// Returns PyValueError if the field is missing or has the wrong type.
fn extract_required<'py, T>(dict: &Bound<'py, PyDict>, key: &str) -> PyResult<T>
where
    T: FromPyObject<'py>,
{
    dict.get_item(key)?
        .ok_or_else(|| {
            PyErr::new::<pyo3::exceptions::PyValueError, _>(format!(
                "Missing required field '{}'",
                key
            ))
        })?
        .extract()
}

/// Extract an optional field; `None` when absent or explicitly None.
fn extract_optional<'py, T>(dict: &Bound<'py, PyDict>, key: &str) -> PyResult<Option<T>>
where
    T: FromPyObject<'py>,
{
    match dict.get_item(key)? {
        Some(value) if !value.is_none() => Ok(Some(value.extract()?)),
        _ => Ok(None),
    }
}

/// Extract a field with a default value if missing.
fn extract_with_default<'py, T>(dict: &Bound<'py, PyDict>, key: &str, default: T) -> PyResult<T>
where
    T: FromPyObject<'py>,
{
    Ok(extract_optional(dict, key)?.unwrap_or(default))
}

// ========================================================================
// Config Parsing
// ========================================================================

/// Build a `SimulationConfig` from a Python dict
///
/// Required: `service_rate`, `request_rates`, `horizon`.
/// Optional: `num_actors` (defaults to the number of rates), `rng_seed`,
/// `record_events`, `verify_invariants`.
pub fn parse_simulation_config(dict: &Bound<'_, PyDict>) -> PyResult<SimulationConfig> {
    let service_rate: f64 = extract_required(dict, "service_rate")?;
    let request_rates: Vec<f64> = extract_required(dict, "request_rates")?;
    let horizon: f64 = extract_required(dict, "horizon")?;

    let mut config = SimulationConfig::new(service_rate, request_rates, horizon)
        .with_seed(extract_with_default(dict, "rng_seed", 0u64)?)
        .with_event_recording(extract_with_default(dict, "record_events", false)?)
        .with_invariant_checks(extract_with_default(dict, "verify_invariants", true)?);

    if let Some(num_actors) = extract_optional::<usize>(dict, "num_actors")? {
        config.num_actors = num_actors;
    }

    Ok(config)
}

/// Build a `ParameterSpec` from a Python dict; every field is optional
pub fn parse_parameter_spec(dict: &Bound<'_, PyDict>) -> PyResult<ParameterSpec> {
    let defaults = ParameterSpec::default();

    Ok(ParameterSpec {
        num_actors: extract_with_default(dict, "num_actors", defaults.num_actors)?,
        horizon: extract_with_default(dict, "horizon", defaults.horizon)?,
        service_rate: extract_optional(dict, "service_rate")?,
        request_rates: extract_optional(dict, "request_rates")?,
        rng_seed: extract_with_default(dict, "rng_seed", defaults.rng_seed)?,
        record_events: extract_with_default(dict, "record_events", defaults.record_events)?,
    })
}

// ========================================================================
// Output Conversion
// ========================================================================

/// Convert a run snapshot to a Python dict
///
/// Layout mirrors the JSON form: `params`, `actors` (list of dicts),
/// `final_time`, `events_processed`, `config_hash`.
pub fn output_to_py(py: Python<'_>, output: &SimulationOutput) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new(py);

    let params = PyDict::new(py);
    params.set_item("num_actors", output.params.num_actors)?;
    params.set_item("service_rate", output.params.service_rate)?;
    params.set_item("request_rates", output.params.request_rates.clone())?;
    params.set_item("horizon", output.params.horizon)?;
    params.set_item("rng_seed", output.params.rng_seed)?;
    dict.set_item("params", params)?;

    let actors = PyList::empty(py);
    for stats in &output.actors {
        let actor = PyDict::new(py);
        actor.set_item("index", stats.index)?;
        actor.set_item("request_rate", stats.request_rate)?;
        actor.set_item("busy_time", stats.busy_time)?;
        actor.set_item("failed_attempts", stats.failed_attempts)?;
        actor.set_item("finish_count", stats.finish_count)?;
        actor.set_item("request_log", stats.request_log.clone())?;
        actors.append(actor)?;
    }
    dict.set_item("actors", actors)?;

    dict.set_item("final_time", output.final_time)?;
    dict.set_item("events_processed", output.events_processed)?;
    dict.set_item("config_hash", output.config_hash.as_str())?;

    Ok(dict.unbind())
}

/// Convert a single dispatch result to a Python dict
pub fn step_result_to_py(py: Python<'_>, result: &StepResult) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("actor", result.event.actor)?;
    dict.set_item("time", result.event.time)?;
    dict.set_item("kind", result.event.kind.to_string())?;
    dict.set_item("next_kind", result.next.kind.to_string())?;
    dict.set_item("next_time", result.next.time)?;
    dict.set_item("horizon_reached", result.horizon_reached)?;
    Ok(dict.unbind())
}

/// Convert a logged transition to a Python dict
///
/// Every dict carries `type`, `time` and `actor`, plus the fields of its
/// variant.
pub fn event_to_py(py: Python<'_>, event: &Event) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("type", event.event_type())?;
    dict.set_item("time", event.time())?;
    dict.set_item("actor", event.actor())?;

    match event {
        Event::RequestGranted { finish_at, .. } => {
            dict.set_item("finish_at", *finish_at)?;
        }
        Event::RequestDenied {
            retry_at,
            failed_attempts,
            ..
        } => {
            dict.set_item("retry_at", *retry_at)?;
            dict.set_item("failed_attempts", *failed_attempts)?;
        }
        Event::Finished {
            started_at,
            next_request_at,
            ..
        } => {
            dict.set_item("started_at", *started_at)?;
            dict.set_item("next_request_at", *next_request_at)?;
        }
    }

    Ok(dict.unbind())
}

/// Convert a slice of logged transitions to a Python list of dicts
pub fn events_to_py(py: Python<'_>, events: &[Event]) -> PyResult<Py<PyList>> {
    let list = PyList::empty(py);
    for event in events {
        list.append(event_to_py(py, event)?)?;
    }
    Ok(list.unbind())
}

/// Convert a starvation search outcome to a Python dict
pub fn search_outcome_to_py(py: Python<'_>, outcome: &SearchOutcome) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("output", output_to_py(py, &outcome.output)?)?;
    dict.set_item("starved_actor", outcome.starved_actor)?;
    dict.set_item("attempts", outcome.attempts)?;
    if let Some(events) = &outcome.events {
        dict.set_item("events", events_to_py(py, events)?)?;
    }
    Ok(dict.unbind())
}
