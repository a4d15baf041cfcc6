//! Python bindings (PyO3)
//!
//! Exposes the simulation to Python so an external plotting or analysis
//! layer can consume run statistics as plain dicts and lists.

pub mod simulation;
pub mod types;
