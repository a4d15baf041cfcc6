//! Deterministic random number generation
//!
//! Uses xorshift64* for fast, reproducible sampling of exponential
//! delays and parameter draws. Every random draw in the simulator is
//! taken from an explicit [`RngManager`] handle; there is no global
//! generator.

mod xorshift;

pub use xorshift::RngManager;
