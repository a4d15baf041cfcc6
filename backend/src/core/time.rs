//! Time management for the simulation
//!
//! The simulation runs in continuous time. The clock only moves forward:
//! it is set to the timestamp of every popped event, and a timestamp
//! earlier than the current reading is rejected.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when the clock would move backwards
#[derive(Debug, Error, PartialEq)]
pub enum ClockError {
    #[error("Simulated time moved backwards: {from} -> {to}")]
    Regression { from: f64, to: f64 },

    #[error("Simulated time must be finite and non-negative, got {0}")]
    InvalidTime(f64),
}

/// Continuous simulation clock with a fixed horizon
///
/// # Example
/// ```
/// use dining_sim_core_rs::SimClock;
///
/// let mut clock = SimClock::new(10.0);
/// assert_eq!(clock.now(), 0.0);
///
/// clock.advance_to(4.5).unwrap();
/// assert_eq!(clock.now(), 4.5);
/// assert!(!clock.horizon_reached());
///
/// clock.advance_to(10.0).unwrap();
/// assert!(clock.horizon_reached());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimClock {
    now: f64,
    horizon: f64,
}

impl SimClock {
    /// Create a clock at time zero that stops at `horizon`
    ///
    /// # Panics
    /// Panics if `horizon` is not strictly positive and finite.
    pub fn new(horizon: f64) -> Self {
        assert!(
            horizon > 0.0 && horizon.is_finite(),
            "horizon must be positive"
        );
        Self { now: 0.0, horizon }
    }

    /// Move the clock to `time`
    pub fn advance_to(&mut self, time: f64) -> Result<(), ClockError> {
        if !time.is_finite() || time < 0.0 {
            return Err(ClockError::InvalidTime(time));
        }
        if time < self.now {
            return Err(ClockError::Regression {
                from: self.now,
                to: time,
            });
        }
        self.now = time;
        Ok(())
    }

    /// Current simulated time
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Simulated time at which the run stops
    pub fn horizon(&self) -> f64 {
        self.horizon
    }

    /// True once the clock has reached or passed the horizon
    ///
    /// The boundary is inclusive: a clock reading exactly `horizon` ends
    /// the run.
    pub fn horizon_reached(&self) -> bool {
        self.now >= self.horizon
    }
}
