//! xorshift64* random number generator
//!
//! Same seed → same sequence of draws → same simulation output. Actors
//! never own a generator; the simulation threads one `&mut RngManager`
//! through every handler call so a run can be replayed from its seed.

use serde::{Deserialize, Serialize};

/// Deterministic random number generator using xorshift64*
///
/// # Example
/// ```
/// use dining_sim_core_rs::RngManager;
///
/// let mut rng = RngManager::new(12345);
/// let delay = rng.exponential(2.0);
/// assert!(delay >= 0.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngManager {
    state: u64,
}

impl RngManager {
    /// Create a new RNG with given seed
    ///
    /// A zero seed is replaced by 1 since xorshift has no zero state.
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u64 value
    pub fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Current internal state (for replaying from a mid-run point)
    pub fn get_state(&self) -> u64 {
        self.state
    }

    /// Generate random f64 in range [0.0, 1.0)
    pub fn next_f64(&mut self) -> f64 {
        let value = self.next();
        (value >> 11) as f64 * (1.0 / ((1u64 << 53) as f64))
    }

    /// Sample uniformly from [min, max)
    ///
    /// # Panics
    /// Panics if `min >= max`.
    pub fn uniform(&mut self, min: f64, max: f64) -> f64 {
        assert!(min < max, "min must be less than max");
        min + (max - min) * self.next_f64()
    }

    /// Sample an exponentially distributed delay with the given rate
    ///
    /// Inverse-transform sampling on `1 - u`, which lies in (0, 1], so the
    /// logarithm is always finite and the result is never negative.
    ///
    /// # Panics
    /// Panics if `rate` is not strictly positive and finite. Rates are
    /// validated before a simulation is constructed.
    ///
    /// # Example
    /// ```
    /// use dining_sim_core_rs::RngManager;
    ///
    /// let mut rng = RngManager::new(7);
    /// let n = 10_000;
    /// let mean: f64 = (0..n).map(|_| rng.exponential(4.0)).sum::<f64>() / n as f64;
    /// assert!((mean - 0.25).abs() < 0.02);
    /// ```
    pub fn exponential(&mut self, rate: f64) -> f64 {
        assert!(
            rate > 0.0 && rate.is_finite(),
            "rate must be positive and finite"
        );
        let u = 1.0 - self.next_f64();
        -u.ln() / rate
    }

    /// Draw a fresh seed for a child generator
    ///
    /// Used by the starvation search to give every attempt its own
    /// reproducible stream.
    pub fn derive_seed(&mut self) -> u64 {
        self.next()
    }
}
