//! Parameter resolution and randomization.
//!
//! A `ParameterSpec` is what a caller knows before a run: ring size,
//! horizon, and optionally μ and the λ vector. Anything left out is drawn
//! from a `RateSampler` using the caller's `RngManager`, so a seed fully
//! determines the resolved parameters.
//!
//! # Example
//!
//! ```
//! use dining_sim_core_rs::params::{ParameterSpec, RateSampler};
//! use dining_sim_core_rs::RngManager;
//!
//! let spec = ParameterSpec {
//!     num_actors: 5,
//!     horizon: 200.0,
//!     service_rate: Some(0.5),
//!     request_rates: None,
//!     ..Default::default()
//! };
//!
//! let mut rng = RngManager::new(42);
//! let config = spec.resolve(&RateSampler::default(), &mut rng).unwrap();
//!
//! assert_eq!(config.service_rate, 0.5);
//! assert_eq!(config.request_rates.len(), 5);
//! assert!(config.request_rates.iter().all(|&r| (0.01..=1.0).contains(&r)));
//! ```

use crate::orchestrator::engine::{
    validate_horizon, validate_request_rates, validate_ring_size, validate_service_rate,
    ConfigError, SimulationConfig,
};
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};

/// Lower bound of randomized rates
pub const DEFAULT_RATE_MIN: f64 = 0.01;

/// Upper bound of randomized rates
pub const DEFAULT_RATE_MAX: f64 = 1.0;

/// Decimal places kept on randomized rates
pub const DEFAULT_RATE_DECIMALS: i32 = 2;

fn default_num_actors() -> usize {
    5
}

fn default_horizon() -> f64 {
    500.0
}

/// Partially specified run parameters
///
/// When `request_rates` is present its length overrides `num_actors`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    #[serde(default = "default_num_actors")]
    pub num_actors: usize,

    #[serde(default = "default_horizon")]
    pub horizon: f64,

    /// μ; drawn from the sampler when absent
    #[serde(default)]
    pub service_rate: Option<f64>,

    /// λ per actor; each drawn independently when absent
    #[serde(default)]
    pub request_rates: Option<Vec<f64>>,

    #[serde(default)]
    pub rng_seed: u64,

    #[serde(default)]
    pub record_events: bool,
}

impl Default for ParameterSpec {
    fn default() -> Self {
        Self {
            num_actors: default_num_actors(),
            horizon: default_horizon(),
            service_rate: None,
            request_rates: None,
            rng_seed: 0,
            record_events: false,
        }
    }
}

impl ParameterSpec {
    /// Ring size after applying the λ-length override
    pub fn effective_num_actors(&self) -> usize {
        self.request_rates
            .as_ref()
            .map(Vec::len)
            .unwrap_or(self.num_actors)
    }

    /// True when neither μ nor λ needs to be sampled
    pub fn is_fully_specified(&self) -> bool {
        self.service_rate.is_some() && self.request_rates.is_some()
    }

    /// Check the values that are present
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_ring_size(self.effective_num_actors())?;
        validate_horizon(self.horizon)?;
        if let Some(mu) = self.service_rate {
            validate_service_rate(mu)?;
        }
        if let Some(rates) = &self.request_rates {
            validate_request_rates(rates)?;
        }
        Ok(())
    }

    /// Fill the gaps and build a full config seeded with `rng_seed`
    ///
    /// μ is sampled before λ so the draw order is stable.
    pub fn resolve(
        &self,
        sampler: &RateSampler,
        rng: &mut RngManager,
    ) -> Result<SimulationConfig, ConfigError> {
        self.validate()?;

        let num_actors = self.effective_num_actors();
        let service_rate = match self.service_rate {
            Some(mu) => mu,
            None => sampler.sample(rng),
        };
        let request_rates = match &self.request_rates {
            Some(rates) => rates.clone(),
            None => (0..num_actors).map(|_| sampler.sample(rng)).collect(),
        };

        let config = SimulationConfig::new(service_rate, request_rates, self.horizon)
            .with_seed(self.rng_seed)
            .with_event_recording(self.record_events);
        config.validate()?;
        Ok(config)
    }
}

/// Uniform rate sampler with rounding
///
/// Deserialization goes through [`RateSampler::new`], so a sampler with an
/// empty or non-positive range cannot be built from JSON either.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RateSamplerFields")]
pub struct RateSampler {
    min: f64,
    max: f64,
    decimals: i32,
}

/// Unchecked wire form of a `RateSampler`
#[derive(Deserialize)]
struct RateSamplerFields {
    min: f64,
    max: f64,
    #[serde(default = "default_rate_decimals")]
    decimals: i32,
}

fn default_rate_decimals() -> i32 {
    DEFAULT_RATE_DECIMALS
}

impl TryFrom<RateSamplerFields> for RateSampler {
    type Error = ConfigError;

    fn try_from(fields: RateSamplerFields) -> Result<Self, Self::Error> {
        Ok(RateSampler::new(fields.min, fields.max)?.with_decimals(fields.decimals))
    }
}

impl Default for RateSampler {
    fn default() -> Self {
        Self {
            min: DEFAULT_RATE_MIN,
            max: DEFAULT_RATE_MAX,
            decimals: DEFAULT_RATE_DECIMALS,
        }
    }
}

impl RateSampler {
    /// Sampler over [min, max) with the default rounding
    pub fn new(min: f64, max: f64) -> Result<Self, ConfigError> {
        if !(min > 0.0 && min < max && max.is_finite()) {
            return Err(ConfigError::InvalidRandomizationRange { min, max });
        }
        Ok(Self {
            min,
            max,
            decimals: DEFAULT_RATE_DECIMALS,
        })
    }

    pub fn with_decimals(mut self, decimals: i32) -> Self {
        self.decimals = decimals;
        self
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Draw one rate, rounded and never below `min`
    pub fn sample(&self, rng: &mut RngManager) -> f64 {
        let raw = rng.uniform(self.min, self.max);
        let scale = 10f64.powi(self.decimals);
        ((raw * scale).round() / scale).max(self.min)
    }
}
