//! Command-line arguments
//!
//! Flags override values loaded from `--config`; anything still missing
//! falls back to `ParameterSpec` defaults, and a missing μ or λ is
//! randomized by the starvation search.

use crate::error::CliError;
use clap::Parser;
use dining_sim_core_rs::orchestrator::{
    SearchConfig, DEFAULT_MAX_ATTEMPTS, DEFAULT_STARVATION_FRACTION,
};
use dining_sim_core_rs::ParameterSpec;
use std::path::{Path, PathBuf};

/// Dining philosophers contention simulator
#[derive(Parser, Debug, Clone)]
#[command(name = "dining-sim", author, version, about, long_about = None)]
pub struct Cli {
    /// Number of actors (odd, at least 3); ignored when --lambdas is given
    #[arg(short = 'n', long = "actors")]
    pub actors: Option<usize>,

    /// Simulated time horizon
    #[arg(short = 'T', long = "horizon")]
    pub horizon: Option<f64>,

    /// Service rate μ shared by all actors
    #[arg(long = "mi")]
    pub mi: Option<f64>,

    /// Request rate λ for each actor
    #[arg(long = "lambdas", num_args = 1..)]
    pub lambdas: Option<Vec<f64>>,

    /// Seed for the random source
    #[arg(long)]
    pub seed: Option<u64>,

    /// Busy-time fraction of the horizon that counts as starvation
    #[arg(long, default_value_t = DEFAULT_STARVATION_FRACTION)]
    pub threshold: f64,

    /// Give up the search after this many runs
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: usize,

    /// JSON file with a parameter spec
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Include the final run's event log in the JSON result
    #[arg(long, default_value_t = false)]
    pub record_events: bool,

    /// Pretty-print the JSON result
    #[arg(long, default_value_t = false)]
    pub pretty: bool,
}

impl Cli {
    /// Merge the optional config file with command-line overrides
    pub fn parameter_spec(&self) -> Result<ParameterSpec, CliError> {
        let mut spec = match &self.config {
            Some(path) => load_spec(path)?,
            None => ParameterSpec::default(),
        };
        self.apply_overrides(&mut spec);
        Ok(spec)
    }

    fn apply_overrides(&self, spec: &mut ParameterSpec) {
        if let Some(n) = self.actors {
            spec.num_actors = n;
        }
        if let Some(horizon) = self.horizon {
            spec.horizon = horizon;
        }
        if let Some(mi) = self.mi {
            spec.service_rate = Some(mi);
        }
        if let Some(lambdas) = &self.lambdas {
            spec.request_rates = Some(lambdas.clone());
        }
        if let Some(seed) = self.seed {
            spec.rng_seed = seed;
        }
        if self.record_events {
            spec.record_events = true;
        }
    }

    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            threshold_fraction: self.threshold,
            max_attempts: self.max_attempts,
        }
    }
}

fn load_spec(path: &Path) -> Result<ParameterSpec, CliError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CliError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["dining-sim"]).unwrap();
        let spec = cli.parameter_spec().unwrap();

        assert_eq!(spec, ParameterSpec::default());
        assert_eq!(cli.search_config(), SearchConfig::default());
        assert!(!cli.pretty);
    }

    #[test]
    fn test_short_flags_and_lambdas() {
        let cli = Cli::try_parse_from([
            "dining-sim", "-n", "7", "-T", "100", "--mi", "0.5", "--lambdas", "0.1", "0.2", "0.3",
            "--seed", "9",
        ])
        .unwrap();
        let spec = cli.parameter_spec().unwrap();

        assert_eq!(spec.num_actors, 7);
        assert_eq!(spec.effective_num_actors(), 3);
        assert_eq!(spec.horizon, 100.0);
        assert_eq!(spec.service_rate, Some(0.5));
        assert_eq!(spec.request_rates, Some(vec![0.1, 0.2, 0.3]));
        assert_eq!(spec.rng_seed, 9);
        assert!(spec.is_fully_specified());
    }

    #[test]
    fn test_search_flags() {
        let cli =
            Cli::try_parse_from(["dining-sim", "--threshold", "0.05", "--max-attempts", "12"])
                .unwrap();
        let search = cli.search_config();

        assert_eq!(search.threshold_fraction, 0.05);
        assert_eq!(search.max_attempts, 12);
    }

    #[test]
    fn test_config_file_with_overrides() {
        let path =
            std::env::temp_dir().join(format!("dining-sim-args-{}.json", std::process::id()));
        let body = r#"{"num_actors": 9, "horizon": 50.0, "service_rate": 0.3}"#;
        std::fs::write(&path, body).unwrap();

        let cli = Cli::try_parse_from([
            "dining-sim",
            "--config",
            path.to_str().unwrap(),
            "-T",
            "75",
        ])
        .unwrap();
        let spec = cli.parameter_spec().unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(spec.num_actors, 9);
        assert_eq!(spec.horizon, 75.0);
        assert_eq!(spec.service_rate, Some(0.3));
        assert_eq!(spec.request_rates, None);
    }

    #[test]
    fn test_missing_config_file() {
        let cli =
            Cli::try_parse_from(["dining-sim", "--config", "/nonexistent/spec.json"]).unwrap();
        assert!(matches!(
            cli.parameter_spec(),
            Err(CliError::ConfigRead { .. })
        ));
    }
}
