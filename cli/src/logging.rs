//! Diagnostic logging setup
//!
//! Logs go to stderr so stdout carries only the JSON result. Verbosity is
//! taken from `RUST_LOG`, falling back to `info`.

use tracing_subscriber::{fmt, EnvFilter};

pub fn init(default_level: &str) {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init()
}
