//! dining-sim: run the contention simulator from the command line
//!
//! With both `--mi` and `--lambdas` the simulation runs once. Otherwise
//! missing rates are randomized and runs repeat until an actor starves.
//! The result is printed as JSON on stdout.

mod args;
mod error;
mod logging;

use args::Cli;
use clap::Parser;
use dining_sim_core_rs::orchestrator::{SearchOutcome, StarvationSearch};
use error::CliError;
use std::process::ExitCode;
use tracing::{error, info};

fn main() -> ExitCode {
    logging::init("info");
    let cli = Cli::parse();

    match run(&cli) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "run failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<String, CliError> {
    let spec = cli.parameter_spec()?;
    let search = StarvationSearch::new(spec, cli.search_config())?;

    if search.spec().is_fully_specified() {
        info!(
            mi = search.spec().service_rate,
            lambdas = ?search.spec().request_rates,
            "running with fixed parameters"
        );
    }

    let outcome = search.run()?;
    report(&outcome);

    let json = if cli.pretty {
        serde_json::to_string_pretty(&outcome)?
    } else {
        serde_json::to_string(&outcome)?
    };
    Ok(json)
}

fn report(outcome: &SearchOutcome) {
    for stats in &outcome.output.actors {
        info!(
            actor = stats.index,
            busy_time = stats.busy_time,
            failed_attempts = stats.failed_attempts,
            requests = stats.request_count(),
            "actor summary"
        );
    }
    match outcome.starved_actor {
        Some(actor) => info!(actor, attempts = outcome.attempts, "starvation found"),
        None => info!(attempts = outcome.attempts, "no actor starved"),
    }
}
