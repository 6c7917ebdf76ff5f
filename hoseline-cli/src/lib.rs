//! Command-line interface for hoseline reachability assessments.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod error;
mod reach;

pub use error::CliError;

use reach::{ReachArgs, run_reach};

const ARG_REACH_REQUEST: &str = "request";
const ARG_REACH_OUTPUT: &str = "output";
const ARG_REACH_OSRM_BASE_URL: &str = "osrm-base-url";
const ARG_REACH_ELEVATION_BASE_URL: &str = "elevation-base-url";
const ARG_REACH_MAX_CONCURRENCY: &str = "max-concurrency";
const ARG_REACH_RETRY_ATTEMPTS: &str = "retry-attempts";
const ARG_REACH_ALL_SOURCES: &str = "all-sources";
const ENV_REACH_REQUEST: &str = "HOSELINE_CMDS_REACH_REQUEST_PATH";

/// Run the hoseline CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    init_logging();
    match cli.command {
        Command::Reach(args) => run_reach(args),
    }
}

/// Send `log` and `tracing` records to stderr, filtered by `RUST_LOG`.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A subscriber may already be installed when embedded; keep that one.
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}

#[derive(Debug, Parser)]
#[command(
    name = "hoseline",
    about = "Decide which water sources a fire hose can reach",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Assess fire points and water sources described in a JSON request.
    Reach(ReachArgs),
}

#[cfg(test)]
mod tests;
