//! pendular CLI - chaotic pendulum ensemble simulator
//!
//! Headless runner and settings helper. Log verbosity follows `RUST_LOG`.

use std::process::ExitCode;

use pendular::cli::{run_cli, Args};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Logs go to stderr so stdout stays pure telemetry.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    run_cli(Args::parse())
}
