//! CLI command handlers.

use std::io::Write;
use std::process::ExitCode;

use serde::Serialize;
use tracing::{info, warn};

use super::output::{print_help, print_version, write_telemetry};
use super::{Args, Command, RunOptions};
use crate::config::{ReloadWatcher, SimulationParameters};
use crate::engine::{Clock, FixedRateClock, FrameInput, ResetAction, SimulationState};
use crate::error::SimResult;

/// Main CLI entry point.
#[must_use]
pub fn run_cli(args: Args) -> ExitCode {
    match args.command {
        Command::Run(options) => run_simulation(&options),
        Command::Defaults => print_defaults(),
        Command::Help => {
            print_help();
            ExitCode::SUCCESS
        }
        Command::Version => {
            print_version();
            ExitCode::SUCCESS
        }
    }
}

/// Totals for a finished headless run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunSummary {
    /// Frames simulated.
    pub frames: u64,
    /// Reseeds performed.
    pub resets: u64,
    /// Settings reloads applied.
    pub reloads: u64,
    /// Divergence at the last frame.
    pub final_divergence: f64,
}

/// Run headless, writing telemetry to stdout.
#[must_use]
pub fn run_simulation(options: &RunOptions) -> ExitCode {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match run_headless(options, &mut out) {
        Ok(summary) => {
            info!(
                frames = summary.frames,
                resets = summary.resets,
                reloads = summary.reloads,
                "run complete"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Simulate `options.frames` frames on a fixed-rate clock.
///
/// Telemetry is written as one JSON object per line every `options.every`
/// frames, starting with the first frame. With `options.watch`, the
/// settings file is polled before each frame and valid changes are applied
/// through [`SimulationState::reconfigure`].
///
/// # Errors
///
/// Returns error if the initial settings are unreadable or invalid, or if
/// writing telemetry fails.
pub fn run_headless<W: Write>(options: &RunOptions, out: &mut W) -> SimResult<RunSummary> {
    let params = match &options.settings_path {
        Some(path) => SimulationParameters::load(path)?,
        None => SimulationParameters::default(),
    };
    let mut state = SimulationState::new(params)?;
    let mut clock = FixedRateClock::new(options.fps);
    let mut watcher = options
        .settings_path
        .as_ref()
        .filter(|_| options.watch)
        .map(ReloadWatcher::new);
    let every = options.every.max(1);

    let mut summary = RunSummary {
        frames: 0,
        resets: 0,
        reloads: 0,
        final_divergence: 0.0,
    };

    for frame in 0..options.frames {
        if let Some(params) = watcher.as_mut().and_then(ReloadWatcher::poll) {
            match state.reconfigure(params) {
                Ok(change) => {
                    summary.reloads += 1;
                    info!(?change, "settings reloaded");
                }
                Err(e) => warn!(%e, "rejected reloaded settings"),
            }
        }

        let now = clock.now();
        let report = state.frame(now, &FrameInput::default())?;
        if matches!(report.reset, ResetAction::Reseed { .. }) {
            summary.resets += 1;
        }
        if frame % every == 0 {
            write_telemetry(out, &state.telemetry(now))?;
        }

        summary.frames += 1;
        summary.final_divergence = report.divergence;
        clock.advance();
    }

    out.flush()?;
    Ok(summary)
}

/// Print the default settings as YAML.
#[must_use]
pub fn print_defaults() -> ExitCode {
    match SimulationParameters::default().to_yaml() {
        Ok(yaml) => {
            print!("{yaml}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
