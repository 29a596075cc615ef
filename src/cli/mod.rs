//! Command-line front end.
//!
//! Parsing, command handlers and output are split so each can be tested
//! without a process boundary. `main.rs` only installs logging and calls
//! [`run_cli`].

mod args;
mod commands;
mod output;

pub use args::{Args, Command, RunOptions, DEFAULT_EVERY, DEFAULT_FPS, DEFAULT_FRAMES};
pub use commands::{print_defaults, run_cli, run_headless, run_simulation, RunSummary};
pub use output::{print_help, print_version, version_string, write_telemetry};
