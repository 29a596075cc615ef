//! CLI output formatting.

use std::io::Write;

use crate::engine::Telemetry;
use crate::error::SimResult;

/// Version line, with the git hash when the build had one.
#[must_use]
pub fn version_string() -> String {
    let hash = env!("PENDULAR_GIT_HASH");
    if hash.is_empty() {
        format!("pendular {}", env!("PENDULAR_VERSION"))
    } else {
        format!("pendular {} ({hash})", env!("PENDULAR_VERSION"))
    }
}

/// Print version information.
pub fn print_version() {
    println!("{}", version_string());
}

/// Print help message.
pub fn print_help() {
    println!(
        r"pendular - chaotic pendulum ensemble simulator

USAGE:
    pendular <COMMAND> [OPTIONS]

COMMANDS:
    run [settings.yaml]         Run the ensemble headless, printing telemetry
        --frames <N>            Frames to simulate (default: 600)
        --fps <F>               Simulated frame rate (default: 60)
        --every <K>             Print telemetry every K frames (default: 60)
        -w, --watch             Reload the settings file when it changes

    defaults                    Print the default settings as YAML

    help                        Show this help message
    version                     Show version information

EXAMPLES:
    pendular defaults > settings.yaml
    pendular run settings.yaml --frames 3600 --every 30
    pendular run settings.yaml --watch

LOGGING:
    Set RUST_LOG (e.g. RUST_LOG=pendular=debug) to see reset and reload events.
"
    );
}

/// Write one telemetry snapshot as a JSON line.
///
/// # Errors
///
/// Returns error if serialization or the write fails.
pub fn write_telemetry<W: Write>(out: &mut W, telemetry: &Telemetry) -> SimResult<()> {
    serde_json::to_writer(&mut *out, telemetry)?;
    writeln!(out)?;
    Ok(())
}
