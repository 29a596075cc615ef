//! CLI argument parsing.
//!
//! Hand-rolled so that every branch can be driven from tests through
//! [`Args::parse_from`].

use std::path::PathBuf;

/// Frames simulated by `run` when `--frames` is absent (ten seconds at 60 fps).
pub const DEFAULT_FRAMES: u64 = 600;
/// Frame rate of the headless clock when `--fps` is absent.
pub const DEFAULT_FPS: f64 = 60.0;
/// Telemetry interval when `--every` is absent.
pub const DEFAULT_EVERY: u64 = 60;

/// CLI arguments container.
#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    /// The command to execute.
    pub command: Command,
}

/// Options for a headless run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    /// Settings file; `None` runs with the defaults.
    pub settings_path: Option<PathBuf>,
    /// Number of frames to simulate.
    pub frames: u64,
    /// Frame rate of the simulated clock.
    pub fps: f64,
    /// Reload the settings file when it changes.
    pub watch: bool,
    /// Print telemetry every `every` frames.
    pub every: u64,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            settings_path: None,
            frames: DEFAULT_FRAMES,
            fps: DEFAULT_FPS,
            watch: false,
            every: DEFAULT_EVERY,
        }
    }
}

/// Available CLI commands.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Run the ensemble headless and print telemetry.
    Run(RunOptions),
    /// Print the default settings file.
    Defaults,
    /// Show help
    Help,
    /// Show version
    Version,
}

impl Args {
    /// Parse command-line arguments from an iterator.
    ///
    /// The first item is the program name.
    #[must_use]
    pub fn parse_from<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::parse_from_vec(&args)
    }

    /// Parse command-line arguments from the environment.
    #[must_use]
    pub fn parse() -> Self {
        Self::parse_from(std::env::args())
    }

    fn parse_from_vec(args: &[String]) -> Self {
        if args.len() < 2 {
            return Self {
                command: Command::Help,
            };
        }

        let command = match args[1].as_str() {
            "run" => Self::parse_run_command(&args[2..]),
            "defaults" => Command::Defaults,
            "-h" | "--help" | "help" => Command::Help,
            "-V" | "--version" | "version" => Command::Version,
            unknown => {
                eprintln!("Unknown command: {unknown}");
                Command::Help
            }
        };

        Self { command }
    }

    /// Parse the arguments following `run`.
    fn parse_run_command(rest: &[String]) -> Command {
        let mut options = RunOptions::default();

        let mut i = 0;
        while i < rest.len() {
            match rest[i].as_str() {
                "--frames" => {
                    if let Some(n) = rest.get(i + 1).and_then(|v| v.parse().ok()) {
                        options.frames = n;
                    } else {
                        eprintln!("Error: --frames expects a frame count");
                        return Command::Help;
                    }
                    i += 2;
                }
                "--fps" => {
                    if let Some(fps) = rest
                        .get(i + 1)
                        .and_then(|v| v.parse::<f64>().ok())
                        .filter(|fps| fps.is_finite() && *fps > 0.0)
                    {
                        options.fps = fps;
                    } else {
                        eprintln!("Error: --fps expects a positive number");
                        return Command::Help;
                    }
                    i += 2;
                }
                "--every" => {
                    if let Some(k) = rest
                        .get(i + 1)
                        .and_then(|v| v.parse::<u64>().ok())
                        .filter(|k| *k > 0)
                    {
                        options.every = k;
                    } else {
                        eprintln!("Error: --every expects a positive frame count");
                        return Command::Help;
                    }
                    i += 2;
                }
                "-w" | "--watch" => {
                    options.watch = true;
                    i += 1;
                }
                flag if flag.starts_with('-') => {
                    eprintln!("Unknown option: {flag}");
                    return Command::Help;
                }
                path => {
                    if options.settings_path.is_some() {
                        eprintln!("Error: 'run' takes a single settings file");
                        return Command::Help;
                    }
                    options.settings_path = Some(PathBuf::from(path));
                    i += 1;
                }
            }
        }

        if options.watch && options.settings_path.is_none() {
            eprintln!("Error: --watch requires a settings file");
            return Command::Help;
        }

        Command::Run(options)
    }
}
