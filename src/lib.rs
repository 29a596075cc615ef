//! # pendular
//!
//! Ensemble simulator for chaotic multi-segment pendulum chains.
//!
//! A population of near-identical chains is seeded with angles a hair
//! apart and integrated in lockstep. Once their tips drift apart past a
//! threshold, the population fades out and is reseeded with a slightly
//! shifted starting configuration, producing an endless sequence of
//! divergence episodes.
//!
//! - [`chain`]: segments, the integrator, circular tip trajectories
//! - [`population`]: deterministic seeding and the divergence estimate
//! - [`engine`]: reset controller, clocks, the per-frame driver
//! - [`config`]: YAML parameters, validation, hot reload
//!
//! ## Example
//!
//! ```rust
//! use pendular::prelude::*;
//!
//! let params = SimulationParameters::builder()
//!     .chain_count(16)
//!     .segments_per_chain(2)
//!     .build();
//! let mut state = SimulationState::new(params).unwrap();
//! let report = state.frame(0.0, &FrameInput::default()).unwrap();
//! assert!(report.ticked);
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::suboptimal_flops,  // Closed-form equations are kept as written
    clippy::imprecise_flops,
    clippy::many_single_char_names,
    clippy::missing_const_for_fn,
    clippy::needless_range_loop,   // Pairwise index loops read closer to the equations
)]

pub mod chain;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod population;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::chain::{Chain, Segment, Trajectory};
    pub use crate::config::{
        FadeClock, ParameterChange, ReloadWatcher, SimulationParameters,
        SimulationParametersBuilder,
    };
    pub use crate::engine::{
        Clock, FixedRateClock, FrameInput, FrameReport, MonotonicClock, ResetAction,
        SimulationState, Telemetry, Vec2,
    };
    pub use crate::error::{SimError, SimResult};
    pub use crate::population::Population;
}

/// Re-export for public API
pub use error::{SimError, SimResult};
