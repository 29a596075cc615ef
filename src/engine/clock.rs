//! Time sources.
//!
//! Two different notions of time drive a frame:
//! - [`FrameClock`] counts frames and integrator ticks and accumulates
//!   simulated time. It only moves when a tick actually happens.
//! - [`Clock`] is the external monotonic time the reset fade is measured
//!   against, in seconds. It moves whether or not the simulation is paused.

use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Source of monotonic time in seconds.
pub trait Clock {
    /// Seconds since an arbitrary fixed origin. Never decreases.
    fn now(&self) -> f64;
}

/// Wall clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Start counting from now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Clock that advances by a fixed period per frame.
///
/// Used for headless runs and tests, where frames are not paced by a display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedRateClock {
    period: f64,
    frame: u64,
}

impl FixedRateClock {
    /// Create a clock running at `frames_per_second`.
    ///
    /// Non-positive or non-finite rates fall back to 60 fps.
    #[must_use]
    pub fn new(frames_per_second: f64) -> Self {
        let fps = if frames_per_second.is_finite() && frames_per_second > 0.0 {
            frames_per_second
        } else {
            60.0
        };
        Self {
            period: fps.recip(),
            frame: 0,
        }
    }

    /// Seconds per frame.
    #[must_use]
    pub const fn period(&self) -> f64 {
        self.period
    }

    /// Move to the next frame.
    pub fn advance(&mut self) {
        self.frame += 1;
    }
}

impl Clock for FixedRateClock {
    fn now(&self) -> f64 {
        self.frame as f64 * self.period
    }
}

/// Frame and tick counters for one simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameClock {
    frames: u64,
    ticks: u64,
    simulated: f64,
}

impl FrameClock {
    /// Create a clock at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            frames: 0,
            ticks: 0,
            simulated: 0.0,
        }
    }

    /// Count one rendered frame.
    pub fn frame(&mut self) {
        self.frames += 1;
    }

    /// Count one integrator tick of `dt`.
    pub fn tick(&mut self, dt: f64) {
        self.ticks += 1;
        self.simulated += dt;
    }

    /// Frames seen, paused or not.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Integrator ticks taken since the last reseed.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Simulated time since the last reseed.
    #[must_use]
    pub const fn simulated_time(&self) -> f64 {
        self.simulated
    }

    /// Restart tick and simulated-time counters. Frames keep counting.
    pub fn restart_ticks(&mut self) {
        self.ticks = 0;
        self.simulated = 0.0;
    }
}
