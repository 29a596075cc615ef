//! Simulation driver.
//!
//! [`SimulationState`] is the one aggregate the caller owns: parameters,
//! population, reset controller, counters. A host (window loop, headless
//! runner, test) calls [`SimulationState::frame`] once per rendered frame
//! with the current time and that frame's input, then reads back whatever
//! it needs to draw.
//!
//! Each frame advances the physics by exactly one `fixed_delta_time` step
//! (unless paused), independent of how much wall time the frame took.

pub mod anomaly;
pub mod clock;
pub mod reset;
pub mod state;

use serde::{Deserialize, Serialize};
use tracing::info;

pub use anomaly::{AnomalyMonitor, AnomalyReport};
pub use clock::{Clock, FixedRateClock, FrameClock, MonotonicClock};
pub use reset::{ResetAction, ResetController, ResetInput, ResetState};
pub use state::Vec2;

use crate::config::{ParameterChange, SimulationParameters};
use crate::error::SimResult;
use crate::population::Population;

/// Input events for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameInput {
    /// Manual reset pressed.
    pub manual_reset: bool,
    /// Suppress-reset held.
    pub suppress_reset: bool,
    /// Pause toggled.
    pub toggle_pause: bool,
}

impl FrameInput {
    const fn reset_input(self) -> ResetInput {
        ResetInput {
            manual_reset: self.manual_reset,
            suppress_reset: self.suppress_reset,
        }
    }
}

/// What happened during one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    /// Divergence measured at the start of the frame.
    pub divergence: f64,
    /// Reset controller decision.
    pub reset: ResetAction,
    /// Whether the integrator ran.
    pub ticked: bool,
}

/// Read-only snapshot for an info overlay or log line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    /// Last divergence estimate.
    pub divergence: f64,
    /// Divergence that arms a reset.
    pub threshold: f64,
    /// Resets since start or last structural change.
    pub resets: u32,
    /// Renderer opacity.
    pub fade_progress: f64,
    /// Whether a reset is pending.
    pub reset_armed: bool,
    /// Whether ticking is paused.
    pub paused: bool,
    /// Frames processed.
    pub frames: u64,
    /// Integrator ticks since the last reseed.
    pub ticks: u64,
    /// Chains whose state went non-finite.
    pub non_finite_chains: usize,
    /// Parameters in effect.
    pub parameters: SimulationParameters,
}

/// Everything one simulation owns.
#[derive(Debug, Clone)]
pub struct SimulationState {
    params: SimulationParameters,
    population: Population,
    controller: ResetController,
    anomalies: AnomalyMonitor,
    clock: FrameClock,
    divergence: f64,
    paused: bool,
}

impl SimulationState {
    /// Seed a population from `params`. Starts unpaused.
    ///
    /// # Errors
    ///
    /// Returns error if the parameters are invalid or seeding fails.
    pub fn new(params: SimulationParameters) -> SimResult<Self> {
        params.check()?;
        let population = Population::seed(&params.structure, 0)?;
        Ok(Self {
            params,
            population,
            controller: ResetController::new(),
            anomalies: AnomalyMonitor::new(),
            clock: FrameClock::new(),
            divergence: 0.0,
            paused: false,
        })
    }

    /// Wrap an explicitly built population.
    ///
    /// `params.structure` is not compared against the population; it only
    /// shapes the next reseed.
    ///
    /// # Errors
    ///
    /// Returns error if the parameters are invalid.
    pub fn with_population(
        params: SimulationParameters,
        population: Population,
    ) -> SimResult<Self> {
        params.check()?;
        Ok(Self {
            params,
            population,
            controller: ResetController::new(),
            anomalies: AnomalyMonitor::new(),
            clock: FrameClock::new(),
            divergence: 0.0,
            paused: false,
        })
    }

    /// Parameters in effect.
    #[must_use]
    pub const fn params(&self) -> &SimulationParameters {
        &self.params
    }

    /// Current population.
    #[must_use]
    pub const fn population(&self) -> &Population {
        &self.population
    }

    /// Reset controller.
    #[must_use]
    pub const fn controller(&self) -> &ResetController {
        &self.controller
    }

    /// Frame and tick counters.
    #[must_use]
    pub const fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Last divergence estimate.
    #[must_use]
    pub const fn divergence(&self) -> f64 {
        self.divergence
    }

    /// Whether ticking is paused.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pause or resume ticking.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Renderer opacity at `now`.
    #[must_use]
    pub fn fade_progress(&self, now: f64) -> f64 {
        self.controller.fade_progress(now)
    }

    /// Run one frame at time `now`.
    ///
    /// Order: pause toggle, divergence estimate, reset decision (reseeding
    /// when a pending reset comes due), then one integrator tick unless paused.
    ///
    /// # Errors
    ///
    /// Returns error if a due reseed fails to build the population.
    pub fn frame(&mut self, now: f64, input: &FrameInput) -> SimResult<FrameReport> {
        self.clock.frame();
        if input.toggle_pause {
            self.paused = !self.paused;
        }

        self.divergence = self.population.divergence(self.params.reset.sample_count);
        let reset = self.controller.update(
            now,
            self.divergence,
            input.reset_input(),
            &self.params.reset,
            self.paused,
        );
        if let ResetAction::Reseed { generation } = reset {
            self.reseed(generation)?;
        }

        let ticked = !self.paused;
        if ticked {
            self.tick();
        }

        Ok(FrameReport {
            divergence: self.divergence,
            reset,
            ticked,
        })
    }

    /// Advance every chain by one fixed step, ignoring pause.
    pub fn tick(&mut self) {
        let dt = self.params.physics.fixed_delta_time;
        self.population.step(self.params.physics.gravity, dt);
        self.clock.tick(dt);
        self.anomalies.scan(&self.population);
    }

    /// Swap in a new parameter snapshot.
    ///
    /// A structural change rebuilds the population at generation 0 and drops
    /// any pending reset; other changes take effect on the next frame.
    ///
    /// # Errors
    ///
    /// Returns error if the new parameters are invalid or reseeding fails.
    /// On error the previous state is kept.
    pub fn reconfigure(&mut self, params: SimulationParameters) -> SimResult<ParameterChange> {
        params.check()?;
        let change = self.params.diff(&params);
        if change.requires_reseed() {
            let population = Population::seed(&params.structure, 0)?;
            info!(
                chains = params.structure.chain_count,
                segments = params.structure.segments_per_chain,
                "structural parameters changed; population rebuilt"
            );
            self.population = population;
            self.controller.clear();
            self.anomalies.rearm(0);
            self.clock.restart_ticks();
            self.divergence = 0.0;
        }
        self.params = params;
        Ok(change)
    }

    /// Snapshot for display at time `now`.
    #[must_use]
    pub fn telemetry(&self, now: f64) -> Telemetry {
        Telemetry {
            divergence: self.divergence,
            threshold: self.params.reset.threshold,
            resets: self.controller.generation(),
            fade_progress: self.controller.fade_progress(now),
            reset_armed: self.controller.is_armed(),
            paused: self.paused,
            frames: self.clock.frames(),
            ticks: self.clock.ticks(),
            non_finite_chains: self.anomalies.last().non_finite_chains,
            parameters: self.params.clone(),
        }
    }

    fn reseed(&mut self, generation: u32) -> SimResult<()> {
        self.population = Population::seed(&self.params.structure, generation)?;
        self.anomalies.rearm(generation);
        self.clock.restart_ticks();
        Ok(())
    }
}
