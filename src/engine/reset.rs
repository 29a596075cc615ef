//! Divergence-driven reset controller.
//!
//! ```text
//!            manual reset, or divergence > threshold (unless suppressed)
//!   Running ─────────────────────────────────────────────────────────▶ Armed
//!      ▲                                                                  │
//!      └──────────────── now ≥ reset_at: generation += 1, reseed ─────────┘
//! ```
//!
//! While armed, every input is ignored: the fade runs to completion and
//! nothing can re-arm or postpone it. The controller only decides; the
//! caller owns the population and performs the reseed it asks for.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{FadeClock, ResetPolicy};

/// Controller state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ResetState {
    /// Ticking normally, no reset pending.
    Running,
    /// A reset fires at `reset_at`.
    Armed {
        /// Time the reset was armed.
        armed_at: f64,
        /// Time the population is reseeded.
        reset_at: f64,
    },
}

/// Reset-related input for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetInput {
    /// Manual reset pressed this frame.
    pub manual_reset: bool,
    /// Suppress-reset held this frame. Blocks only the divergence trigger.
    pub suppress_reset: bool,
}

/// What the caller must do after [`ResetController::update`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ResetAction {
    /// Nothing pending.
    Idle,
    /// A reset was armed this frame.
    Armed {
        /// Scheduled reseed time.
        reset_at: f64,
    },
    /// A reset is pending; keep fading.
    Waiting,
    /// Reseed now with this generation.
    Reseed {
        /// New generation number.
        generation: u32,
    },
}

/// Running/Armed state machine plus the generation counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResetController {
    state: ResetState,
    generation: u32,
    last_update: Option<f64>,
    last_paused: bool,
}

impl Default for ResetController {
    fn default() -> Self {
        Self::new()
    }
}

impl ResetController {
    /// Create a running controller at generation 0.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: ResetState::Running,
            generation: 0,
            last_update: None,
            last_paused: false,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> ResetState {
        self.state
    }

    /// Resets performed so far.
    #[must_use]
    pub const fn generation(&self) -> u32 {
        self.generation
    }

    /// True while a reset is pending.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        matches!(self.state, ResetState::Armed { .. })
    }

    /// Scheduled reseed time, if armed.
    #[must_use]
    pub const fn reset_at(&self) -> Option<f64> {
        match self.state {
            ResetState::Armed { reset_at, .. } => Some(reset_at),
            ResetState::Running => None,
        }
    }

    /// Advance the state machine to `now`.
    ///
    /// `paused` describes the interval starting at `now`. With
    /// [`FadeClock::FreezeOnPause`], the time since the previous update is
    /// added to the pending deadline when the previous update was paused.
    pub fn update(
        &mut self,
        now: f64,
        divergence: f64,
        input: ResetInput,
        policy: &ResetPolicy,
        paused: bool,
    ) -> ResetAction {
        let elapsed = self.last_update.map_or(0.0, |last| (now - last).max(0.0));
        let was_paused = std::mem::replace(&mut self.last_paused, paused);
        self.last_update = Some(now);

        match self.state {
            ResetState::Armed {
                mut armed_at,
                mut reset_at,
            } => {
                let frozen = policy.fade_clock == FadeClock::FreezeOnPause;
                if frozen && was_paused {
                    armed_at += elapsed;
                    reset_at += elapsed;
                    self.state = ResetState::Armed { armed_at, reset_at };
                }
                if frozen && paused {
                    return ResetAction::Waiting;
                }
                if now >= reset_at {
                    self.generation += 1;
                    self.state = ResetState::Running;
                    debug!(generation = self.generation, "reset fade complete");
                    ResetAction::Reseed {
                        generation: self.generation,
                    }
                } else {
                    ResetAction::Waiting
                }
            }
            ResetState::Running => {
                let diverged = divergence > policy.threshold;
                if input.manual_reset || (diverged && !input.suppress_reset) {
                    let reset_at = now + policy.fade_seconds;
                    self.state = ResetState::Armed {
                        armed_at: now,
                        reset_at,
                    };
                    debug!(
                        manual = input.manual_reset,
                        divergence,
                        reset_at,
                        "reset armed"
                    );
                    ResetAction::Armed { reset_at }
                } else {
                    ResetAction::Idle
                }
            }
        }
    }

    /// Global opacity for the renderer.
    ///
    /// `1.0` while running; while armed, falls linearly from `1.0` at arming
    /// to `0.0` at the reseed time.
    #[must_use]
    pub fn fade_progress(&self, now: f64) -> f64 {
        match self.state {
            ResetState::Running => 1.0,
            ResetState::Armed { armed_at, reset_at } => {
                let span = reset_at - armed_at;
                if span <= 0.0 {
                    return 0.0;
                }
                ((reset_at - now) / span).clamp(0.0, 1.0)
            }
        }
    }

    /// Drop any pending reset and restart the generation count.
    pub fn clear(&mut self) {
        self.state = ResetState::Running;
        self.generation = 0;
    }
}
