//! Simulation parameters with YAML schema and validation.
//!
//! Parameters are split by what a change to them costs:
//! - `physics` and `display`: free-running, picked up on the next tick
//! - `reset`: reset policy, picked up on the next frame
//! - `structure`: invalidates the population; a change forces a full reseed
//!
//! A running simulation never mutates its snapshot field by field. A reload
//! produces a new snapshot and [`SimulationParameters::diff`] reports which
//! category changed.

pub mod reload;

use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

use crate::error::{SimError, SimResult};

pub use reload::ReloadWatcher;

/// Full parameter snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SimulationParameters {
    /// Integration parameters.
    #[validate(nested)]
    #[serde(default)]
    pub physics: PhysicsParams,

    /// Population shape.
    #[validate(nested)]
    #[serde(default)]
    pub structure: StructureParams,

    /// Divergence-driven reset policy.
    #[validate(nested)]
    #[serde(default)]
    pub reset: ResetPolicy,

    /// Values only the renderer reads.
    #[validate(nested)]
    #[serde(default)]
    pub display: DisplayParams,
}

impl SimulationParameters {
    /// Load parameters from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - YAML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> SimResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse parameters from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> SimResult<Self> {
        let params: Self = serde_yaml::from_str(yaml)?;
        params.check()?;
        Ok(params)
    }

    /// Render as YAML.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_yaml(&self) -> SimResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Write as YAML to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns error if serialization or the write fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> SimResult<()> {
        std::fs::write(path, self.to_yaml()?)?;
        Ok(())
    }

    /// Create a builder starting from the defaults.
    #[must_use]
    pub fn builder() -> SimulationParametersBuilder {
        SimulationParametersBuilder::default()
    }

    /// Run schema and semantic validation.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn check(&self) -> SimResult<()> {
        self.validate()?;
        self.validate_semantic()
    }

    /// Validate constraints the schema cannot express.
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the first bad field.
    pub fn validate_semantic(&self) -> SimResult<()> {
        let positive = [
            ("physics.fixed_delta_time", self.physics.fixed_delta_time),
            ("structure.segment_length", self.structure.segment_length),
            ("structure.segment_mass", self.structure.segment_mass),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SimError::config(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }

        let non_negative = [
            ("reset.threshold", self.reset.threshold),
            ("reset.fade_seconds", self.reset.fade_seconds),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SimError::config(format!(
                    "{name} must be non-negative and finite, got {value}"
                )));
            }
        }

        if !self.physics.gravity.is_finite() {
            return Err(SimError::config("physics.gravity must be finite"));
        }
        if !self.display.trajectory_alpha_power.is_finite() {
            return Err(SimError::config("display.trajectory_alpha_power must be finite"));
        }

        Ok(())
    }

    /// Classify what changed between `self` and `next`.
    ///
    /// Returns the most expensive category touched.
    #[must_use]
    pub fn diff(&self, next: &Self) -> ParameterChange {
        if self.structure != next.structure {
            ParameterChange::Structural
        } else if self.reset != next.reset {
            ParameterChange::Policy
        } else if self.physics != next.physics || self.display != next.display {
            ParameterChange::Cosmetic
        } else {
            ParameterChange::Unchanged
        }
    }
}

/// Category of a parameter change, ordered by cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParameterChange {
    /// Snapshots are identical.
    Unchanged,
    /// Physics or display values changed; applies on the next tick.
    Cosmetic,
    /// Reset policy changed; applies on the next frame.
    Policy,
    /// Population shape changed; the population must be rebuilt.
    Structural,
}

impl ParameterChange {
    /// True if the population has to be reseeded.
    #[must_use]
    pub const fn requires_reseed(self) -> bool {
        matches!(self, Self::Structural)
    }
}

/// Integration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct PhysicsParams {
    /// Gravitational acceleration.
    #[serde(default = "default_gravity")]
    pub gravity: f64,
    /// Step applied once per rendered frame.
    #[serde(default = "default_fixed_delta_time")]
    pub fixed_delta_time: f64,
}

const fn default_gravity() -> f64 {
    0.981
}

const fn default_fixed_delta_time() -> f64 {
    0.166_666_7
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            gravity: default_gravity(),
            fixed_delta_time: default_fixed_delta_time(),
        }
    }
}

/// Population shape. Any change here forces a reseed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct StructureParams {
    /// Segments per chain.
    #[validate(range(min = 1))]
    #[serde(default = "default_segments_per_chain")]
    pub segments_per_chain: usize,
    /// Chains in the population.
    #[validate(range(min = 1))]
    #[serde(default = "default_chain_count")]
    pub chain_count: usize,
    /// Trajectory capacity per chain.
    #[validate(range(min = 1))]
    #[serde(default = "default_trajectory_points")]
    pub trajectory_points: usize,
    /// Length of every segment.
    #[serde(default = "default_segment_length")]
    pub segment_length: f64,
    /// Mass of every segment.
    #[serde(default = "default_segment_mass")]
    pub segment_mass: f64,
}

const fn default_segments_per_chain() -> usize {
    2
}

const fn default_chain_count() -> usize {
    1000
}

const fn default_trajectory_points() -> usize {
    50
}

const fn default_segment_length() -> f64 {
    150.0
}

const fn default_segment_mass() -> f64 {
    10.0
}

impl Default for StructureParams {
    fn default() -> Self {
        Self {
            segments_per_chain: default_segments_per_chain(),
            chain_count: default_chain_count(),
            trajectory_points: default_trajectory_points(),
            segment_length: default_segment_length(),
            segment_mass: default_segment_mass(),
        }
    }
}

/// Reset policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ResetPolicy {
    /// Divergence above which a reset is armed.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Adjacent chain pairs sampled per divergence estimate.
    #[serde(default = "default_sample_count")]
    pub sample_count: usize,
    /// Seconds between arming and reseeding.
    #[serde(default = "default_fade_seconds")]
    pub fade_seconds: f64,
    /// Whether the fade countdown runs while paused.
    #[serde(default)]
    pub fade_clock: FadeClock,
}

const fn default_threshold() -> f64 {
    10.0
}

const fn default_sample_count() -> usize {
    100
}

const fn default_fade_seconds() -> f64 {
    2.5
}

impl Default for ResetPolicy {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            sample_count: default_sample_count(),
            fade_seconds: default_fade_seconds(),
            fade_clock: FadeClock::default(),
        }
    }
}

/// Clock driving the reset fade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FadeClock {
    /// Wall clock: the fade keeps running while the simulation is paused.
    #[default]
    WallClock,
    /// The fade countdown stops while the simulation is paused.
    FreezeOnPause,
}

/// Renderer-only values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct DisplayParams {
    /// Exponent shaping trajectory fade-out along its length.
    #[serde(default = "default_trajectory_alpha_power")]
    pub trajectory_alpha_power: f64,
    /// HSV saturation of chain colors.
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "default_color_saturation")]
    pub color_saturation: f32,
    /// HSV value of chain colors.
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "default_color_value")]
    pub color_value: f32,
}

const fn default_trajectory_alpha_power() -> f64 {
    2.5
}

const fn default_color_saturation() -> f32 {
    0.5
}

const fn default_color_value() -> f32 {
    1.0
}

impl Default for DisplayParams {
    fn default() -> Self {
        Self {
            trajectory_alpha_power: default_trajectory_alpha_power(),
            color_saturation: default_color_saturation(),
            color_value: default_color_value(),
        }
    }
}

/// Builder for programmatic construction.
#[derive(Debug, Default)]
pub struct SimulationParametersBuilder {
    params: SimulationParameters,
}

impl SimulationParametersBuilder {
    /// Set gravity.
    #[must_use]
    pub const fn gravity(mut self, gravity: f64) -> Self {
        self.params.physics.gravity = gravity;
        self
    }

    /// Set the fixed step.
    #[must_use]
    pub const fn fixed_delta_time(mut self, dt: f64) -> Self {
        self.params.physics.fixed_delta_time = dt;
        self
    }

    /// Set segments per chain.
    #[must_use]
    pub const fn segments_per_chain(mut self, segments: usize) -> Self {
        self.params.structure.segments_per_chain = segments;
        self
    }

    /// Set the number of chains.
    #[must_use]
    pub const fn chain_count(mut self, chains: usize) -> Self {
        self.params.structure.chain_count = chains;
        self
    }

    /// Set trajectory capacity.
    #[must_use]
    pub const fn trajectory_points(mut self, points: usize) -> Self {
        self.params.structure.trajectory_points = points;
        self
    }

    /// Set segment length.
    #[must_use]
    pub const fn segment_length(mut self, length: f64) -> Self {
        self.params.structure.segment_length = length;
        self
    }

    /// Set segment mass.
    #[must_use]
    pub const fn segment_mass(mut self, mass: f64) -> Self {
        self.params.structure.segment_mass = mass;
        self
    }

    /// Set the divergence threshold.
    #[must_use]
    pub const fn reset_threshold(mut self, threshold: f64) -> Self {
        self.params.reset.threshold = threshold;
        self
    }

    /// Set divergence sample count.
    #[must_use]
    pub const fn reset_sample_count(mut self, samples: usize) -> Self {
        self.params.reset.sample_count = samples;
        self
    }

    /// Set the fade duration.
    #[must_use]
    pub const fn reset_fade_seconds(mut self, seconds: f64) -> Self {
        self.params.reset.fade_seconds = seconds;
        self
    }

    /// Set the fade clock.
    #[must_use]
    pub const fn fade_clock(mut self, clock: FadeClock) -> Self {
        self.params.reset.fade_clock = clock;
        self
    }

    /// Set the trajectory alpha exponent.
    #[must_use]
    pub const fn trajectory_alpha_power(mut self, power: f64) -> Self {
        self.params.display.trajectory_alpha_power = power;
        self
    }

    /// Build the snapshot without validating it.
    #[must_use]
    pub fn build(self) -> SimulationParameters {
        self.params
    }

    /// Build and validate.
    ///
    /// # Errors
    ///
    /// Returns error if any constraint is violated.
    pub fn try_build(self) -> SimResult<SimulationParameters> {
        self.params.check()?;
        Ok(self.params)
    }
}
