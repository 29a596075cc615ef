//! Pendulum chains.
//!
//! A [`Chain`] is an ordered run of [`Segment`]s hanging from a shared anchor
//! at the origin, plus the [`Trajectory`] its last segment's tip traces out.
//! Segment count and trajectory capacity are fixed for the chain's lifetime;
//! changing either means building a new population.

pub mod integrator;
pub mod trajectory;

use serde::{Deserialize, Serialize};

use crate::engine::state::Vec2;
use crate::error::{SimError, SimResult};

pub use trajectory::{TrailSegment, Trajectory};

/// One rigid arm of a chain.
///
/// `position` is the arm's tip relative to the chain anchor. It is derived
/// from `angle` and the preceding segment on every tick and cannot be set
/// from outside this module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    length: f64,
    mass: f64,
    angle: f64,
    angular_velocity: f64,
    angular_acceleration: f64,
    position: Vec2,
    velocity: Vec2,
}

impl Segment {
    fn new(length: f64, mass: f64, angle: f64) -> Self {
        Self {
            length,
            mass,
            angle,
            angular_velocity: 0.0,
            angular_acceleration: 0.0,
            position: Vec2::zero(),
            velocity: Vec2::zero(),
        }
    }

    /// Arm length.
    #[must_use]
    pub const fn length(&self) -> f64 {
        self.length
    }

    /// Bob mass.
    #[must_use]
    pub const fn mass(&self) -> f64 {
        self.mass
    }

    /// Angle from vertical in radians (`0` hangs down, `π` points up).
    #[must_use]
    pub const fn angle(&self) -> f64 {
        self.angle
    }

    /// Angular velocity (rad per time unit).
    #[must_use]
    pub const fn angular_velocity(&self) -> f64 {
        self.angular_velocity
    }

    /// Angular acceleration computed on the last tick.
    #[must_use]
    pub const fn angular_acceleration(&self) -> f64 {
        self.angular_acceleration
    }

    /// Tip position relative to the chain anchor.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Linear tip velocity. Carried in the state but never integrated.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Offset from this segment's pivot to its tip.
    #[must_use]
    pub fn offset(&self) -> Vec2 {
        Vec2::from_polar(self.length, self.angle)
    }

    /// True when no dynamic quantity has blown up.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.angle.is_finite()
            && self.angular_velocity.is_finite()
            && self.angular_acceleration.is_finite()
            && self.position.is_finite()
    }
}

/// A multi-segment pendulum and its tip trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chain {
    segments: Vec<Segment>,
    trajectory: Trajectory,
}

impl Chain {
    /// Build a chain of `segment_count` segments.
    ///
    /// All inputs are checked before anything is allocated, so a failure
    /// never leaves a half-built chain behind.
    ///
    /// # Errors
    ///
    /// - [`SimError::EmptyChain`] if `segment_count` is zero
    /// - [`SimError::SegmentMismatch`] if any per-segment slice has the wrong length
    /// - [`SimError::EmptyTrajectory`] if `trajectory_points` is zero
    pub fn new(
        segment_count: usize,
        lengths: &[f64],
        masses: &[f64],
        initial_angles: &[f64],
        trajectory_points: usize,
    ) -> SimResult<Self> {
        if segment_count == 0 {
            return Err(SimError::EmptyChain);
        }
        for (field, actual) in [
            ("lengths", lengths.len()),
            ("masses", masses.len()),
            ("initial_angles", initial_angles.len()),
        ] {
            if actual != segment_count {
                return Err(SimError::segment_mismatch(field, segment_count, actual));
            }
        }
        let trajectory = Trajectory::new(trajectory_points)?;

        let segments = lengths
            .iter()
            .zip(masses)
            .zip(initial_angles)
            .map(|((&length, &mass), &angle)| Segment::new(length, mass, angle))
            .collect();

        let mut chain = Self {
            segments,
            trajectory,
        };
        chain.recompute_positions();
        Ok(chain)
    }

    /// Segments from the anchor outward.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments (at least 1).
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Tip of the last segment.
    #[must_use]
    pub fn tip(&self) -> Vec2 {
        self.segments
            .last()
            .map_or_else(Vec2::zero, |segment| segment.position)
    }

    /// Tip history.
    #[must_use]
    pub const fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    /// Rod endpoints `(pivot, tip)` for each segment, for debug drawing.
    pub fn links(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let pivots = std::iter::once(Vec2::zero()).chain(self.segments.iter().map(|s| s.position));
        pivots.zip(self.segments.iter().map(|s| s.position))
    }

    /// Advance one fixed step. See [`integrator::step`].
    pub fn step(&mut self, gravity: f64, dt: f64) {
        integrator::step(self, gravity, dt);
    }

    /// True when every segment's state is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.segments.iter().all(Segment::is_finite)
    }

    /// Rebuild every tip position from the anchor outward.
    fn recompute_positions(&mut self) {
        let mut pivot = Vec2::zero();
        for segment in &mut self.segments {
            segment.position = pivot + segment.offset();
            pivot = segment.position;
        }
    }
}
