//! Fixed-capacity trail of a chain's tip.
//!
//! The buffer is allocated once, zero-filled, and overwritten in place: the
//! write cursor always points at the oldest slot, so reading from the cursor
//! forward (wrapping) yields points from oldest to newest.

use serde::{Deserialize, Serialize};

use crate::engine::state::Vec2;
use crate::error::{SimError, SimResult};

/// Circular history of tip positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    points: Vec<Vec2>,
    cursor: usize,
}

/// One renderable line piece of a trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailSegment {
    /// Older endpoint.
    pub from: Vec2,
    /// Newer endpoint.
    pub to: Vec2,
    /// Opacity in `[0, 1]`, growing toward the newest end.
    pub alpha: f64,
}

impl Trajectory {
    /// Create a zero-filled trajectory holding `capacity` points.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::EmptyTrajectory`] when `capacity` is zero.
    pub fn new(capacity: usize) -> SimResult<Self> {
        if capacity == 0 {
            return Err(SimError::EmptyTrajectory);
        }
        Ok(Self {
            points: vec![Vec2::zero(); capacity],
            cursor: 0,
        })
    }

    /// Number of slots. This never changes after construction.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.points.len()
    }

    /// Index of the slot the next point will be written to.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Write `point` at the cursor, then advance the cursor.
    pub fn push(&mut self, point: Vec2) {
        self.points[self.cursor] = point;
        self.cursor = (self.cursor + 1) % self.points.len();
    }

    /// Most recently written point (a zero vector before the first write).
    #[must_use]
    pub fn latest(&self) -> Vec2 {
        let len = self.points.len();
        self.points[(self.cursor + len - 1) % len]
    }

    /// Oldest retained point.
    #[must_use]
    pub fn oldest(&self) -> Vec2 {
        self.points[self.cursor]
    }

    /// Raw slot storage in write order (not age order).
    #[must_use]
    pub fn as_slice(&self) -> &[Vec2] {
        &self.points
    }

    /// Points ordered from oldest to newest.
    ///
    /// The iterator borrows the buffer and is cheap to recreate, so every
    /// draw call can start a fresh pass.
    pub fn iter(&self) -> impl Iterator<Item = Vec2> + Clone + '_ {
        let (newer, older) = self.points.split_at(self.cursor);
        older.iter().chain(newer.iter()).copied()
    }

    /// Line pieces between consecutive points, faded by age.
    ///
    /// Piece `i` (0 = oldest) gets `alpha = ((i + 1) / capacity)^alpha_power`,
    /// clamped to `[0, 1]`. Pieces touching an unwritten slot are skipped.
    pub fn segments(&self, alpha_power: f64) -> impl Iterator<Item = TrailSegment> + '_ {
        let capacity = self.points.len();
        self.iter()
            .zip(self.iter().skip(1))
            .enumerate()
            .filter(|(_, (from, to))| !from.touches_axis() && !to.touches_axis())
            .map(move |(i, (from, to))| {
                let alpha = ((i + 1) as f64 / capacity as f64).powf(alpha_power);
                TrailSegment {
                    from,
                    to,
                    alpha: alpha.clamp(0.0, 1.0),
                }
            })
    }
}
