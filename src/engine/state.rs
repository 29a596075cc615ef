//! Planar state primitives.
//!
//! Every pendulum in the ensemble swings in the plane, so positions and
//! velocities are two-component `f64` vectors. Screen conventions are kept:
//! `y` grows downward, so a segment at angle `0` hangs straight down.

use serde::{Deserialize, Serialize};

/// 2D vector for positions and velocities.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    /// X component.
    pub x: f64,
    /// Y component (positive is down).
    pub y: f64,
}

impl Vec2 {
    /// Create a new vector.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Zero vector.
    #[must_use]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Offset of an arm of `length` swung to `angle` radians from vertical.
    #[must_use]
    pub fn from_polar(length: f64, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            x: length * sin,
            y: length * cos,
        }
    }

    /// Magnitude squared.
    #[must_use]
    pub fn magnitude_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Magnitude (length).
    #[must_use]
    pub fn magnitude(&self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        (*self - *other).magnitude()
    }

    /// Scale by scalar.
    #[must_use]
    pub fn scale(&self, s: f64) -> Self {
        Self {
            x: self.x * s,
            y: self.y * s,
        }
    }

    /// Check if all components are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// True when either coordinate is exactly zero.
    ///
    /// Trajectory slots start zero-filled, and the renderer treats such a
    /// point as "not yet written".
    #[must_use]
    pub fn touches_axis(&self) -> bool {
        self.x == 0.0 || self.y == 0.0
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl std::ops::Mul<f64> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        self.scale(rhs)
    }
}

impl std::ops::Neg for Vec2 {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec2_arithmetic() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(3.0, -1.0);

        assert_eq!(a + b, Vec2::new(4.0, 1.0));
        assert_eq!(a - b, Vec2::new(-2.0, 3.0));
        assert_eq!(a * 2.0, Vec2::new(2.0, 4.0));
        assert_eq!(-a, Vec2::new(-1.0, -2.0));
    }

    #[test]
    fn test_vec2_distance() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(3.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < f64::EPSILON);
        assert!((b.magnitude_squared() - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_polar_hangs_down_at_zero() {
        let down = Vec2::from_polar(2.0, 0.0);
        assert!(down.x.abs() < f64::EPSILON);
        assert!((down.y - 2.0).abs() < f64::EPSILON);

        let up = Vec2::from_polar(1.0, std::f64::consts::PI);
        assert!((up.y + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_is_finite() {
        assert!(Vec2::new(1.0, -1.0).is_finite());
        assert!(!Vec2::new(f64::NAN, 0.0).is_finite());
        assert!(!Vec2::new(0.0, f64::INFINITY).is_finite());
    }

    #[test]
    fn test_touches_axis() {
        assert!(Vec2::zero().touches_axis());
        assert!(Vec2::new(0.0, 5.0).touches_axis());
        assert!(!Vec2::new(0.1, -0.1).touches_axis());
    }
}
