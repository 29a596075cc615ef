//! Fixed-step pendulum integrator.
//!
//! # Governing Equations
//!
//! Single segment (simplified path):
//!
//! ```text
//! α = -(g / l) · sin θ
//! ω = α · dt            (recomputed each tick, not accumulated)
//! θ = θ + ω · dt
//! ```
//!
//! Two or more segments: every adjacent pair `(i, i + 1)` is solved with the
//! closed-form double-pendulum equations
//!
//! ```text
//! α₁ = [-g(2m₁+m₂)sin θ₁ - m₂g·sin(θ₁-2θ₂) - 2sin(θ₁-θ₂)m₂(ω₂²l₂ + ω₁²l₁cos(θ₁-θ₂))]
//!      / [l₁(2m₁+m₂-m₂cos(2θ₁-2θ₂))]
//! α₂ = [2sin(θ₁-θ₂)(ω₁²l₁(m₁+m₂) + g(m₁+m₂)cos θ₁ + ω₂²l₂m₂cos(θ₁-θ₂))]
//!      / [l₂(2m₁+m₂-m₂cos(2θ₁-2θ₂))]
//! ```
//!
//! followed by semi-implicit Euler on every segment:
//! `ω += α·dt; θ += ω·dt`.
//!
//! The two paths are deliberately different. The single-segment path does not
//! carry velocity across ticks; it is a simplification the ensemble's look
//! depends on, not an accident to be unified away.
//!
//! A zero denominator is not guarded. The resulting `NaN`/`Inf` propagates
//! through the chain as a visible blow-up until the next reseed.

use super::{Chain, Segment};

/// Advance `chain` by one step of `dt`, then record its tip.
///
/// Positions are rebuilt from the anchor outward after the angles move, and
/// the new tip is written into the trajectory at its cursor.
pub fn step(chain: &mut Chain, gravity: f64, dt: f64) {
    match chain.segments.as_mut_slice() {
        [] => return,
        [single] => step_single(single, gravity, dt),
        segments => step_coupled(segments, gravity, dt),
    }
    chain.recompute_positions();
    let tip = chain.tip();
    chain.trajectory.push(tip);
}

/// Simple-pendulum update for a one-segment chain.
fn step_single(segment: &mut Segment, gravity: f64, dt: f64) {
    segment.angular_acceleration = -gravity / segment.length * segment.angle.sin();
    segment.angular_velocity = segment.angular_acceleration * dt;
    segment.angle += segment.angular_velocity * dt;
}

/// Pairwise coupled update for chains of two or more segments.
///
/// Every acceleration is computed before any angle or velocity moves, so all
/// pairs read the same pre-tick snapshot. Where pairs overlap, the inner
/// segment's acceleration from pair `(i, i+1)` is replaced by the one it gets
/// as the upper arm of pair `(i+1, i+2)`.
fn step_coupled(segments: &mut [Segment], gravity: f64, dt: f64) {
    for i in 0..segments.len() - 1 {
        let (upper, lower) = pair_accelerations(&segments[i], &segments[i + 1], gravity);
        segments[i].angular_acceleration = upper;
        segments[i + 1].angular_acceleration = lower;
    }

    for segment in segments.iter_mut() {
        segment.angular_velocity += segment.angular_acceleration * dt;
        segment.angle += segment.angular_velocity * dt;
    }
}

/// Closed-form double-pendulum angular accelerations for one adjacent pair.
///
/// Returns `(upper, lower)`. Reads only angle, angular velocity, length and
/// mass, so it is safe to call on a snapshot that is later mutated.
#[must_use]
pub fn pair_accelerations(upper: &Segment, lower: &Segment, gravity: f64) -> (f64, f64) {
    let (a1, a2) = (upper.angle, lower.angle);
    let (m1, m2) = (upper.mass, lower.mass);
    let (l1, l2) = (upper.length, lower.length);
    let (w1, w2) = (upper.angular_velocity, lower.angular_velocity);
    let g = gravity;

    let delta = a1 - a2;
    let shared = 2.0 * m1 + m2 - m2 * (2.0 * a1 - 2.0 * a2).cos();

    let n1 = -g * (2.0 * m1 + m2) * a1.sin();
    let n2 = -m2 * g * (a1 - 2.0 * a2).sin();
    let n3 = -2.0 * delta.sin() * m2;
    let n4 = w2 * w2 * l2 + w1 * w1 * l1 * delta.cos();
    let upper_acc = (n1 + n2 + n3 * n4) / (l1 * shared);

    let n1 = 2.0 * delta.sin();
    let n2 = w1 * w1 * l1 * (m1 + m2);
    let n3 = g * (m1 + m2) * a1.cos();
    let n4 = w2 * w2 * l2 * m2 * delta.cos();
    let lower_acc = (n1 * (n2 + n3 + n4)) / (l2 * shared);

    (upper_acc, lower_acc)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::engine::state::Vec2;
    use std::f64::consts::PI;

    fn single(angle: f64, length: f64) -> Chain {
        Chain::new(1, &[length], &[1.0], &[angle], 8).unwrap()
    }

    #[test]
    fn test_single_segment_step() {
        let (g, l, h, theta) = (9.81, 2.0, 0.01, 0.5);
        let mut chain = single(theta, l);
        chain.step(g, h);

        let s = &chain.segments()[0];
        let expected_acc = -(g / l) * theta.sin();
        assert!((s.angular_acceleration() - expected_acc).abs() < 1e-12);
        assert!((s.angular_velocity() - expected_acc * h).abs() < 1e-12);
        assert!((s.angle() - (theta + expected_acc * h * h)).abs() < 1e-12);
    }

    #[test]
    fn test_single_segment_does_not_accumulate_velocity() {
        let (g, h) = (1.0, 0.1);
        let mut chain = single(1.0, 1.0);
        chain.step(g, h);
        chain.step(g, h);

        let s = &chain.segments()[0];
        // Second tick's velocity depends only on that tick's acceleration.
        assert!((s.angular_velocity() - s.angular_acceleration() * h).abs() < 1e-15);
    }

    #[test]
    fn test_single_segment_at_rest_stays() {
        let mut chain = single(0.0, 1.0);
        for _ in 0..10 {
            chain.step(9.81, 0.01);
        }
        assert!(chain.segments()[0].angle().abs() < f64::EPSILON);
        assert!((chain.tip().y - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pair_accelerations_match_closed_form() {
        let chain = Chain::new(2, &[1.5, 0.7], &[2.0, 3.0], &[0.4, -1.1], 4).unwrap();
        let (p1, p2) = (&chain.segments()[0], &chain.segments()[1]);
        let g = 9.81;
        let (a1, a2, m1, m2, l1, l2) = (0.4f64, -1.1f64, 2.0, 3.0, 1.5, 0.7);

        // At rest: velocity terms vanish.
        let d = 2.0 * m1 + m2 - m2 * (2.0 * a1 - 2.0 * a2).cos();
        let expected_upper =
            (-g * (2.0 * m1 + m2) * a1.sin() - m2 * g * (a1 - 2.0 * a2).sin()) / (l1 * d);
        let expected_lower = 2.0 * (a1 - a2).sin() * (g * (m1 + m2) * a1.cos()) / (l2 * d);

        let (upper, lower) = pair_accelerations(p1, p2, g);
        assert!((upper - expected_upper).abs() < 1e-12);
        assert!((lower - expected_lower).abs() < 1e-12);
    }

    #[test]
    fn test_coupled_uses_pre_tick_snapshot() {
        let mut chain = Chain::new(2, &[1.0, 1.0], &[1.0, 1.0], &[0.9, 2.1], 4).unwrap();
        // Give both segments some velocity first.
        chain.step(9.81, 0.05);

        let before = chain.clone();
        let (upper, lower) = pair_accelerations(&before.segments()[0], &before.segments()[1], 9.81);
        chain.step(9.81, 0.05);

        let after = chain.segments();
        assert!((after[0].angular_acceleration() - upper).abs() < 1e-12);
        assert!((after[1].angular_acceleration() - lower).abs() < 1e-12);

        // Semi-implicit Euler with accumulated velocity.
        let w0 = before.segments()[0].angular_velocity() + upper * 0.05;
        assert!((after[0].angular_velocity() - w0).abs() < 1e-12);
        assert!((after[0].angle() - (before.segments()[0].angle() + w0 * 0.05)).abs() < 1e-12);
    }

    #[test]
    fn test_overlapping_pairs_keep_outer_pair_acceleration() {
        let mut chain = Chain::new(3, &[1.0; 3], &[1.0; 3], &[0.3, 0.8, -0.5], 4).unwrap();
        let snapshot = chain.clone();
        let s = snapshot.segments();
        let (first_upper, _) = pair_accelerations(&s[0], &s[1], 1.0);
        let (middle, last) = pair_accelerations(&s[1], &s[2], 1.0);

        chain.step(1.0, 0.01);
        let after = chain.segments();
        assert!((after[0].angular_acceleration() - first_upper).abs() < 1e-12);
        assert!((after[1].angular_acceleration() - middle).abs() < 1e-12);
        assert!((after[2].angular_acceleration() - last).abs() < 1e-12);
    }

    #[test]
    fn test_positions_follow_angles() {
        let mut chain = Chain::new(2, &[1.0, 2.0], &[1.0, 1.0], &[PI + 0.1, PI], 4).unwrap();
        chain.step(0.981, 0.1666667);

        let s = chain.segments();
        let first = s[0].offset();
        let second = first + s[1].offset();
        assert!((s[0].position().distance(&first)).abs() < 1e-12);
        assert!((s[1].position().distance(&second)).abs() < 1e-12);
    }

    #[test]
    fn test_step_records_tip() {
        let mut chain = Chain::new(2, &[1.0; 2], &[1.0; 2], &[1.0, 2.0], 3).unwrap();
        chain.step(1.0, 0.1);
        assert_eq!(chain.trajectory().cursor(), 1);
        assert_eq!(chain.trajectory().latest(), chain.tip());

        let mut lone = single(0.5, 1.0);
        lone.step(1.0, 0.1);
        assert_eq!(lone.trajectory().latest(), lone.tip());
    }

    #[test]
    fn test_degenerate_denominator_is_not_clamped() {
        // l1 = 0 zeroes the upper denominator.
        let mut chain = Chain::new(2, &[0.0, 1.0], &[1.0, 1.0], &[0.5, 0.2], 4).unwrap();
        chain.step(9.81, 0.1);
        assert!(!chain.is_finite());
        assert!(!chain.segments()[0].angular_acceleration().is_finite());
        assert!(!chain.trajectory().latest().is_finite());

        // Keeps ticking on the exploded state.
        chain.step(9.81, 0.1);
        assert_eq!(chain.trajectory().cursor(), 2);
        assert!(chain.tip() != Vec2::zero());
    }
}
