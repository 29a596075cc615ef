//! End-to-end behaviour of the ensemble: integrator, trails, divergence,
//! reset cycle and seeding, driven through the public API only.

#![allow(clippy::unwrap_used)]

use pendular::config::StructureParams;
use pendular::engine::ResetState;
use pendular::prelude::*;

fn single(angle: f64) -> Chain {
    Chain::new(1, &[1.0], &[1.0], &[angle], 8).unwrap()
}

// ============================================================================
// Integrator
// ============================================================================

#[test]
fn single_segment_tick_matches_closed_form() {
    let (g, l, h) = (9.81, 2.0, 0.05);
    let mut chain = Chain::new(1, &[l], &[1.0], &[0.7], 4).unwrap();
    // Give it history so an accumulating integrator would differ.
    chain.step(g, h);
    let before = chain.segments()[0].angle();

    chain.step(g, h);
    let segment = &chain.segments()[0];
    let acc = -(g / l) * before.sin();
    assert!((segment.angular_acceleration() - acc).abs() < 1e-12);
    assert!((segment.angular_velocity() - acc * h).abs() < 1e-12);
    assert!((segment.angle() - (before + acc * h * h)).abs() < 1e-12);
}

#[test]
fn coupled_accelerations_use_pre_tick_state() {
    let mut chain = Chain::new(2, &[1.0, 1.5], &[2.0, 1.0], &[0.4, -0.3], 4).unwrap();
    chain.step(9.81, 0.01);
    chain.step(9.81, 0.01);
    let before = chain.clone();

    chain.step(9.81, 0.01);
    let (a1, a2) = pendular::chain::integrator::pair_accelerations(
        &before.segments()[0],
        &before.segments()[1],
        9.81,
    );
    assert!((chain.segments()[0].angular_acceleration() - a1).abs() < 1e-12);
    assert!((chain.segments()[1].angular_acceleration() - a2).abs() < 1e-12);
}

#[test]
fn tip_lies_at_sum_of_segment_offsets() {
    let mut chain = Chain::new(3, &[1.0, 2.0, 0.5], &[1.0; 3], &[0.3, 1.2, -0.4], 4).unwrap();
    for _ in 0..25 {
        chain.step(9.81, 0.01);
    }
    let summed = chain
        .segments()
        .iter()
        .fold(Vec2::zero(), |acc, s| acc + s.offset());
    assert!(chain.tip().distance(&summed) < 1e-9);
}

// ============================================================================
// Trajectory
// ============================================================================

#[test]
fn trajectory_wraps_after_capacity_plus_one_ticks() {
    let capacity = 5;
    let mut chain = Chain::new(2, &[1.0, 1.0], &[1.0, 1.0], &[1.0, 0.5], capacity).unwrap();

    let mut recorded = Vec::new();
    for _ in 0..=capacity {
        chain.step(9.81, 0.02);
        recorded.push(chain.tip());
    }

    let trail = chain.trajectory();
    assert_eq!(trail.capacity(), capacity);
    assert_eq!(trail.as_slice().len(), capacity);
    // The first write was overwritten by the last one.
    assert_eq!(trail.oldest(), recorded[1]);
    assert_eq!(trail.latest(), recorded[capacity]);
    let ordered: Vec<Vec2> = trail.iter().collect();
    assert_eq!(ordered, recorded[1..]);
}

// ============================================================================
// Divergence
// ============================================================================

#[test]
fn divergence_of_empty_population_is_zero() {
    assert_eq!(Population::empty().divergence(100), 0.0);
}

#[test]
fn divergence_never_reads_out_of_bounds() {
    let chains: Vec<Chain> = (0..3).map(|i| single(f64::from(i) * 0.5)).collect();
    let population = Population::from_chains(chains);
    for samples in [0, 1, 2, 3, 10, 1_000] {
        assert!(population.divergence(samples).is_finite());
    }
}

// ============================================================================
// Reset cycle
// ============================================================================

fn spread_state(threshold: f64) -> SimulationState {
    let params = SimulationParameters::builder()
        .reset_threshold(threshold)
        .reset_sample_count(1)
        .reset_fade_seconds(2.5)
        .build();
    // Tips at (0, 10) and (0, -10): 20 apart.
    let chains = vec![
        Chain::new(1, &[10.0], &[1.0], &[0.0], 4).unwrap(),
        Chain::new(1, &[10.0], &[1.0], &[std::f64::consts::PI], 4).unwrap(),
    ];
    SimulationState::with_population(params, Population::from_chains(chains)).unwrap()
}

#[test]
fn divergence_above_threshold_arms_reset() {
    let mut state = spread_state(10.0);
    let report = state.frame(100.0, &FrameInput::default()).unwrap();
    assert!(report.divergence > 10.0);
    assert_eq!(report.reset, ResetAction::Armed { reset_at: 102.5 });
    assert_eq!(state.controller().reset_at(), Some(102.5));
}

#[test]
fn suppress_reset_keeps_running() {
    let mut state = spread_state(10.0);
    let held = FrameInput {
        suppress_reset: true,
        ..FrameInput::default()
    };
    let report = state.frame(100.0, &held).unwrap();
    assert_eq!(report.reset, ResetAction::Idle);
    assert_eq!(state.controller().state(), ResetState::Running);
}

#[test]
fn manual_reset_while_armed_changes_nothing() {
    let mut state = spread_state(10.0);
    state.frame(100.0, &FrameInput::default()).unwrap();

    let manual = FrameInput {
        manual_reset: true,
        ..FrameInput::default()
    };
    let report = state.frame(101.0, &manual).unwrap();
    assert_eq!(report.reset, ResetAction::Waiting);
    assert_eq!(state.controller().reset_at(), Some(102.5));
}

#[test]
fn full_cycle_reseeds_next_generation() {
    let params = SimulationParameters::builder()
        .chain_count(10)
        .segments_per_chain(2)
        .trajectory_points(4)
        .reset_fade_seconds(1.0)
        .build();
    let mut state = SimulationState::new(params).unwrap();
    let manual = FrameInput {
        manual_reset: true,
        ..FrameInput::default()
    };

    state.frame(0.0, &manual).unwrap();
    assert!((state.fade_progress(0.25) - 0.75).abs() < 1e-12);
    let report = state.frame(1.0, &FrameInput::default()).unwrap();
    assert_eq!(report.reset, ResetAction::Reseed { generation: 1 });
    assert_eq!(state.population().generation(), 1);
    assert!((state.fade_progress(1.0) - 1.0).abs() < f64::EPSILON);
}

// ============================================================================
// Seeding
// ============================================================================

#[test]
fn seeding_is_bit_identical() {
    let structure = StructureParams {
        segments_per_chain: 3,
        chain_count: 64,
        ..StructureParams::default()
    };
    for generation in [0, 1, 17] {
        let a = Population::seed(&structure, generation).unwrap();
        let b = Population::seed(&structure, generation).unwrap();
        let angles = |p: &Population| -> Vec<u64> {
            p.chains()
                .iter()
                .flat_map(|c| c.segments().iter().map(|s| s.angle().to_bits()))
                .collect()
        };
        assert_eq!(angles(&a), angles(&b));
    }
}

#[test]
fn generations_shift_the_starting_angle() {
    let structure = StructureParams {
        chain_count: 4,
        ..StructureParams::default()
    };
    let first = Population::seed(&structure, 0).unwrap();
    let second = Population::seed(&structure, 1).unwrap();
    assert_ne!(
        first.chains()[0].segments()[0].angle(),
        second.chains()[0].segments()[0].angle()
    );
}

// ============================================================================
// Two chains, one segment each
// ============================================================================

#[test]
fn two_single_segment_chains_one_tick() {
    let params = SimulationParameters::builder()
        .gravity(1.0)
        .fixed_delta_time(0.1)
        .build();
    let population = Population::from_chains(vec![single(0.1), single(0.2)]);
    let mut state = SimulationState::with_population(params, population).unwrap();

    state.tick();

    let chain = &state.population().chains()[0];
    // gravity / length = 1
    let acc = -(0.1_f64.sin());
    let vel = acc * 0.1;
    assert!((chain.segments()[0].angle() - (0.1 + vel * 0.1)).abs() < 1e-9);

    let other = &state.population().chains()[1];
    let acc = -(0.2_f64.sin());
    assert!((other.segments()[0].angle() - (0.2 + acc * 0.1 * 0.1)).abs() < 1e-9);
}
