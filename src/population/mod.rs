//! The ensemble of chains.
//!
//! All chains in a population share one topology (segment count, lengths,
//! masses, trajectory capacity) and differ only in the first segment's
//! starting angle. The per-chain spread is tiny (`1e-4` rad across the whole
//! population); the coupled dynamics amplify it into visible divergence.
//! Each reset generation shifts the whole cluster so successive restarts do
//! not replay the same motion.

pub mod divergence;

use std::f64::consts::{FRAC_PI_4, FRAC_PI_8, PI};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chain::Chain;
use crate::config::StructureParams;
use crate::engine::state::Vec2;
use crate::error::SimResult;

/// Offset of the cluster's first-segment angle from straight up.
const BASE_OFFSET: f64 = 0.125;

/// Total angular spread across the population.
const CHAIN_SPREAD: f64 = 0.0001;

/// Generation-to-generation angle step, folded into `[-π/8, π/8)`.
const GENERATION_STEP: f64 = 0.5;

/// Starting angle of chain `index`'s first segment.
///
/// `π + 0.125 + (index / chain_count)·1e-4 + ((generation·0.5 + π/8) mod π/4) − π/8`
#[must_use]
pub fn initial_angle(index: usize, chain_count: usize, generation: u32) -> f64 {
    let spread = index as f64 / chain_count as f64 * CHAIN_SPREAD;
    let shift = (f64::from(generation) * GENERATION_STEP + FRAC_PI_8) % FRAC_PI_4 - FRAC_PI_8;
    PI + BASE_OFFSET + spread + shift
}

/// Ordered set of chains simulated together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Population {
    chains: Vec<Chain>,
    generation: u32,
}

impl Population {
    /// Build a fresh population for `generation`.
    ///
    /// Every chain hangs its first segment at [`initial_angle`] and the rest
    /// straight up (`π`).
    ///
    /// # Errors
    ///
    /// Returns the first chain construction error; no partial population is
    /// returned.
    pub fn seed(structure: &StructureParams, generation: u32) -> SimResult<Self> {
        let n = structure.segments_per_chain;
        let m = structure.chain_count;
        let lengths = vec![structure.segment_length; n];
        let masses = vec![structure.segment_mass; n];
        let mut angles = vec![PI; n];

        let chains = (0..m)
            .map(|i| {
                if let Some(first) = angles.first_mut() {
                    *first = initial_angle(i, m, generation);
                }
                Chain::new(n, &lengths, &masses, &angles, structure.trajectory_points)
            })
            .collect::<SimResult<Vec<_>>>()?;

        debug!(chains = m, segments = n, generation, "seeded population");
        Ok(Self { chains, generation })
    }

    /// Wrap explicitly constructed chains as generation 0.
    #[must_use]
    pub const fn from_chains(chains: Vec<Chain>) -> Self {
        Self {
            chains,
            generation: 0,
        }
    }

    /// An empty population.
    #[must_use]
    pub const fn empty() -> Self {
        Self::from_chains(Vec::new())
    }

    /// Chains in population order.
    #[must_use]
    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    /// Number of chains.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    /// True if there are no chains.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// Reset generation this population was seeded with.
    #[must_use]
    pub const fn generation(&self) -> u32 {
        self.generation
    }

    /// Tip of every chain, in order.
    pub fn tips(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.chains.iter().map(Chain::tip)
    }

    /// Advance every chain by one step.
    pub fn step(&mut self, gravity: f64, dt: f64) {
        for chain in &mut self.chains {
            chain.step(gravity, dt);
        }
    }

    /// Number of chains whose state has gone non-finite.
    #[must_use]
    pub fn non_finite_count(&self) -> usize {
        self.chains.iter().filter(|chain| !chain.is_finite()).count()
    }

    /// Mean adjacent-pair tip distance over `sample_count` samples.
    #[must_use]
    pub fn divergence(&self, sample_count: usize) -> f64 {
        divergence::estimate(&self.chains, sample_count)
    }
}
