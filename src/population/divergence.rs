//! Divergence estimate over a population.
//!
//! Samples `S` adjacent chain pairs spread evenly across the population and
//! averages the distance between their tips. While the chains are still in
//! lockstep the estimate stays near zero; once chaos has pulled neighbours
//! apart it climbs toward the arm-length scale.
//!
//! # Sampling
//!
//! ```text
//! index(s) = ⌊s · M / (S + 1)⌋,   s ∈ [0, S)
//! D = (1/S) · Σ ‖tip[index(s)] − tip[index(s) + 1]‖
//! ```
//!
//! `index(s) + 1 < M` holds for every `s` exactly when `S ≤ 2M − 2`, so larger
//! sample counts are clamped to that bound.

use tracing::debug;

use crate::chain::Chain;

/// Largest sample count whose pairs all stay inside a population of `chain_count`.
#[must_use]
pub const fn max_samples(chain_count: usize) -> usize {
    (2 * chain_count).saturating_sub(2)
}

/// Index of the first chain of sample `sample` out of `samples`.
#[must_use]
pub const fn sample_index(sample: usize, samples: usize, chain_count: usize) -> usize {
    sample * chain_count / (samples + 1)
}

/// Mean tip distance over evenly spread adjacent pairs.
///
/// Returns `0.0` for populations with fewer than two chains or a zero sample
/// count. Non-finite tips propagate into the result.
#[must_use]
pub fn estimate(chains: &[Chain], sample_count: usize) -> f64 {
    let chain_count = chains.len();
    let samples = sample_count.min(max_samples(chain_count));
    if samples == 0 {
        return 0.0;
    }
    if samples < sample_count {
        debug!(
            requested = sample_count,
            used = samples,
            chain_count,
            "clamped divergence sample count"
        );
    }

    let total: f64 = (0..samples)
        .map(|s| {
            let i = sample_index(s, samples, chain_count);
            chains[i].tip().distance(&chains[i + 1].tip())
        })
        .sum();

    total / samples as f64
}
