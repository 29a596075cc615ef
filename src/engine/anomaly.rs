//! Non-finite state monitor.
//!
//! A zero denominator in the coupled equations turns a chain's state into
//! `NaN`/`Inf`. That is part of the look, not a fault: the chain keeps
//! ticking and disappears on the next reseed. The monitor only counts such
//! chains and logs the first blow-up of each generation.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::population::Population;

/// Result of one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyReport {
    /// Chains with any non-finite segment state.
    pub non_finite_chains: usize,
    /// True if this scan saw the generation's first blow-up.
    pub first_in_generation: bool,
}

/// Tracks non-finite chains across ticks.
#[derive(Debug, Clone, Default)]
pub struct AnomalyMonitor {
    generation: u32,
    reported: bool,
    last: AnomalyReport,
}

impl AnomalyMonitor {
    /// Create a monitor with nothing reported.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan `population` after a tick.
    pub fn scan(&mut self, population: &Population) -> AnomalyReport {
        if population.generation() != self.generation {
            self.rearm(population.generation());
        }

        let non_finite_chains = population.non_finite_count();
        let first_in_generation = non_finite_chains > 0 && !self.reported;
        if first_in_generation {
            self.reported = true;
            warn!(
                non_finite_chains,
                generation = self.generation,
                "chain state went non-finite; continuing until next reseed"
            );
        }

        self.last = AnomalyReport {
            non_finite_chains,
            first_in_generation,
        };
        self.last
    }

    /// Forget past reports, e.g. after a reseed.
    pub fn rearm(&mut self, generation: u32) {
        self.generation = generation;
        self.reported = false;
        self.last = AnomalyReport::default();
    }

    /// Most recent scan.
    #[must_use]
    pub const fn last(&self) -> AnomalyReport {
        self.last
    }
}
