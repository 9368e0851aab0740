//! Single-tour simulated annealing.
//!
//! # Search state
//!
//! Three copies of the tour are kept:
//!
//! - `work`: the tour being mutated this iteration.
//! - `good`: the last accepted tour (the Markov chain's current state).
//! - `best`: the shortest tour ever seen.  Only replaced on strict
//!   improvement, so the result is never longer than the input.
//!
//! Each iteration picks two distinct positions and one of four moves
//! (segment reversal, swap, single-node relocation, two-node block
//! relocation), evaluates the whole tour, and accepts by the Metropolis
//! rule `exp((good - new) / (k·T))`.  Rejected moves are undone by copying
//! `good` back over `work`.

use st_core::{Budget, EngineConfig, NodeId, SimRng};
use st_spatial::DistanceTable;

use crate::cost::Anchor;

// ── Parameters ────────────────────────────────────────────────────────────────

/// Cooling schedule and polling cadence.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AnnealParams {
    pub initial_temperature: f64,
    /// Geometric factor applied to the temperature every iteration.
    pub cooling: f64,
    pub min_temperature: f64,
    pub boltzmann: f64,
    /// Iterations between budget polls.
    pub check_interval: u32,
}

impl Default for AnnealParams {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl AnnealParams {
    pub fn from_config(cfg: &EngineConfig) -> Self {
        Self {
            initial_temperature: cfg.initial_temperature,
            cooling:             cfg.cooling,
            min_temperature:     cfg.min_temperature,
            boltzmann:           cfg.boltzmann,
            check_interval:      cfg.check_interval.max(1),
        }
    }

    /// Metropolis acceptance for a move from `good` to `new` at `temp`.
    #[inline]
    pub(crate) fn accept(&self, good: f64, new: f64, temp: f64, rng: &mut SimRng) -> bool {
        if new < good {
            return true;
        }
        let p = ((good - new) / (self.boltzmann * temp)).exp();
        rng.random::<f64>() < p
    }

    #[inline]
    pub(crate) fn cool(&self, temp: f64) -> f64 {
        (temp * self.cooling).max(self.min_temperature)
    }
}

/// Counters reported at `debug` level after every run.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct AnnealStats {
    pub iterations: u64,
    pub accepted: u64,
    pub improved: u64,
    pub initial_cost: f64,
    pub best_cost: f64,
}

// ── Moves ─────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum IntraMove {
    Reverse,
    Swap,
    Relocate,
    BlockRelocate,
}

impl IntraMove {
    const ALL: [IntraMove; 4] = [
        IntraMove::Reverse,
        IntraMove::Swap,
        IntraMove::Relocate,
        IntraMove::BlockRelocate,
    ];

    pub(crate) fn pick(rng: &mut SimRng) -> IntraMove {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Apply to `tour` at the distinct positions `a`, `b`.  Returns `false`
    /// (leaving `tour` untouched) when the move does not apply.
    pub(crate) fn apply(self, tour: &mut Vec<NodeId>, a: usize, b: usize) -> bool {
        let n = tour.len();
        debug_assert!(a != b && a < n && b < n);
        match self {
            IntraMove::Reverse => {
                let (lo, hi) = (a.min(b), a.max(b));
                tour[lo..=hi].reverse();
            }
            IntraMove::Swap => tour.swap(a, b),
            IntraMove::Relocate => {
                let v = tour.remove(a);
                tour.insert(b, v);
            }
            IntraMove::BlockRelocate => {
                // The block is tour[a], tour[a + 1]; none starts at the tail.
                if a + 1 >= n || n < 3 {
                    return false;
                }
                let block: [NodeId; 2] = [tour[a], tour[a + 1]];
                tour.drain(a..a + 2);
                let at = b.min(tour.len());
                tour.insert(at, block[1]);
                tour.insert(at, block[0]);
            }
        }
        true
    }
}

// ── TourAnnealer ──────────────────────────────────────────────────────────────

/// Simulated annealing over one tour.
pub struct TourAnnealer<'a> {
    table: &'a DistanceTable,
    params: AnnealParams,
}

impl<'a> TourAnnealer<'a> {
    pub fn new(table: &'a DistanceTable, params: AnnealParams) -> Self {
        Self { table, params }
    }

    /// Improve `tour` until `budget` expires; returns the best tour found.
    pub fn optimize(
        &self,
        anchor: Anchor,
        tour: Vec<NodeId>,
        budget: &mut impl Budget,
        rng: &mut SimRng,
    ) -> Vec<NodeId> {
        self.optimize_with_stats(anchor, tour, budget, rng).0
    }

    pub fn optimize_with_stats(
        &self,
        anchor: Anchor,
        tour: Vec<NodeId>,
        budget: &mut impl Budget,
        rng: &mut SimRng,
    ) -> (Vec<NodeId>, AnnealStats) {
        let initial_cost = anchor.length(&tour, self.table);
        let mut stats = AnnealStats { initial_cost, best_cost: initial_cost, ..AnnealStats::default() };
        if tour.len() <= 2 {
            return (tour, stats);
        }

        let n = tour.len();
        let mut work = tour.clone();
        let mut good = tour.clone();
        let mut best = tour;
        let mut good_cost = initial_cost;
        let mut best_cost = initial_cost;
        let mut temp = self.params.initial_temperature;
        let interval = self.params.check_interval as u64;

        loop {
            if stats.iterations % interval == 0 && budget.expired() {
                break;
            }
            stats.iterations += 1;

            let (a, b) = rng.distinct_pair(n);
            if !IntraMove::pick(rng).apply(&mut work, a, b) {
                temp = self.params.cool(temp);
                continue;
            }
            let cost = anchor.length(&work, self.table);

            if cost < best_cost {
                best_cost = cost;
                best.clone_from(&work);
                stats.improved += 1;
            }
            if self.params.accept(good_cost, cost, temp, rng) {
                good_cost = cost;
                good.clone_from(&work);
                stats.accepted += 1;
            } else {
                work.clone_from(&good);
            }
            temp = self.params.cool(temp);
        }

        stats.best_cost = best_cost;
        tracing::debug!(
            iterations = stats.iterations,
            accepted = stats.accepted,
            improved = stats.improved,
            initial = stats.initial_cost,
            best = stats.best_cost,
            "tour annealing finished"
        );
        (best, stats)
    }
}
