//! Multi-tour simulated annealing: one open tour per agent.
//!
//! The cost of a plan is the sum over agents of the path length from the
//! agent's position through its tour.  Per-tour costs are cached so that a
//! move only re-evaluates the one or two tours it touched, and a rejected
//! move only restores those tours from the accepted state.
//!
//! Moves are drawn uniformly from the four single-tour moves (applied to one
//! random tour) plus five that work across agents:
//!
//! | Move            | Effect                                                  |
//! |-----------------|---------------------------------------------------------|
//! | `Relocate`      | move one node from agent A to a position in B           |
//! | `BlockRelocate` | move two adjacent nodes from A into B                   |
//! | `SwapTours`     | exchange the whole tours of A and B                     |
//! | `ReverseTour`   | reverse A's tour                                        |
//! | `CutTransfer`   | cut A's tour and append the suffix (maybe reversed) to B |
//!
//! With a single agent the search reduces to [`TourAnnealer`].

use st_core::{Budget, NodeId, SimRng};
use st_spatial::DistanceTable;

use crate::anneal::{AnnealParams, AnnealStats, IntraMove, TourAnnealer};
use crate::cost::{path_length, Anchor};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Move {
    Intra(IntraMove),
    Relocate,
    BlockRelocate,
    SwapTours,
    ReverseTour,
    CutTransfer,
}

const MOVE_COUNT: usize = 9;

impl Move {
    fn pick(rng: &mut SimRng) -> Move {
        match rng.gen_range(0..MOVE_COUNT) {
            0 => Move::Intra(IntraMove::Reverse),
            1 => Move::Intra(IntraMove::Swap),
            2 => Move::Intra(IntraMove::Relocate),
            3 => Move::Intra(IntraMove::BlockRelocate),
            4 => Move::Relocate,
            5 => Move::BlockRelocate,
            6 => Move::SwapTours,
            7 => Move::ReverseTour,
            _ => Move::CutTransfer,
        }
    }
}

/// Tours touched by one move.
type Touched = (usize, Option<usize>);

// ── MultiTourAnnealer ─────────────────────────────────────────────────────────

/// Simulated annealing over a partition of nodes into per-agent tours.
pub struct MultiTourAnnealer<'a> {
    table: &'a DistanceTable,
    params: AnnealParams,
}

impl<'a> MultiTourAnnealer<'a> {
    pub fn new(table: &'a DistanceTable, params: AnnealParams) -> Self {
        Self { table, params }
    }

    /// Improve `tours` (one per entry of `anchors`) until `budget` expires;
    /// returns the best plan found.
    ///
    /// # Panics
    /// Panics if `tours.len() != anchors.len()`.
    pub fn optimize(
        &self,
        anchors: &[NodeId],
        tours: Vec<Vec<NodeId>>,
        budget: &mut impl Budget,
        rng: &mut SimRng,
    ) -> Vec<Vec<NodeId>> {
        self.optimize_with_stats(anchors, tours, budget, rng).0
    }

    pub fn optimize_with_stats(
        &self,
        anchors: &[NodeId],
        mut tours: Vec<Vec<NodeId>>,
        budget: &mut impl Budget,
        rng: &mut SimRng,
    ) -> (Vec<Vec<NodeId>>, AnnealStats) {
        assert_eq!(anchors.len(), tours.len(), "one tour per agent");
        if tours.len() == 1 {
            let single = TourAnnealer::new(self.table, self.params);
            let tour = tours.pop().unwrap_or_default();
            let (tour, stats) = single.optimize_with_stats(Anchor::At(anchors[0]), tour, budget, rng);
            return (vec![tour], stats);
        }

        let costs: Vec<f64> = self.costs(anchors, &tours);
        let initial_cost: f64 = costs.iter().sum();
        let mut stats = AnnealStats { initial_cost, best_cost: initial_cost, ..AnnealStats::default() };
        let node_count: usize = tours.iter().map(Vec::len).sum();
        if tours.is_empty() || node_count == 0 {
            return (tours, stats);
        }

        let mut work = tours.clone();
        let mut work_costs = costs.clone();
        let mut good = tours.clone();
        let mut good_costs = costs;
        let mut good_total = initial_cost;
        let mut best = tours;
        let mut best_total = initial_cost;
        let mut temp = self.params.initial_temperature;
        let interval = self.params.check_interval as u64;

        loop {
            if stats.iterations % interval == 0 && budget.expired() {
                break;
            }
            stats.iterations += 1;

            let Some((a, b)) = self.apply(Move::pick(rng), &mut work, rng) else {
                temp = self.params.cool(temp);
                continue;
            };
            work_costs[a] = path_length(anchors[a], &work[a], self.table);
            let mut total = good_total - good_costs[a] + work_costs[a];
            if let Some(b) = b {
                work_costs[b] = path_length(anchors[b], &work[b], self.table);
                total += work_costs[b] - good_costs[b];
            }

            if total < best_total {
                best_total = total;
                best.clone_from(&work);
                stats.improved += 1;
            }
            let touched = [Some(a), b];
            if self.params.accept(good_total, total, temp, rng) {
                for t in touched.into_iter().flatten() {
                    good[t].clone_from(&work[t]);
                    good_costs[t] = work_costs[t];
                }
                good_total = total;
                stats.accepted += 1;
            } else {
                for t in touched.into_iter().flatten() {
                    work[t].clone_from(&good[t]);
                    work_costs[t] = good_costs[t];
                }
            }
            temp = self.params.cool(temp);
        }

        // Re-sum from scratch; the running total accumulates rounding.
        stats.best_cost = self.costs(anchors, &best).iter().sum();
        tracing::debug!(
            agents = anchors.len(),
            iterations = stats.iterations,
            accepted = stats.accepted,
            improved = stats.improved,
            initial = stats.initial_cost,
            best = stats.best_cost,
            "multi-tour annealing finished"
        );
        (best, stats)
    }

    fn costs(&self, anchors: &[NodeId], tours: &[Vec<NodeId>]) -> Vec<f64> {
        anchors
            .iter()
            .zip(tours)
            .map(|(&s, t)| path_length(s, t, self.table))
            .collect()
    }

    /// Apply `mv` in place.  Returns the touched tours, or `None` if the move
    /// does not apply to the current state (nothing was changed).
    fn apply(&self, mv: Move, tours: &mut [Vec<NodeId>], rng: &mut SimRng) -> Option<Touched> {
        let (a, b) = rng.distinct_pair(tours.len());
        match mv {
            Move::Intra(intra) => {
                let n = tours[a].len();
                if n < 2 {
                    return None;
                }
                let (i, j) = rng.distinct_pair(n);
                intra.apply(&mut tours[a], i, j).then_some((a, None))
            }
            Move::Relocate => {
                if tours[a].is_empty() {
                    return None;
                }
                let i = rng.gen_range(0..tours[a].len());
                let v = tours[a].remove(i);
                let at = rng.gen_range(0..=tours[b].len());
                tours[b].insert(at, v);
                Some((a, Some(b)))
            }
            Move::BlockRelocate => {
                if tours[a].len() < 2 {
                    return None;
                }
                let i = rng.gen_range(0..tours[a].len() - 1);
                let block: Vec<NodeId> = tours[a].drain(i..i + 2).collect();
                let at = rng.gen_range(0..=tours[b].len());
                tours[b].splice(at..at, block);
                Some((a, Some(b)))
            }
            Move::SwapTours => {
                if tours[a].is_empty() && tours[b].is_empty() {
                    return None;
                }
                tours.swap(a, b);
                Some((a, Some(b)))
            }
            Move::ReverseTour => {
                if tours[a].len() < 2 {
                    return None;
                }
                tours[a].reverse();
                Some((a, None))
            }
            Move::CutTransfer => {
                if tours[a].is_empty() {
                    return None;
                }
                let cut = rng.gen_range(0..tours[a].len());
                let mut suffix = tours[a].split_off(cut);
                if rng.gen_bool(0.5) {
                    suffix.reverse();
                }
                tours[b].extend(suffix);
                Some((a, Some(b)))
            }
        }
    }
}
