//! One-shot planning: construct a warm start, then anneal.
//!
//! The planner runs once, when the engine switches to `Executing`.  It
//! freezes the unvisited set, spends `construction_share` of the planning
//! budget building a closed tour, anchors it at the ship closest to the
//! unvisited set and hands the rest of the budget to local search.  Other
//! ships start with empty tours and pick up work through inter-tour moves.

use st_core::{Budget, Deadline, EngineConfig, NodeId, SimRng};
use st_spatial::{DistanceTable, StarField};
use st_tour::{anchor_tour, construct, AnnealParams, MultiTourAnnealer, Plan};

/// A committed plan and its cost.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanOutcome {
    pub plan: Plan,
    pub cost: f64,
    /// The frozen unvisited set the plan covers.
    pub unvisited: Vec<NodeId>,
}

pub struct Planner<'a> {
    config: &'a EngineConfig,
    field: &'a StarField,
    table: &'a DistanceTable,
}

impl<'a> Planner<'a> {
    pub fn new(config: &'a EngineConfig, field: &'a StarField, table: &'a DistanceTable) -> Self {
        Self { config, field, table }
    }

    /// Plan within the configured wall-clock budget.
    pub fn commit(&self, anchors: &[NodeId], unvisited: &[NodeId], rng: &mut SimRng) -> PlanOutcome {
        let mut total = Deadline::after(self.config.planning_budget());
        let mut construction = total.share(self.config.construction_share);
        self.commit_with(anchors, unvisited, &mut construction, &mut total, rng)
    }

    /// Plan with explicit budgets for the two phases.
    pub fn commit_with(
        &self,
        anchors: &[NodeId],
        unvisited: &[NodeId],
        construction: &mut impl Budget,
        search: &mut impl Budget,
        rng: &mut SimRng,
    ) -> PlanOutcome {
        let mut tours: Vec<Vec<NodeId>> = vec![Vec::new(); anchors.len()];
        if anchors.is_empty() || unvisited.is_empty() {
            return PlanOutcome { plan: Plan::new(tours), cost: 0.0, unvisited: unvisited.to_vec() };
        }

        let closed = construct(self.config.strategy, unvisited, self.table, self.field, construction, rng);
        let owner = self.closest_anchor(anchors, unvisited);
        tours[owner] = anchor_tour(anchors[owner], &closed, self.table);

        let params = AnnealParams::from_config(self.config);
        let sa = MultiTourAnnealer::new(self.table, params);
        let tours = sa.optimize(anchors, tours, search, rng);

        let plan = Plan::new(tours);
        debug_assert!(plan.validate_for(unvisited, anchors.len()).is_ok(), "plan is not a partition");
        let cost = plan.cost(anchors, self.table);
        PlanOutcome { plan, cost, unvisited: unvisited.to_vec() }
    }

    /// Index of the anchor closest to any node of `nodes`; first wins ties.
    fn closest_anchor(&self, anchors: &[NodeId], nodes: &[NodeId]) -> usize {
        let mut best = (0usize, f64::INFINITY);
        for (i, &a) in anchors.iter().enumerate() {
            let row = self.table.row(a);
            let d = nodes.iter().map(|n| row[n.index()]).fold(f64::INFINITY, f64::min);
            if d < best.1 {
                best = (i, d);
            }
        }
        best.0
    }
}
