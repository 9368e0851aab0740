//! The `Engine` struct and its turn loop.

use st_core::{AgentId, EngineConfig, Mount, NodeId, Point, SimRng};
use st_spatial::{DistanceTable, StarField};
use st_tour::Plan;

use crate::{
    EngineError, EngineResult, EngineState, HitchhikePolicy, Mode, PlanOutcome, Planner, Ship,
    TurnContext, TurnSnapshot, Ufo,
};

/// The decision engine for one game.
///
/// Built once from the star field, then fed one [`TurnSnapshot`] per turn
/// through [`make_moves`](Self::make_moves).  Owns all mutable state; the
/// star field and distance table are read-only after construction.
pub struct Engine {
    config: EngineConfig,
    field: StarField,
    table: DistanceTable,
    policy: HitchhikePolicy,
    state: EngineState,
    ships: Vec<Ship>,
    ufos: Vec<Ufo>,
    rng: SimRng,
    committed: Option<PlanOutcome>,
}

impl Engine {
    /// Build an engine for `points`.  Fails on an empty field or an invalid
    /// configuration.
    pub fn new(config: EngineConfig, points: Vec<Point>) -> EngineResult<Engine> {
        config.validate()?;
        if points.is_empty() {
            return Err(EngineError::EmptyField);
        }
        let field = StarField::from_points(points)?;
        Ok(Self::with_field(config, field))
    }

    /// Build from the flat `x0 y0 x1 y1 …` wire form.
    pub fn from_flat(config: EngineConfig, coords: &[i32]) -> EngineResult<Engine> {
        config.validate()?;
        let field = StarField::from_flat(coords)?;
        if field.is_empty() {
            return Err(EngineError::EmptyField);
        }
        Ok(Self::with_field(config, field))
    }

    fn with_field(config: EngineConfig, field: StarField) -> Engine {
        let table = DistanceTable::from_field(&field);
        let state = EngineState::new(field.len(), config.initial_budget(field.len()));
        tracing::info!(
            stars = field.len(),
            turn_budget = state.initial_budget,
            strategy = %config.strategy,
            "engine ready"
        );
        Engine {
            policy: HitchhikePolicy::from_config(&config),
            rng: SimRng::new(config.seed),
            config,
            field,
            table,
            state,
            ships: Vec::new(),
            ufos: Vec::new(),
            committed: None,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    #[inline]
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    #[inline]
    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    #[inline]
    pub fn ufos(&self) -> &[Ufo] {
        &self.ufos
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[inline]
    pub fn field(&self) -> &StarField {
        &self.field
    }

    #[inline]
    pub fn table(&self) -> &DistanceTable {
        &self.table
    }

    /// Everything the one-shot planner produced, once it has run.
    pub fn outcome(&self) -> Option<&PlanOutcome> {
        self.committed.as_ref()
    }

    /// The plan committed at the mode switch, if it has happened.
    pub fn plan(&self) -> Option<&Plan> {
        self.committed.as_ref().map(|c| &c.plan)
    }

    /// Cost of the committed plan, measured from the ships' positions at
    /// commit time.
    pub fn plan_cost(&self) -> Option<f64> {
        self.committed.as_ref().map(|c| c.cost)
    }

    // ── Turn processing ───────────────────────────────────────────────────

    /// Decide one target node per ship for this turn.
    ///
    /// The result always has exactly `snapshot.ships.len()` entries, each a
    /// valid node id.
    pub fn make_moves(&mut self, snapshot: &TurnSnapshot) -> Vec<NodeId> {
        self.state.turn = self.state.turn.next();
        self.sync_ufos(snapshot);
        self.sync_ships(snapshot);

        if self.state.should_plan(self.config.safety_margin_turns) {
            self.switch_to_executing();
        }

        let moves = match self.state.mode {
            Mode::Hitchhiking => {
                let ctx = TurnContext::new(self.state.turn, &self.field, &self.table, &self.state);
                self.policy.decide(&ctx, &mut self.ships, &mut self.ufos)
            }
            Mode::Executing => self.execute(),
        };

        let n = self.field.len();
        let mut out = Vec::with_capacity(self.ships.len());
        for (i, (ship, mv)) in self.ships.iter_mut().zip(moves).enumerate() {
            let mv = if self.field.contains(mv) {
                mv
            } else {
                let fallback = ship.node.successor(n);
                tracing::warn!(ship = %AgentId(i as u32), target = %mv, %fallback, "invalid move replaced");
                fallback
            };
            ship.next = mv;
            out.push(mv);
        }
        out
    }

    /// Bring the UFO table in line with the snapshot and update statistics.
    fn sync_ufos(&mut self, snapshot: &TurnSnapshot) {
        let count = snapshot.ufos.len();
        if count < self.ufos.len() {
            // Riders of vanished UFOs are on foot again.
            for ship in &mut self.ships {
                if ship.mount.transport().is_some_and(|u| u.index() >= count) {
                    ship.mount = Mount::OnFoot;
                }
            }
            self.ufos.truncate(count);
        }
        let capacity = self.config.ufo_capacity;
        self.ufos.resize_with(count, || Ufo::new(capacity));

        let field = &self.field;
        for (ufo, seen) in self.ufos.iter_mut().zip(&snapshot.ufos) {
            let current = checked(field, seen.current);
            if current.is_valid() && ufo.current.is_valid() && current != ufo.current {
                ufo.distance += self.table.get(ufo.current, current);
                ufo.visits += 1;
            }
            ufo.current = current;
            ufo.next = checked(field, seen.next);
            ufo.next_next = checked(field, seen.next_next);
        }
    }

    /// Record ship positions, mark stars visited and drop stale mounts.
    fn sync_ships(&mut self, snapshot: &TurnSnapshot) {
        let count = snapshot.ships.len();
        if count < self.ships.len() {
            for ship in &self.ships[count..] {
                if let Some(ufo) = ship.mount.transport().and_then(|u| self.ufos.get_mut(u.index())) {
                    ufo.occupants = ufo.occupants.saturating_sub(1);
                }
            }
            self.ships.truncate(count);
        }
        self.ships.resize_with(count, Ship::default);

        for (ship, &seen) in self.ships.iter_mut().zip(&snapshot.ships) {
            let node = checked(&self.field, seen);
            ship.node = node;
            self.state.mark_visited(node);

            // A rider that is not where its UFO is has been left behind.
            if let Some(u) = ship.mount.transport() {
                match self.ufos.get_mut(u.index()) {
                    Some(ufo) if ufo.current == node => {}
                    Some(ufo) => {
                        ufo.occupants = ufo.occupants.saturating_sub(1);
                        ship.mount = Mount::OnFoot;
                    }
                    None => ship.mount = Mount::OnFoot,
                }
            }
        }
    }

    /// Fire the one-shot planning and hand each ship its tour.
    fn switch_to_executing(&mut self) {
        self.state.planning_triggered = true;
        self.state.mode = Mode::Executing;
        for ship in &mut self.ships {
            ship.mount = Mount::OnFoot;
        }
        for ufo in &mut self.ufos {
            ufo.occupants = 0;
        }

        let unvisited = self.state.unvisited();
        // Ships with no known position plan from star 0.
        let anchors: Vec<NodeId> = self
            .ships
            .iter()
            .map(|s| if s.node.is_valid() { s.node } else { NodeId(0) })
            .collect();

        let planner = Planner::new(&self.config, &self.field, &self.table);
        let outcome = planner.commit(&anchors, &unvisited, &mut self.rng);

        for (ship, tour) in self.ships.iter_mut().zip(&outcome.plan.tours) {
            ship.tour = tour.iter().copied().collect();
        }
        tracing::info!(
            turn = %self.state.turn,
            unvisited = unvisited.len(),
            remaining_turns = self.state.remaining_turns(),
            ships = anchors.len(),
            cost = outcome.cost,
            "switching to tour execution"
        );
        self.committed = Some(outcome);
    }

    /// Pop each ship's next planned star; ships with nothing left stay put.
    fn execute(&mut self) -> Vec<NodeId> {
        let state = &self.state;
        self.ships
            .iter_mut()
            .map(|ship| match ship.tour.pop_front() {
                Some(next) => {
                    debug_assert!(!state.is_visited(next), "tour revisits {next}");
                    next
                }
                None => ship.node,
            })
            .collect()
    }
}

/// `id` if it names a star of `field`, else `INVALID`.
#[inline]
fn checked(field: &StarField, id: NodeId) -> NodeId {
    if field.contains(id) { id } else { NodeId::INVALID }
}
