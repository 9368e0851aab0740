//! The `Sim` struct and its turn loop.

use std::fmt;

use st_core::{EngineConfig, NodeId, SimRng, Turn};
use st_engine::{Engine, Mode, TurnSnapshot, UfoSighting};
use st_spatial::DistanceTable;

use crate::scenario::next_stop;
use crate::{Scenario, SimError, SimObserver, SimResult};

/// Energy multiplier per UFO a ship travels with.
const RIDE_DISCOUNT: f64 = 0.001;

// ── Reports ───────────────────────────────────────────────────────────────────

/// What happened in one turn.
#[derive(Clone, Debug, PartialEq)]
pub struct TurnSummary {
    pub turn: Turn,
    pub mode: Mode,
    pub unvisited: usize,
    /// Cumulative energy spent so far.
    pub energy: f64,
    /// Ships that travelled with at least one UFO this turn.
    pub riding: usize,
}

/// Result of a full run.
#[derive(Clone, Debug, PartialEq)]
pub struct SimReport {
    pub turns: u32,
    pub visited: usize,
    pub star_count: usize,
    pub energy: f64,
    pub all_visited: bool,
    /// Turn on which the engine switched to tour execution, if it did.
    pub switched_at: Option<Turn>,
    pub plan_cost: Option<f64>,
}

impl fmt::Display for SimReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "turns:        {}", self.turns)?;
        writeln!(f, "visited:      {} / {}", self.visited, self.star_count)?;
        writeln!(f, "all visited:  {}", self.all_visited)?;
        writeln!(f, "energy:       {:.3}", self.energy)?;
        match self.switched_at {
            Some(t) => writeln!(f, "switched at:  {t}")?,
            None    => writeln!(f, "switched at:  never")?,
        }
        match self.plan_cost {
            Some(c) => write!(f, "plan cost:    {c:.3}"),
            None    => write!(f, "plan cost:    -"),
        }
    }
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// Offline game loop around one [`Engine`].
///
/// Each turn:
///
/// 1. Build a snapshot from the UFO and ship positions and ask the engine
///    for moves.
/// 2. Validate the moves (one per ship, each a star).
/// 3. Charge energy: `d(a, b)` for a ship moving `a → b`, times
///    `RIDE_DISCOUNT` for every UFO also moving `a → b` with a free seat.
///    Seats go to ships in ship order.
/// 4. Move ships, mark stars visited, advance UFOs one stop.
pub struct Sim {
    scenario: Scenario,
    table: DistanceTable,
    engine: Engine,
    ships: Vec<NodeId>,
    ufos: Vec<UfoSighting>,
    visited: Vec<bool>,
    visited_count: usize,
    energy: f64,
    turn: Turn,
    switched_at: Option<Turn>,
    rng: SimRng,
}

impl Sim {
    /// The engine's `turn_factor` and `ufo_capacity` are overridden by the
    /// scenario's so both sides play by the same rules.
    pub fn new(scenario: Scenario, mut engine_config: EngineConfig) -> SimResult<Sim> {
        scenario.config.validate()?;
        engine_config.turn_factor = scenario.config.turn_factor;
        engine_config.ufo_capacity = scenario.config.ufo_capacity;
        let engine = Engine::new(engine_config, scenario.stars.clone())?;
        let table = DistanceTable::build(&scenario.stars);

        let mut visited = vec![false; scenario.stars.len()];
        let mut visited_count = 0;
        for s in &scenario.ships {
            if !visited[s.index()] {
                visited[s.index()] = true;
                visited_count += 1;
            }
        }

        let mut root = SimRng::new(scenario.config.seed);
        Ok(Sim {
            ships: scenario.ships.clone(),
            ufos: scenario.ufos.clone(),
            rng: root.child(2),
            scenario,
            table,
            engine,
            visited,
            visited_count,
            energy: 0.0,
            turn: Turn::ZERO,
            switched_at: None,
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    #[inline]
    pub fn ships(&self) -> &[NodeId] {
        &self.ships
    }

    #[inline]
    pub fn ufos(&self) -> &[UfoSighting] {
        &self.ufos
    }

    #[inline]
    pub fn turn(&self) -> Turn {
        self.turn
    }

    #[inline]
    pub fn energy(&self) -> f64 {
        self.energy
    }

    #[inline]
    pub fn all_visited(&self) -> bool {
        self.visited_count == self.visited.len()
    }

    /// `true` once the turn limit is reached or every star is visited.
    pub fn is_finished(&self) -> bool {
        self.all_visited() || self.turn.0 >= self.scenario.config.turn_limit()
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Play until every star is visited or the turn limit is reached.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<SimReport> {
        while !self.is_finished() {
            observer.on_turn_start(self.turn.next());
            let summary = self.step()?;
            observer.on_turn_end(&summary);
        }
        let report = self.report();
        tracing::info!(
            turns = report.turns,
            visited = report.visited,
            stars = report.star_count,
            energy = report.energy,
            "simulation finished"
        );
        observer.on_sim_end(&report);
        Ok(report)
    }

    /// Play exactly one turn.
    pub fn step(&mut self) -> SimResult<TurnSummary> {
        self.turn = self.turn.next();
        let snapshot = TurnSnapshot::new(self.ufos.clone(), self.ships.clone());
        let moves = self.engine.make_moves(&snapshot);
        self.validate(&moves)?;

        if self.switched_at.is_none() && self.engine.mode() == Mode::Executing {
            self.switched_at = Some(self.turn);
        }

        let riding = self.charge(&moves);
        for &m in &moves {
            if !self.visited[m.index()] {
                self.visited[m.index()] = true;
                self.visited_count += 1;
            }
        }
        self.ships = moves;
        self.advance_ufos();

        Ok(TurnSummary {
            turn: self.turn,
            mode: self.engine.mode(),
            unvisited: self.visited.len() - self.visited_count,
            energy: self.energy,
            riding,
        })
    }

    pub fn report(&self) -> SimReport {
        SimReport {
            turns: self.turn.0,
            visited: self.visited_count,
            star_count: self.visited.len(),
            energy: self.energy,
            all_visited: self.all_visited(),
            switched_at: self.switched_at,
            plan_cost: self.engine.plan_cost(),
        }
    }

    // ── Turn phases ───────────────────────────────────────────────────────

    pub(crate) fn validate(&self, moves: &[NodeId]) -> SimResult<()> {
        if moves.len() != self.ships.len() {
            return Err(SimError::MoveCountMismatch { expected: self.ships.len(), got: moves.len() });
        }
        if let Some((ship, &target)) = moves.iter().enumerate().find(|(_, m)| m.index() >= self.visited.len()) {
            return Err(SimError::InvalidMove { ship, target });
        }
        Ok(())
    }

    /// Add this turn's energy.  Returns how many ships got a ride discount.
    pub(crate) fn charge(&mut self, moves: &[NodeId]) -> usize {
        let mut seats: Vec<u32> = vec![self.scenario.config.ufo_capacity; self.ufos.len()];
        let mut riding = 0;
        for (&from, &to) in self.ships.iter().zip(moves) {
            if from == to {
                continue;
            }
            let mut cost = self.table.get(from, to);
            let mut discounted = false;
            for (ufo, free) in self.ufos.iter().zip(seats.iter_mut()) {
                if ufo.current == from && ufo.next == to && *free > 0 {
                    *free -= 1;
                    cost *= RIDE_DISCOUNT;
                    discounted = true;
                }
            }
            riding += discounted as usize;
            self.energy += cost;
        }
        riding
    }

    fn advance_ufos(&mut self) {
        let candidates = self.scenario.config.ufo_candidates;
        for ufo in &mut self.ufos {
            let after = next_stop(&self.scenario.stars, ufo.next_next, candidates, &mut self.rng);
            *ufo = UfoSighting::new(ufo.next, ufo.next_next, after);
        }
    }
}
