//! Mutable engine state: ships, UFOs, visited flags and the mode machine.
//!
//! Ships and UFOs live in plain `Vec`s indexed by `AgentId` / `TransportId`
//! (snapshot order).  A ship refers to the UFO it rides by id only; the UFO
//! counts its occupants.

use std::collections::VecDeque;

use st_core::{Mount, NodeId, Turn};

// ── Mode ──────────────────────────────────────────────────────────────────────

/// The engine's top-level behaviour.  Starts in `Hitchhiking` and moves to
/// `Executing` at most once; there is no way back.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    #[default]
    Hitchhiking,
    Executing,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Hitchhiking => "hitchhiking",
            Mode::Executing   => "executing",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Ship ──────────────────────────────────────────────────────────────────────

/// One controllable ship.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Ship {
    /// Position reported by the latest snapshot.
    pub node: NodeId,
    /// Target issued last turn (`INVALID` before the first move).
    pub next: NodeId,
    pub mount: Mount,
    /// Remaining planned visits, consumed from the front.
    pub tour: VecDeque<NodeId>,
}

impl Ship {
    pub fn at(node: NodeId) -> Self {
        Self { node, ..Self::default() }
    }
}

// ── Ufo ───────────────────────────────────────────────────────────────────────

/// One externally driven UFO and its running statistics.
#[derive(Clone, Debug, PartialEq)]
pub struct Ufo {
    pub current: NodeId,
    pub next: NodeId,
    pub next_next: NodeId,
    pub capacity: u32,
    /// Our ships riding or walking to meet it.
    pub occupants: u32,
    /// Total distance covered since first sighted.
    pub distance: f64,
    /// Number of moves observed.
    pub visits: u32,
}

impl Ufo {
    pub fn new(capacity: u32) -> Self {
        Self {
            current: NodeId::INVALID,
            next: NodeId::INVALID,
            next_next: NodeId::INVALID,
            capacity,
            occupants: 0,
            distance: 0.0,
            visits: 0,
        }
    }

    #[inline]
    pub fn has_seat(&self) -> bool {
        self.occupants < self.capacity
    }

    /// `true` once all three stops are known.
    #[inline]
    pub fn is_placed(&self) -> bool {
        self.current.is_valid() && self.next.is_valid() && self.next_next.is_valid()
    }
}

// ── EngineState ───────────────────────────────────────────────────────────────

/// Counters and flags that drive the mode machine.
#[derive(Clone, Debug)]
pub struct EngineState {
    pub turn: Turn,
    /// Turns available for the whole game (`turn_factor × star_count`).
    pub initial_budget: u32,
    pub remaining_unvisited: usize,
    pub mode: Mode,
    pub planning_triggered: bool,
    visited: Vec<bool>,
}

impl EngineState {
    pub fn new(star_count: usize, initial_budget: u32) -> Self {
        Self {
            turn: Turn::ZERO,
            initial_budget,
            remaining_unvisited: star_count,
            mode: Mode::Hitchhiking,
            planning_triggered: false,
            visited: vec![false; star_count],
        }
    }

    #[inline]
    pub fn is_visited(&self, node: NodeId) -> bool {
        self.visited.get(node.index()).copied().unwrap_or(false)
    }

    /// Mark `node` visited.  Returns `true` the first time.
    pub fn mark_visited(&mut self, node: NodeId) -> bool {
        match self.visited.get_mut(node.index()) {
            Some(v) if !*v => {
                *v = true;
                self.remaining_unvisited -= 1;
                true
            }
            _ => false,
        }
    }

    #[inline]
    pub fn visited(&self) -> &[bool] {
        &self.visited
    }

    /// Unvisited stars in id order.
    pub fn unvisited(&self) -> Vec<NodeId> {
        self.visited
            .iter()
            .enumerate()
            .filter(|&(_, &v)| !v)
            .map(|(i, _)| NodeId(i as u32))
            .collect()
    }

    /// Turns left including the current one.
    #[inline]
    pub fn remaining_turns(&self) -> u32 {
        self.initial_budget.saturating_sub(self.turn.0.saturating_sub(1))
    }

    /// Whether the one-shot planning should fire now.
    pub fn should_plan(&self, safety_margin: u32) -> bool {
        !self.planning_triggered
            && self.remaining_unvisited > 0
            && self.remaining_unvisited as u64 + safety_margin as u64 > self.remaining_turns() as u64
    }
}
