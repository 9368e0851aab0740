//! The hitchhiking policy.
//!
//! While hitchhiking, ships only move by riding UFOs (or walking to meet
//! one at its next stop).  Each turn:
//!
//! 1. **Ride off**: a ship leaves its UFO when the UFO is shuttling back
//!    over visited stars, or when no unvisited star lies within
//!    `nearby_radius` of any of its three known stops.
//! 2. **Board**: each UFO with a free seat takes the unmounted ship with the
//!    cheapest boarding cost (zero when the ship already shares the UFO's
//!    star, otherwise the walk to the UFO's next stop), provided that cost is
//!    within the change line and riding strictly beats walking: boarding
//!    cost plus the gap from the UFO's stop after next to the nearest
//!    unvisited star must be less than the ship's own gap to the nearest
//!    unvisited star.
//! 3. **Move**: mounted ships target their UFO's next stop; everyone else
//!    stays where they are.

use st_core::{EngineConfig, Mount, NodeId, Turn};
use st_spatial::{DistanceTable, StarField};

use crate::{EngineState, Ship, Ufo};

// ── TurnContext ───────────────────────────────────────────────────────────────

/// Read-only view of the world for one turn's decisions.
pub struct TurnContext<'a> {
    pub turn: Turn,
    pub field: &'a StarField,
    pub table: &'a DistanceTable,
    pub state: &'a EngineState,
}

impl<'a> TurnContext<'a> {
    #[inline]
    pub fn new(turn: Turn, field: &'a StarField, table: &'a DistanceTable, state: &'a EngineState) -> Self {
        Self { turn, field, table, state }
    }

    /// Distance from `from` to the closest unvisited star, or `None` when
    /// everything is visited.
    pub fn nearest_unvisited_distance(&self, from: NodeId) -> Option<f64> {
        let state = self.state;
        self.field
            .nearest_matching(self.field.pos(from), |n| !state.is_visited(n))
            .map(|n| self.table.get(from, n))
    }

    /// `true` if an unvisited star lies within `radius` of `at`.
    pub fn unvisited_near(&self, at: NodeId, radius: f64) -> bool {
        let state = self.state;
        self.field.any_within(self.field.pos(at), radius, |n| !state.is_visited(n))
    }
}

// ── HitchhikePolicy ───────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct HitchhikePolicy {
    pub change_line_early: f64,
    pub change_line_late: f64,
    pub early_game_turns: u32,
    pub nearby_radius: f64,
}

impl Default for HitchhikePolicy {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl HitchhikePolicy {
    pub fn from_config(cfg: &EngineConfig) -> Self {
        Self {
            change_line_early: cfg.change_line_early,
            change_line_late:  cfg.change_line_late,
            early_game_turns:  cfg.early_game_turns,
            nearby_radius:     cfg.nearby_radius,
        }
    }

    /// Maximum boarding cost at `turn` for a fleet of `ship_count` ships.
    ///
    /// Wider after the early game and narrower for larger fleets, where a
    /// closer ship is usually available.
    pub fn change_line(&self, turn: Turn, ship_count: usize) -> f64 {
        let base = if turn.0 <= self.early_game_turns {
            self.change_line_early
        } else {
            self.change_line_late
        };
        base / (ship_count.max(1) as f64).sqrt()
    }

    /// Cost for `ship` to join `ufo` this turn, or `None` if it cannot.
    pub fn boarding_cost(ship: &Ship, ufo: &Ufo, table: &DistanceTable) -> Option<f64> {
        if !ship.node.is_valid() || !ufo.is_placed() {
            return None;
        }
        if ship.node == ufo.current {
            Some(0.0)
        } else {
            Some(table.get(ship.node, ufo.next))
        }
    }

    /// Whether riders should leave `ufo` now.
    pub fn should_ride_off(&self, ufo: &Ufo, ctx: &TurnContext<'_>) -> bool {
        if !ufo.is_placed() {
            return true;
        }
        let shuttling = ctx.state.is_visited(ufo.next)
            && (ufo.next == ufo.current || ufo.next_next == ufo.current);
        if shuttling {
            return true;
        }
        let r = self.nearby_radius;
        !(ctx.unvisited_near(ufo.current, r)
            || ctx.unvisited_near(ufo.next, r)
            || ctx.unvisited_near(ufo.next_next, r))
    }

    /// Decide this turn's moves for every ship, updating mounts and UFO
    /// occupancy.  Returns one target per ship, in ship order.
    pub fn decide(&self, ctx: &TurnContext<'_>, ships: &mut [Ship], ufos: &mut [Ufo]) -> Vec<NodeId> {
        // ── Ride off ──────────────────────────────────────────────────────
        for ship in ships.iter_mut() {
            let Mount::Riding(u) = ship.mount else { continue };
            match ufos.get_mut(u.index()) {
                Some(ufo) if !self.should_ride_off(ufo, ctx) => {}
                Some(ufo) => {
                    ufo.occupants = ufo.occupants.saturating_sub(1);
                    ship.mount = Mount::OnFoot;
                    tracing::trace!(ship = %ship.node, ufo = %u, "ride off");
                }
                None => ship.mount = Mount::OnFoot,
            }
        }

        // ── Board ─────────────────────────────────────────────────────────
        let line = self.change_line(ctx.turn, ships.len());
        for (u, ufo) in ufos.iter_mut().enumerate() {
            if !ufo.is_placed() || !ufo.has_seat() || self.should_ride_off(ufo, ctx) {
                continue;
            }
            let Some(gap_after_ride) = ctx.nearest_unvisited_distance(ufo.next_next) else {
                continue;
            };
            while ufo.has_seat() {
                let mut pick: Option<(usize, f64)> = None;
                for (s, ship) in ships.iter().enumerate() {
                    if ship.mount.is_riding() {
                        continue;
                    }
                    let Some(cost) = Self::boarding_cost(ship, ufo, ctx.table) else { continue };
                    if cost <= line && pick.is_none_or(|(_, best)| cost < best) {
                        pick = Some((s, cost));
                    }
                }
                let Some((s, cost)) = pick else { break };
                let gap_on_foot = ctx.nearest_unvisited_distance(ships[s].node).unwrap_or(f64::INFINITY);
                if cost + gap_after_ride >= gap_on_foot {
                    break;
                }
                let id = st_core::TransportId(u as u32);
                ships[s].mount = Mount::Riding(id);
                ufo.occupants += 1;
                tracing::trace!(ship = s, ufo = %id, cost, "board");
            }
        }

        // ── Move ──────────────────────────────────────────────────────────
        ships
            .iter()
            .map(|ship| match ship.mount.transport().and_then(|u| ufos.get(u.index())) {
                Some(ufo) if ufo.next.is_valid() => ufo.next,
                _ => ship.node,
            })
            .collect()
    }
}
