//! Engine configuration.
//!
//! Every tuning constant of the planner lives in [`EngineConfig`].  None of
//! them is part of the engine's contract: they trade planning quality against
//! time and can be changed per run from a JSON file or command-line flags.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::{CoreError, CoreResult};

// ── Strategy ──────────────────────────────────────────────────────────────────

/// Which constructor produces the warm-start tour handed to local search.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Strategy {
    /// Multi-start greedy nearest neighbour.
    NearestNeighbor,
    /// Multi-start farthest insertion with cheapest-position insertion.
    #[default]
    FarthestInsertion,
    /// k-means regions visited in nearest-centroid order.
    KMeansBootstrap,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [
        Strategy::NearestNeighbor,
        Strategy::FarthestInsertion,
        Strategy::KMeansBootstrap,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::NearestNeighbor   => "nearest_neighbor",
            Strategy::FarthestInsertion => "farthest_insertion",
            Strategy::KMeansBootstrap   => "kmeans_bootstrap",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Strategy> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "nearest_neighbor" | "nn"      => Ok(Strategy::NearestNeighbor),
            "farthest_insertion" | "fi"    => Ok(Strategy::FarthestInsertion),
            "kmeans_bootstrap" | "kmeans"  => Ok(Strategy::KMeansBootstrap),
            other => Err(CoreError::Parse(format!("unknown strategy `{other}`"))),
        }
    }
}

// ── EngineConfig ──────────────────────────────────────────────────────────────

/// Tuning constants for one engine instance.
///
/// Typically built with `EngineConfig::default()` and a few overrides, or
/// loaded from JSON by the application crate (with the `serde` feature).
/// Missing JSON fields fall back to their defaults.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Master RNG seed.  The same seed and inputs always produce the same moves.
    pub seed: u64,

    /// The turn allowance is `turn_factor × star_count`.
    pub turn_factor: u32,

    /// Planning triggers once `unvisited + safety_margin_turns` exceeds the
    /// turns remaining.
    pub safety_margin_turns: u32,

    /// Total wall-clock budget for the one-off planning call.
    pub planning_budget_ms: u64,

    /// Fraction of the planning budget spent in tour construction; local
    /// search gets the rest.
    pub construction_share: f64,

    pub strategy: Strategy,

    // ── Simulated annealing ───────────────────────────────────────────────
    pub initial_temperature: f64,
    /// Geometric cooling factor applied every iteration.
    pub cooling: f64,
    /// Temperature never drops below this.
    pub min_temperature: f64,
    /// Boltzmann constant `k` in `exp(-Δ / (k·T))`.
    pub boltzmann: f64,
    /// Iterations between budget polls.
    pub check_interval: u32,

    // ── Hitchhiking ───────────────────────────────────────────────────────
    /// Seats per UFO.
    pub ufo_capacity: u32,
    /// Boarding threshold (max walk to a UFO's next stop) in the early game.
    pub change_line_early: f64,
    /// Boarding threshold after the early game.
    pub change_line_late: f64,
    pub early_game_turns: u32,
    /// A UFO is worth riding while an unvisited star lies within this radius
    /// of one of its three known stops.
    pub nearby_radius: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed:                1,
            turn_factor:         4,
            safety_margin_turns: 2,
            planning_budget_ms:  5_000,
            construction_share:  0.2,
            strategy:            Strategy::FarthestInsertion,
            initial_temperature: 2_000.0,
            cooling:             0.999,
            min_temperature:     0.5,
            boltzmann:           1.0,
            check_interval:      256,
            ufo_capacity:        1,
            change_line_early:   40.0,
            change_line_late:    120.0,
            early_game_turns:    100,
            nearby_radius:       40.0,
        }
    }
}

impl EngineConfig {
    /// Reject values that would make the planner misbehave.
    pub fn validate(&self) -> CoreResult<()> {
        if self.turn_factor == 0 {
            return Err(CoreError::Config("turn_factor must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.construction_share) {
            return Err(CoreError::Config(format!(
                "construction_share {} outside [0, 1]",
                self.construction_share
            )));
        }
        if !(self.cooling > 0.0 && self.cooling <= 1.0) {
            return Err(CoreError::Config(format!("cooling {} outside (0, 1]", self.cooling)));
        }
        if !(self.initial_temperature > 0.0) || !(self.min_temperature > 0.0) {
            return Err(CoreError::Config("temperatures must be positive".into()));
        }
        if !(self.boltzmann > 0.0) {
            return Err(CoreError::Config("boltzmann must be positive".into()));
        }
        if self.check_interval == 0 {
            return Err(CoreError::Config("check_interval must be at least 1".into()));
        }
        if self.change_line_early < 0.0 || self.change_line_late < 0.0 || self.nearby_radius < 0.0 {
            return Err(CoreError::Config("distances must be non-negative".into()));
        }
        Ok(())
    }

    /// Total planning budget as a `Duration`.
    #[inline]
    pub fn planning_budget(&self) -> Duration {
        Duration::from_millis(self.planning_budget_ms)
    }

    /// Turns available for a field of `star_count` stars.
    #[inline]
    pub fn initial_budget(&self, star_count: usize) -> u32 {
        (star_count as u64 * self.turn_factor as u64).min(u32::MAX as u64) as u32
    }
}
