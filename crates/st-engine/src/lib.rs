//! `st-engine`: the per-turn decision engine.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`snapshot`] | `TurnSnapshot`, `UfoSighting` (per-turn input)             |
//! | [`state`]    | `Ship`, `Ufo`, `EngineState`, `Mode`                       |
//! | [`policy`]   | `HitchhikePolicy`, `TurnContext`                           |
//! | [`planner`]  | `Planner` (construction + annealing, run once)             |
//! | [`engine`]   | `Engine` (`make_moves`)                                    |
//! | [`error`]    | `EngineError`, `EngineResult<T>`                           |
//!
//! # Turn loop
//!
//! ```text
//! make_moves(snapshot)
//!   1. turn += 1
//!   2. sync UFOs      (positions, distance/visit statistics)
//!   3. sync ships     (positions, visited flags, dismount on mismatch)
//!   4. trigger check  (Hitchhiking → Executing, plan committed once)
//!   5. decide         (hitchhike policy, or pop each ship's tour head)
//!   6. sanitize       (every move is a valid node id)
//! ```
//!
//! `make_moves` never fails: malformed input is logged and patched so the
//! returned move list always has one valid node id per ship.

pub mod engine;
pub mod error;
pub mod planner;
pub mod policy;
pub mod snapshot;
pub mod state;

#[cfg(test)]
mod tests;

pub use engine::Engine;
pub use error::{EngineError, EngineResult};
pub use planner::{PlanOutcome, Planner};
pub use policy::{HitchhikePolicy, TurnContext};
pub use snapshot::{TurnSnapshot, UfoSighting};
pub use state::{EngineState, Mode, Ship, Ufo};
