//! `st-core`: foundational types for the star-traveller planner.
//!
//! This crate is a dependency of every other `st-*` crate.  It has no `st-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                              |
//! |--------------|-------------------------------------------------------|
//! | [`ids`]      | `NodeId`, `AgentId`, `TransportId`                    |
//! | [`geo`]      | `Point`, Euclidean distance                           |
//! | [`time`]     | `Turn`, `Budget`, `Deadline`, `PollBudget`            |
//! | [`rng`]      | `SimRng`                                              |
//! | [`mount`]    | `Mount` (on foot / riding a transport)                |
//! | [`config`]   | `EngineConfig`, `Strategy`                            |
//! | [`error`]    | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids, points and config.  |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod mount;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{EngineConfig, Strategy};
pub use error::{CoreError, CoreResult};
pub use geo::Point;
pub use ids::{AgentId, NodeId, TransportId};
pub use mount::Mount;
pub use rng::SimRng;
pub use time::{Budget, Deadline, PollBudget, Turn};
