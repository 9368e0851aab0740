//! `st-sim`: a local stand-in for the game server.
//!
//! Generates a random scenario, moves the UFOs, feeds the engine one
//! snapshot per turn, applies its moves and charges energy the way the game
//! does.  Used by the `traveller simulate` command and by end-to-end tests.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`scenario`] | `ScenarioConfig`, `Scenario::generate`                    |
//! | [`sim`]      | `Sim` (turn loop), `SimReport`, `TurnSummary`             |
//! | [`observer`] | `SimObserver` trait, `NoopObserver`                       |
//! | [`trace`]    | `CsvTraceWriter` (per-turn CSV rows)                      |
//! | [`error`]    | `SimError`, `SimResult<T>`                                |

pub mod error;
pub mod observer;
pub mod scenario;
pub mod sim;
pub mod trace;


pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use scenario::{Scenario, ScenarioConfig};
pub use sim::{Sim, SimReport, TurnSummary};
pub use trace::CsvTraceWriter;
