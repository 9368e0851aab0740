//! Simulation observer trait for progress reporting and data collection.

use st_core::Turn;

use crate::{SimReport, TurnSummary};

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] around every turn.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct Progress;
///
/// impl SimObserver for Progress {
///     fn on_turn_end(&mut self, summary: &TurnSummary) {
///         if summary.turn.0 % 100 == 0 {
///             eprintln!("{}: {} stars left", summary.turn, summary.unvisited);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called before the engine sees the turn's snapshot.
    fn on_turn_start(&mut self, _turn: Turn) {}

    /// Called after moves are applied and the UFOs have advanced.
    fn on_turn_end(&mut self, _summary: &TurnSummary) {}

    /// Called once after the last turn.
    fn on_sim_end(&mut self, _report: &SimReport) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
