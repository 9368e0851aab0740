//! Turn counting and planning budgets.
//!
//! # Design
//!
//! Game time is a monotonically increasing `Turn` counter: one turn per call
//! to the engine.  Planning time is wall-clock and self-imposed, expressed as
//! a [`Budget`] that search loops poll every few hundred iterations.
//!
//! Two budget implementations ship here:
//!
//! - [`Deadline`] reads a monotonic clock (`std::time::Instant`).
//! - [`PollBudget`] expires after a fixed number of polls.  Search results
//!   under a `PollBudget` depend only on the seed, which is what tests want.

use std::fmt;
use std::time::{Duration, Instant};

// ── Turn ──────────────────────────────────────────────────────────────────────

/// A game turn counter.  `Turn(0)` is "before the first move"; the engine
/// advances to `Turn(1)` on its first `make_moves` call.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Turn(pub u32);

impl Turn {
    pub const ZERO: Turn = Turn(0);

    #[inline]
    pub fn next(self) -> Turn {
        Turn(self.0 + 1)
    }

    /// Turns elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    pub fn since(self, earlier: Turn) -> u32 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u32> for Turn {
    type Output = Turn;
    #[inline]
    fn add(self, rhs: u32) -> Turn {
        Turn(self.0 + rhs)
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── Budget ────────────────────────────────────────────────────────────────────

/// A source of "stop now" signals for anytime search loops.
///
/// Takes `&mut self` so counting implementations need no interior
/// mutability.  Callers poll at most once per `check_interval` iterations.
pub trait Budget {
    /// `true` once no further work should be started.
    fn expired(&mut self) -> bool;
}

impl<B: Budget + ?Sized> Budget for &mut B {
    #[inline]
    fn expired(&mut self) -> bool {
        (**self).expired()
    }
}

/// Wall-clock budget on the monotonic clock.
#[derive(Copy, Clone, Debug)]
pub struct Deadline {
    start: Instant,
    limit: Duration,
}

impl Deadline {
    /// A deadline `limit` from now.
    pub fn after(limit: Duration) -> Self {
        Self { start: Instant::now(), limit }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::after(Duration::from_millis(ms))
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    #[inline]
    pub fn remaining(&self) -> Duration {
        self.limit.saturating_sub(self.elapsed())
    }

    /// A nested deadline covering `share` of the time still remaining here.
    /// `share` is clamped to `[0, 1]`.
    pub fn share(&self, share: f64) -> Deadline {
        Deadline::after(self.remaining().mul_f64(share.clamp(0.0, 1.0)))
    }
}

impl Budget for Deadline {
    #[inline]
    fn expired(&mut self) -> bool {
        self.start.elapsed() >= self.limit
    }
}

/// Budget that allows exactly `polls` non-expired answers, then expires.
#[derive(Copy, Clone, Debug)]
pub struct PollBudget {
    remaining: u64,
}

impl PollBudget {
    pub fn new(polls: u64) -> Self {
        Self { remaining: polls }
    }

    /// A budget that never expires in practice.
    pub fn unlimited() -> Self {
        Self { remaining: u64::MAX }
    }

    #[inline]
    pub fn remaining(&self) -> u64 {
        self.remaining
    }
}

impl Budget for PollBudget {
    #[inline]
    fn expired(&mut self) -> bool {
        if self.remaining == 0 {
            return true;
        }
        if self.remaining != u64::MAX {
            self.remaining -= 1;
        }
        false
    }
}
