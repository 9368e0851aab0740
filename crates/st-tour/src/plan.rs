//! A committed multi-agent plan.

use rustc_hash::FxHashSet;

use st_core::NodeId;
use st_spatial::DistanceTable;

use crate::cost::path_length;
use crate::{TourError, TourResult};

/// One ordered tour per agent, in agent order.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Plan {
    pub tours: Vec<Vec<NodeId>>,
}

impl Plan {
    pub fn new(tours: Vec<Vec<NodeId>>) -> Self {
        Self { tours }
    }

    #[inline]
    pub fn agent_count(&self) -> usize {
        self.tours.len()
    }

    /// Total nodes across all tours.
    pub fn node_count(&self) -> usize {
        self.tours.iter().map(Vec::len).sum()
    }

    /// Check that the tours partition `expected`: every expected node appears
    /// in exactly one tour exactly once, and nothing else appears.
    pub fn validate(&self, expected: &[NodeId]) -> TourResult<()> {
        let wanted: FxHashSet<NodeId> = expected.iter().copied().collect();
        let mut seen: FxHashSet<NodeId> = FxHashSet::default();
        for &n in self.tours.iter().flatten() {
            if !wanted.contains(&n) {
                return Err(TourError::Unexpected(n));
            }
            if !seen.insert(n) {
                return Err(TourError::Duplicate(n));
            }
        }
        if let Some(&missing) = expected.iter().find(|n| !seen.contains(n)) {
            return Err(TourError::Missing(missing));
        }
        Ok(())
    }

    /// As [`validate`](Self::validate), also requiring one tour per agent.
    pub fn validate_for(&self, expected: &[NodeId], agents: usize) -> TourResult<()> {
        if self.tours.len() != agents {
            return Err(TourError::AgentMismatch { tours: self.tours.len(), agents });
        }
        self.validate(expected)
    }

    /// Sum of open path lengths, each starting from the matching anchor.
    pub fn cost(&self, anchors: &[NodeId], table: &DistanceTable) -> f64 {
        anchors
            .iter()
            .zip(&self.tours)
            .map(|(&s, t)| path_length(s, t, table))
            .sum()
    }
}
