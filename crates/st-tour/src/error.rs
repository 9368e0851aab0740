//! Tour-subsystem error type.

use thiserror::Error;

use st_core::NodeId;

/// Errors produced by plan validation.
#[derive(Debug, Error, PartialEq)]
pub enum TourError {
    #[error("{0} appears more than once in the plan")]
    Duplicate(NodeId),

    #[error("{0} is not in the set being planned")]
    Unexpected(NodeId),

    #[error("{0} is assigned to no tour")]
    Missing(NodeId),

    #[error("plan has {tours} tours for {agents} agents")]
    AgentMismatch { tours: usize, agents: usize },
}

pub type TourResult<T> = Result<T, TourError>;
