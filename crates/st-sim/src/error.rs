use thiserror::Error;

use st_core::NodeId;
use st_engine::EngineError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("scenario configuration error: {0}")]
    Config(String),

    #[error("engine returned {got} moves for {expected} ships")]
    MoveCountMismatch { expected: usize, got: usize },

    #[error("ship {ship} was sent to {target}, which is not a star")]
    InvalidMove { ship: usize, target: NodeId },

    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("trace output error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SimResult<T> = Result<T, SimError>;
