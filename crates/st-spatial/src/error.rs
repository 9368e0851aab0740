//! Spatial-subsystem error type.

use thiserror::Error;

use st_core::CoreError;

/// Errors produced by `st-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("coordinate list has odd length {0}")]
    OddCoordinates(usize),

    #[error("star field is empty")]
    EmptyField,

    #[error("star field of {0} stars exceeds the NodeId range")]
    TooManyStars(usize),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
