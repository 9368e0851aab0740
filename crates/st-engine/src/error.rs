//! Engine error type.

use thiserror::Error;

use st_core::CoreError;
use st_spatial::SpatialError;

/// Errors produced while building an [`Engine`][crate::Engine].  Turn
/// processing itself is infallible.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("star field is empty")]
    EmptyField,

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Spatial(#[from] SpatialError),
}

pub type EngineResult<T> = Result<T, EngineError>;
