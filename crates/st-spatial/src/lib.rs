//! `st-spatial`: the star field, spatial queries and the distance oracle.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`field`]    | `StarField` (positions + R-tree)                           |
//! | [`distance`] | `DistanceTable` (flat symmetric N×N table)                 |
//! | [`cluster`]  | `KMeans`, `Clustering`                                     |
//! | [`error`]    | `SpatialError`, `SpatialResult<T>`                         |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public value types.     |

pub mod cluster;
pub mod distance;
pub mod error;
pub mod field;

#[cfg(test)]
mod tests;

pub use cluster::{Clustering, KMeans};
pub use distance::DistanceTable;
pub use error::{SpatialError, SpatialResult};
pub use field::StarField;
