//! `st-tour`: building and improving visiting orders.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`cost`]      | `Anchor`, closed/open tour lengths                        |
//! | [`construct`] | nearest neighbour, farthest insertion, k-means bootstrap, `anchor_tour` |
//! | [`anneal`]    | `TourAnnealer` (single-tour simulated annealing)          |
//! | [`multi`]     | `MultiTourAnnealer` (one tour per agent)                  |
//! | [`plan`]      | `Plan` (partition of the unvisited set) + validation      |
//! | [`error`]     | `TourError`, `TourResult<T>`                              |
//!
//! All search entry points take a `&mut impl Budget` and return the best
//! result found when it expires.  None of them fails: running out of time is
//! the normal way a search ends.

pub mod anneal;
pub mod construct;
pub mod cost;
pub mod error;
pub mod multi;
pub mod plan;


pub use anneal::{AnnealParams, AnnealStats, TourAnnealer};
pub use construct::{anchor_tour, construct, farthest_insertion, kmeans_bootstrap, nearest_neighbor};
pub use cost::{path_length, tour_length, Anchor};
pub use error::{TourError, TourResult};
pub use multi::MultiTourAnnealer;
pub use plan::Plan;
