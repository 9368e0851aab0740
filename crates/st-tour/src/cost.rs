//! Tour length.
//!
//! A tour is a `[NodeId]` visiting order.  Whether it is closed (returns to
//! its first node) or open (starts at an agent's position and ends at its
//! last node) is decided by an [`Anchor`].

use st_core::NodeId;
use st_spatial::DistanceTable;

/// How a tour is costed.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Anchor {
    /// Closed cycle: the last node connects back to the first.
    Closed,
    /// Open path that starts at the given node (an agent's position, not
    /// itself part of the tour).
    At(NodeId),
}

impl Anchor {
    #[inline]
    pub fn length(self, tour: &[NodeId], table: &DistanceTable) -> f64 {
        match self {
            Anchor::Closed    => tour_length(tour, table),
            Anchor::At(start) => path_length(start, tour, table),
        }
    }
}

/// Length of the closed cycle through `tour`.  Zero for fewer than two nodes.
pub fn tour_length(tour: &[NodeId], table: &DistanceTable) -> f64 {
    if tour.len() < 2 {
        return 0.0;
    }
    let open: f64 = tour.windows(2).map(|w| table.get(w[0], w[1])).sum();
    open + table.get(tour[tour.len() - 1], tour[0])
}

/// Length of the open path `start → tour[0] → … → tour[n-1]`.
pub fn path_length(start: NodeId, tour: &[NodeId], table: &DistanceTable) -> f64 {
    let Some(&first) = tour.first() else {
        return 0.0;
    };
    let lead = table.get(start, first);
    lead + tour.windows(2).map(|w| table.get(w[0], w[1])).sum::<f64>()
}
