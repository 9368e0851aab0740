//! Star positions and spatial queries.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `[x, y]` to `NodeId`.  The hitchhiking policy
//! asks two questions every turn, per UFO: "is there any unvisited star near
//! this stop?" and "which unvisited star is closest to this ship?".  Both are
//! answered by walking the tree in distance order and filtering on the
//! visited flag, so no index rebuild is needed as stars get visited.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use st_core::{NodeId, Point};

use crate::{SpatialError, SpatialResult};

// ── R-tree entry ──────────────────────────────────────────────────────────────

/// Entry stored in the R-tree: a 2-D `[x, y]` point with its `NodeId`.
#[derive(Clone)]
struct StarEntry {
    point: [f64; 2],
    id: NodeId,
}

impl RTreeObject for StarEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for StarEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── StarField ─────────────────────────────────────────────────────────────────

/// Immutable set of stars, indexed by `NodeId` in input order.
pub struct StarField {
    pos: Vec<Point>,
    index: RTree<StarEntry>,
}

impl StarField {
    /// Build a field from positions.  Duplicate coordinates are allowed and
    /// remain distinct stars.
    pub fn from_points(pos: Vec<Point>) -> SpatialResult<StarField> {
        if pos.len() >= u32::MAX as usize {
            return Err(SpatialError::TooManyStars(pos.len()));
        }
        // Bulk load is O(N log N), faster than N inserts.
        let entries: Vec<StarEntry> = pos
            .iter()
            .enumerate()
            .map(|(i, p)| StarEntry { point: p.to_array(), id: NodeId(i as u32) })
            .collect();
        let index = RTree::bulk_load(entries);
        Ok(StarField { pos, index })
    }

    /// Build a field from a flat `x0 y0 x1 y1 …` list.
    pub fn from_flat(coords: &[i32]) -> SpatialResult<StarField> {
        if coords.len() % 2 != 0 {
            return Err(SpatialError::OddCoordinates(coords.len()));
        }
        Self::from_points(Point::from_flat(coords))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pos.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos.is_empty()
    }

    /// Position of `id`.
    ///
    /// # Panics
    /// Panics if `id` is out of range.
    #[inline]
    pub fn pos(&self, id: NodeId) -> Point {
        self.pos[id.index()]
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.pos
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.pos.len()
    }

    /// All node ids in table order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.pos.len()).map(|i| NodeId(i as u32))
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Every star within Euclidean distance `radius` of `p` (inclusive),
    /// sorted by id.
    pub fn within(&self, p: Point, radius: f64) -> Vec<NodeId> {
        let mut out: Vec<NodeId> = self
            .index
            .locate_within_distance(p.to_array(), radius * radius)
            .map(|e| e.id)
            .collect();
        out.sort_unstable();
        out
    }

    /// `true` if some star within `radius` of `p` satisfies `pred`.
    pub fn any_within(&self, p: Point, radius: f64, mut pred: impl FnMut(NodeId) -> bool) -> bool {
        self.index
            .locate_within_distance(p.to_array(), radius * radius)
            .any(|e| pred(e.id))
    }

    /// The star closest to `p`.  Returns `None` only for an empty field.
    pub fn nearest(&self, p: Point) -> Option<NodeId> {
        self.nearest_matching(p, |_| true)
    }

    /// The star closest to `p` among those satisfying `pred`.  Equidistant
    /// candidates resolve to the lowest id.
    pub fn nearest_matching(&self, p: Point, mut pred: impl FnMut(NodeId) -> bool) -> Option<NodeId> {
        let mut best: Option<(f64, NodeId)> = None;
        for (entry, d2) in self.index.nearest_neighbor_iter_with_distance_2(&p.to_array()) {
            if let Some((bd, bid)) = best {
                if d2 > bd {
                    break;
                }
                if pred(entry.id) && entry.id < bid {
                    best = Some((bd, entry.id));
                }
                continue;
            }
            if pred(entry.id) {
                best = Some((d2, entry.id));
            }
        }
        best.map(|(_, id)| id)
    }
}
