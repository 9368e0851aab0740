//! Precomputed pairwise distances.
//!
//! # Data layout
//!
//! A flat row-major `Vec<f64>` of `N × N` entries: `d[a * N + b]`.  Both
//! triangles are stored so a lookup is one multiply-add and one load, with
//! no branch on `a < b`.  Each unordered pair is computed once and mirrored,
//! which makes the table exactly symmetric.

use st_core::{NodeId, Point};

use crate::StarField;

/// Symmetric Euclidean distance oracle over a fixed set of stars.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceTable {
    n: usize,
    d: Vec<f64>,
}

impl DistanceTable {
    /// O(N²) build.  Deterministic: the same points always produce a
    /// bit-identical table.
    pub fn build(points: &[Point]) -> DistanceTable {
        let n = points.len();
        let mut d = vec![0.0f64; n * n];
        for a in 0..n {
            for b in (a + 1)..n {
                let v = points[a].distance(points[b]);
                d[a * n + b] = v;
                d[b * n + a] = v;
            }
        }
        DistanceTable { n, d }
    }

    pub fn from_field(field: &StarField) -> DistanceTable {
        Self::build(field.points())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Distance between `a` and `b`.
    ///
    /// # Panics
    /// Panics if either id is out of range.
    #[inline(always)]
    pub fn get(&self, a: NodeId, b: NodeId) -> f64 {
        self.d[a.index() * self.n + b.index()]
    }

    /// All distances from `a`, indexed by `NodeId`.
    #[inline]
    pub fn row(&self, a: NodeId) -> &[f64] {
        let start = a.index() * self.n;
        &self.d[start..start + self.n]
    }

    /// The member of `candidates` closest to `from`; the first one wins ties.
    pub fn nearest_of(&self, from: NodeId, candidates: &[NodeId]) -> Option<NodeId> {
        let row = self.row(from);
        let mut best: Option<(f64, NodeId)> = None;
        for &c in candidates {
            let d = row[c.index()];
            if best.is_none_or(|(bd, _)| d < bd) {
                best = Some((d, c));
            }
        }
        best.map(|(_, id)| id)
    }
}
