//! k-means grouping of stars into regions.
//!
//! Lloyd's algorithm on the integer grid: assign each star to its nearest
//! centroid (squared distance, lowest group index on ties), move each
//! centroid to the integer mean of its members, repeat until no assignment
//! changes.  A group that loses all members keeps its centroid.
//!
//! The group count is searched upward from 1.  For each count a few random
//! restarts are tried, and the first clustering whose every member lies
//! within `accept_radius_sq` of its centroid wins.  If no count up to
//! `max_groups` is accepted, the last attempt is returned.

use st_core::{NodeId, Point, SimRng};

use crate::StarField;

/// Search parameters for [`KMeans::cluster`].
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KMeans {
    /// Random initial centroids are drawn from `[0, field_size)²`.
    pub field_size: i32,
    pub max_groups: usize,
    /// Random restarts per group count.
    pub restarts: usize,
    /// Squared radius every member must fall within for acceptance.
    pub accept_radius_sq: i64,
    /// Lloyd iterations per restart.  Assignment usually converges long
    /// before this; the cap guards against two-state oscillation.
    pub max_iterations: usize,
}

impl Default for KMeans {
    fn default() -> Self {
        Self {
            field_size:       1024,
            max_groups:       16,
            restarts:         5,
            accept_radius_sq: 90_000,
            max_iterations:   1_000,
        }
    }
}

/// Result of a k-means run.  Empty groups are dropped, so every group in
/// `groups` has at least one member and `centroids[g]` belongs to
/// `groups[g]`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Clustering {
    pub centroids: Vec<Point>,
    pub groups: Vec<Vec<NodeId>>,
    /// `true` if the radius check passed.
    pub accepted: bool,
}

impl Clustering {
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

impl KMeans {
    /// Group `nodes` (a subset of `field`) into regions.
    pub fn cluster(&self, field: &StarField, nodes: &[NodeId], rng: &mut SimRng) -> Clustering {
        if nodes.is_empty() {
            return Clustering { accepted: true, ..Clustering::default() };
        }
        let pts: Vec<Point> = nodes.iter().map(|&n| field.pos(n)).collect();
        let max_groups = self.max_groups.clamp(1, pts.len());

        let mut last = Clustering::default();
        for k in 1..=max_groups {
            for _ in 0..self.restarts.max(1) {
                let (centroids, assignment) = self.lloyd(&pts, k, rng);
                last = self.commit(nodes, &pts, centroids, &assignment);
                if last.accepted {
                    return last;
                }
            }
        }
        last
    }

    fn lloyd(&self, pts: &[Point], k: usize, rng: &mut SimRng) -> (Vec<Point>, Vec<usize>) {
        let mut centroids: Vec<Point> = (0..k)
            .map(|_| {
                let x = rng.gen_range(0..self.field_size.max(1));
                let y = rng.gen_range(0..self.field_size.max(1));
                Point::new(x, y)
            })
            .collect();
        let mut assignment = vec![usize::MAX; pts.len()];

        for _ in 0..self.max_iterations {
            if !assign(pts, &centroids, &mut assignment) {
                break;
            }
            recenter(pts, &assignment, &mut centroids);
        }
        (centroids, assignment)
    }

    fn commit(&self, nodes: &[NodeId], pts: &[Point], centroids: Vec<Point>, assignment: &[usize]) -> Clustering {
        let mut groups: Vec<Vec<NodeId>> = vec![Vec::new(); centroids.len()];
        let mut accepted = true;
        for (i, &g) in assignment.iter().enumerate() {
            debug_assert!(g < centroids.len(), "node {} assigned to no group", nodes[i]);
            groups[g].push(nodes[i]);
            if pts[i].distance_sq(centroids[g]) > self.accept_radius_sq {
                accepted = false;
            }
        }
        let (centroids, groups) = centroids
            .into_iter()
            .zip(groups)
            .filter(|(_, members)| !members.is_empty())
            .unzip();
        Clustering { centroids, groups, accepted }
    }
}

/// Re-assign every point to its nearest centroid.  Returns `true` if any
/// assignment changed.
fn assign(pts: &[Point], centroids: &[Point], assignment: &mut [usize]) -> bool {
    let mut changed = false;
    for (i, p) in pts.iter().enumerate() {
        let mut best = 0;
        let mut best_d = i64::MAX;
        for (g, c) in centroids.iter().enumerate() {
            let d = p.distance_sq(*c);
            if d < best_d {
                best_d = d;
                best = g;
            }
        }
        if assignment[i] != best {
            assignment[i] = best;
            changed = true;
        }
    }
    changed
}

/// Move each non-empty group's centroid to the integer mean of its members.
fn recenter(pts: &[Point], assignment: &[usize], centroids: &mut [Point]) {
    let k = centroids.len();
    let mut sx = vec![0i64; k];
    let mut sy = vec![0i64; k];
    let mut count = vec![0i64; k];
    for (p, &g) in pts.iter().zip(assignment) {
        sx[g] += p.x as i64;
        sy[g] += p.y as i64;
        count[g] += 1;
    }
    for g in 0..k {
        if count[g] == 0 {
            continue;
        }
        centroids[g] = Point::new((sx[g] / count[g]) as i32, (sy[g] / count[g]) as i32);
    }
}
