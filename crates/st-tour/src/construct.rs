//! Tour constructors.
//!
//! Each constructor turns an unordered set of stars into one closed visiting
//! order that contains every input node exactly once.  The multi-start
//! constructors poll the budget between starts: the first start always runs
//! to completion, later ones only while time remains, and the shortest tour
//! seen so far is returned.

use st_core::{Budget, NodeId, SimRng, Strategy};
use st_spatial::{DistanceTable, KMeans, StarField};

use crate::cost::tour_length;

/// Build a warm-start tour over `nodes` with the selected strategy.
pub fn construct(
    strategy: Strategy,
    nodes: &[NodeId],
    table: &DistanceTable,
    field: &StarField,
    budget: &mut impl Budget,
    rng: &mut SimRng,
) -> Vec<NodeId> {
    let tour = match strategy {
        Strategy::NearestNeighbor   => nearest_neighbor(nodes, table, budget),
        Strategy::FarthestInsertion => farthest_insertion(nodes, table, budget),
        Strategy::KMeansBootstrap   => kmeans_bootstrap(nodes, table, field, rng),
    };
    tracing::debug!(
        strategy = %strategy,
        nodes = nodes.len(),
        length = tour_length(&tour, table),
        "constructed tour"
    );
    tour
}

/// Input nodes in table order, without duplicates.
fn sorted_unique(nodes: &[NodeId]) -> Vec<NodeId> {
    let mut v = nodes.to_vec();
    v.sort_unstable();
    v.dedup();
    v
}

/// Run `build` from each start in table order until the budget expires and
/// keep the strictly shortest result.
fn multi_start(
    nodes: &[NodeId],
    table: &DistanceTable,
    budget: &mut impl Budget,
    mut build: impl FnMut(NodeId, &[NodeId]) -> Vec<NodeId>,
) -> Vec<NodeId> {
    let nodes = sorted_unique(nodes);
    if nodes.len() <= 2 {
        return nodes;
    }
    let mut best: Vec<NodeId> = Vec::new();
    let mut best_len = f64::INFINITY;
    let mut starts = 0usize;
    for &start in &nodes {
        if starts > 0 && budget.expired() {
            break;
        }
        let tour = build(start, &nodes);
        let len = tour_length(&tour, table);
        if len < best_len {
            best_len = len;
            best = tour;
        }
        starts += 1;
    }
    tracing::debug!(starts, candidates = nodes.len(), best_len, "multi-start finished");
    best
}

// ── Nearest neighbour ─────────────────────────────────────────────────────────

/// Multi-start nearest neighbour.  Equidistant candidates resolve to the
/// lowest node id.
pub fn nearest_neighbor(nodes: &[NodeId], table: &DistanceTable, budget: &mut impl Budget) -> Vec<NodeId> {
    multi_start(nodes, table, budget, |start, all| greedy_from(start, all, table))
}

/// One nearest-neighbour pass over `nodes` (sorted) starting at `start`.
/// `start` need not be a member of `nodes`; if it is, it leads the tour.
fn greedy_from(start: NodeId, nodes: &[NodeId], table: &DistanceTable) -> Vec<NodeId> {
    let mut remaining: Vec<NodeId> = nodes.iter().copied().filter(|&n| n != start).collect();
    let mut tour = Vec::with_capacity(nodes.len());
    if nodes.contains(&start) {
        tour.push(start);
    }
    let mut cur = start;
    while !remaining.is_empty() {
        let row = table.row(cur);
        let mut best_i = 0;
        for i in 1..remaining.len() {
            if row[remaining[i].index()] < row[remaining[best_i].index()] {
                best_i = i;
            }
        }
        // `remove` keeps the remaining list in table order for tie-breaking.
        cur = remaining.remove(best_i);
        tour.push(cur);
    }
    tour
}

// ── Farthest insertion ────────────────────────────────────────────────────────

/// Multi-start farthest insertion: repeatedly take the unplaced node farthest
/// from the partial tour and insert it where it lengthens the tour least.
pub fn farthest_insertion(nodes: &[NodeId], table: &DistanceTable, budget: &mut impl Budget) -> Vec<NodeId> {
    multi_start(nodes, table, budget, |start, all| insertion_from(start, all, table))
}

fn insertion_from(start: NodeId, nodes: &[NodeId], table: &DistanceTable) -> Vec<NodeId> {
    let mut tour = Vec::with_capacity(nodes.len());
    tour.push(start);

    // Parallel arrays over the unplaced nodes: id and distance to the tour.
    let mut unplaced: Vec<NodeId> = nodes.iter().copied().filter(|&n| n != start).collect();
    let mut gap: Vec<f64> = unplaced.iter().map(|&n| table.get(start, n)).collect();

    while !unplaced.is_empty() {
        let mut far = 0;
        for i in 1..unplaced.len() {
            if gap[i] > gap[far] {
                far = i;
            }
        }
        let node = unplaced.remove(far);
        gap.remove(far);

        let m = tour.len();
        let mut at = 1;
        let mut best_delta = f64::INFINITY;
        for i in 0..m {
            let prev = tour[i];
            let next = tour[(i + 1) % m];
            let delta = table.get(prev, node) + table.get(node, next) - table.get(prev, next);
            if delta < best_delta {
                best_delta = delta;
                at = i + 1;
            }
        }
        tour.insert(at, node);

        let row = table.row(node);
        for (g, n) in gap.iter_mut().zip(&unplaced) {
            *g = g.min(row[n.index()]);
        }
    }
    tour
}

// ── k-means bootstrap ─────────────────────────────────────────────────────────

/// Visit k-means regions in nearest-centroid order, running nearest
/// neighbour inside each region from the member closest to where the
/// previous region ended.
pub fn kmeans_bootstrap(
    nodes: &[NodeId],
    table: &DistanceTable,
    field: &StarField,
    rng: &mut SimRng,
) -> Vec<NodeId> {
    let nodes = sorted_unique(nodes);
    if nodes.len() <= 2 {
        return nodes;
    }
    let clustering = KMeans::default().cluster(field, &nodes, rng);
    tracing::debug!(
        groups = clustering.group_count(),
        accepted = clustering.accepted,
        "k-means bootstrap"
    );

    // Greedy order over centroids, starting from group 0.
    let k = clustering.group_count();
    let mut order = Vec::with_capacity(k);
    let mut left: Vec<usize> = (1..k).collect();
    order.push(0);
    while !left.is_empty() {
        let here = clustering.centroids[order[order.len() - 1]];
        let mut best_i = 0;
        for i in 1..left.len() {
            if here.distance_sq(clustering.centroids[left[i]])
                < here.distance_sq(clustering.centroids[left[best_i]])
            {
                best_i = i;
            }
        }
        order.push(left.remove(best_i));
    }

    let mut tour: Vec<NodeId> = Vec::with_capacity(nodes.len());
    for g in order {
        let mut members = clustering.groups[g].clone();
        members.sort_unstable();
        let entry = match tour.last() {
            Some(&exit) => table.nearest_of(exit, &members).unwrap_or(members[0]),
            None        => members[0],
        };
        tour.extend(greedy_from(entry, &members, table));
    }
    debug_assert_eq!(tour.len(), nodes.len());
    tour
}

// ── Anchoring ─────────────────────────────────────────────────────────────────

/// Turn a closed tour into the cheapest open path starting from `start`.
///
/// Considers every rotation in both directions: entering the cycle at
/// `tour[i]` costs `d(start, tour[i])` and saves whichever cycle edge at
/// `tour[i]` is dropped.
pub fn anchor_tour(start: NodeId, tour: &[NodeId], table: &DistanceTable) -> Vec<NodeId> {
    let m = tour.len();
    if m == 0 {
        return Vec::new();
    }
    if m == 1 {
        return tour.to_vec();
    }

    let mut best = (f64::INFINITY, 0usize, true);
    for i in 0..m {
        let enter = table.get(start, tour[i]);
        let prev = tour[(i + m - 1) % m];
        let next = tour[(i + 1) % m];
        // Forward from i drops the edge (prev, i); backward drops (i, next).
        let forward = enter - table.get(prev, tour[i]);
        let backward = enter - table.get(tour[i], next);
        if forward < best.0 {
            best = (forward, i, true);
        }
        if backward < best.0 {
            best = (backward, i, false);
        }
    }

    let (_, i, forward) = best;
    if forward {
        tour[i..].iter().chain(&tour[..i]).copied().collect()
    } else {
        (0..m).map(|k| tour[(i + m - k) % m]).collect()
    }
}
