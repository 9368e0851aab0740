//! Unit tests for st-spatial.
//!
//! All tests use small hand-placed fields.

#[cfg(test)]
mod helpers {
    use st_core::Point;

    use crate::StarField;

    /// The unit square scaled by 10:
    ///
    ///   3:(0,10)   2:(10,10)
    ///   0:(0,0)    1:(10,0)
    pub fn square() -> StarField {
        StarField::from_points(vec![
            Point::new(0, 0),
            Point::new(10, 0),
            Point::new(10, 10),
            Point::new(0, 10),
        ])
        .unwrap()
    }

    /// Two tight blobs far apart: ids 0..4 near (100,100), ids 4..8 near
    /// (900,900).
    pub fn two_blobs() -> StarField {
        let mut pts = Vec::new();
        for (dx, dy) in [(0, 0), (5, 0), (0, 5), (5, 5)] {
            pts.push(Point::new(100 + dx, 100 + dy));
        }
        for (dx, dy) in [(0, 0), (5, 0), (0, 5), (5, 5)] {
            pts.push(Point::new(900 + dx, 900 + dy));
        }
        StarField::from_points(pts).unwrap()
    }
}

// ── StarField ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod field {
    use st_core::{NodeId, Point};

    use crate::{SpatialError, StarField};

    #[test]
    fn from_flat_decodes_pairs() {
        let f = StarField::from_flat(&[0, 0, 3, 4]).unwrap();
        assert_eq!(f.len(), 2);
        assert_eq!(f.pos(NodeId(1)), Point::new(3, 4));
    }

    #[test]
    fn from_flat_rejects_odd_length() {
        assert!(matches!(StarField::from_flat(&[1, 2, 3]), Err(SpatialError::OddCoordinates(3))));
    }

    #[test]
    fn within_is_inclusive_and_sorted() {
        let f = super::helpers::square();
        assert_eq!(f.within(Point::new(0, 0), 10.0), vec![NodeId(0), NodeId(1), NodeId(3)]);
        assert_eq!(f.within(Point::new(0, 0), 9.9), vec![NodeId(0)]);
    }

    #[test]
    fn nearest_and_filtered_nearest() {
        let f = super::helpers::square();
        assert_eq!(f.nearest(Point::new(9, 1)), Some(NodeId(1)));
        assert_eq!(f.nearest_matching(Point::new(9, 1), |n| n != NodeId(1)), Some(NodeId(0)));
        assert_eq!(f.nearest_matching(Point::new(9, 1), |_| false), None);
    }

    #[test]
    fn nearest_tie_prefers_lowest_id() {
        let f = super::helpers::square();
        // (5,5) is equidistant from all four corners.
        assert_eq!(f.nearest(Point::new(5, 5)), Some(NodeId(0)));
        assert_eq!(f.nearest_matching(Point::new(5, 5), |n| n.0 >= 2), Some(NodeId(2)));
    }

    #[test]
    fn any_within_filters() {
        let f = super::helpers::square();
        assert!(f.any_within(Point::new(0, 0), 10.0, |n| n == NodeId(3)));
        assert!(!f.any_within(Point::new(0, 0), 10.0, |n| n == NodeId(2)));
    }

    #[test]
    fn empty_field_has_no_nearest() {
        let f = StarField::from_points(Vec::new()).unwrap();
        assert!(f.is_empty());
        assert_eq!(f.nearest(Point::new(0, 0)), None);
    }
}

// ── DistanceTable ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod distance {
    use st_core::{NodeId, Point};

    use crate::DistanceTable;

    #[test]
    fn symmetric_with_zero_diagonal() {
        let f = super::helpers::two_blobs();
        let t = DistanceTable::from_field(&f);
        for a in f.ids() {
            assert_eq!(t.get(a, a), 0.0);
            for b in f.ids() {
                assert_eq!(t.get(a, b), t.get(b, a));
            }
        }
    }

    #[test]
    fn values_are_euclidean() {
        let t = DistanceTable::build(&[Point::new(0, 0), Point::new(3, 4)]);
        assert_eq!(t.get(NodeId(0), NodeId(1)), 5.0);
        assert_eq!(t.row(NodeId(1)), &[5.0, 0.0]);
    }

    #[test]
    fn rebuild_is_bit_identical() {
        let f = super::helpers::two_blobs();
        let a = DistanceTable::from_field(&f);
        let b = DistanceTable::from_field(&f);
        assert_eq!(a, b);
        for x in f.ids() {
            for y in f.ids() {
                assert_eq!(a.get(x, y).to_bits(), b.get(x, y).to_bits());
            }
        }
    }

    #[test]
    fn triangle_inequality() {
        let f = super::helpers::two_blobs();
        let t = DistanceTable::from_field(&f);
        for a in f.ids() {
            for b in f.ids() {
                for c in f.ids() {
                    assert!(t.get(a, c) <= t.get(a, b) + t.get(b, c) + 1e-9);
                }
            }
        }
    }

    #[test]
    fn nearest_of_prefers_first_on_ties() {
        let f = super::helpers::square();
        let t = DistanceTable::from_field(&f);
        assert_eq!(t.nearest_of(NodeId(0), &[NodeId(3), NodeId(1)]), Some(NodeId(3)));
        assert_eq!(t.nearest_of(NodeId(0), &[]), None);
    }
}

// ── KMeans ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod cluster {
    use st_core::{NodeId, SimRng};

    use crate::KMeans;

    #[test]
    fn single_blob_is_one_group() {
        let f = super::helpers::square();
        let nodes: Vec<NodeId> = f.ids().collect();
        let c = KMeans::default().cluster(&f, &nodes, &mut SimRng::new(1));
        assert!(c.accepted);
        assert_eq!(c.group_count(), 1);
        assert_eq!(c.groups[0].len(), 4);
    }

    #[test]
    fn far_blobs_split() {
        let f = super::helpers::two_blobs();
        let nodes: Vec<NodeId> = f.ids().collect();
        let c = KMeans::default().cluster(&f, &nodes, &mut SimRng::new(7));
        assert!(c.accepted);
        assert!(c.group_count() >= 2);
        // No group mixes the two blobs.
        for g in &c.groups {
            let low = g.iter().filter(|n| n.0 < 4).count();
            assert!(low == 0 || low == g.len());
        }
    }

    #[test]
    fn every_node_in_exactly_one_group() {
        let f = super::helpers::two_blobs();
        let nodes = vec![NodeId(0), NodeId(2), NodeId(5), NodeId(7)];
        let c = KMeans::default().cluster(&f, &nodes, &mut SimRng::new(3));
        let mut all: Vec<NodeId> = c.groups.iter().flatten().copied().collect();
        all.sort_unstable();
        assert_eq!(all, nodes);
        assert_eq!(c.centroids.len(), c.groups.len());
    }

    #[test]
    fn empty_input() {
        let f = super::helpers::square();
        let c = KMeans::default().cluster(&f, &[], &mut SimRng::new(1));
        assert_eq!(c.group_count(), 0);
    }
}
