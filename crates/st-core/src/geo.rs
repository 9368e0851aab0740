//! Integer field coordinates and Euclidean distance.
//!
//! Stars live on an integer grid (the judge uses `0..1024` on both axes).
//! Distances are computed in `f64` so sums over long tours stay exact enough
//! to compare candidate plans.

/// A star position on the integer grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance.  Exact; used for cluster assignment where
    /// only ordering matters.
    #[inline]
    pub fn distance_sq(self, other: Point) -> i64 {
        let dx = (other.x - self.x) as i64;
        let dy = (other.y - self.y) as i64;
        dx * dx + dy * dy
    }

    /// Euclidean distance.
    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        (self.distance_sq(other) as f64).sqrt()
    }

    /// `[x, y]` as floats, the layout the R-tree index expects.
    #[inline]
    pub fn to_array(self) -> [f64; 2] {
        [self.x as f64, self.y as f64]
    }

    /// Decode a flat `x0 y0 x1 y1 …` coordinate list.  A trailing odd value
    /// is ignored.
    pub fn from_flat(coords: &[i32]) -> Vec<Point> {
        coords
            .chunks_exact(2)
            .map(|xy| Point::new(xy[0], xy[1]))
            .collect()
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
