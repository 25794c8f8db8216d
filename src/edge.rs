use crate::geometry::{self, Point};
use serde::Serialize;
use std::cmp::Ordering;

/// Undirected wall segment
///
/// Endpoints are stored in canonical (lexicographic) order, so
/// `Edge::new(a, b) == Edge::new(b, a)` and both hash identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Edge {
    start: Point,
    end: Point,
}

impl Edge {
    pub fn new(a: Point, b: Point) -> Self {
        if a.total_order(&b) == Ordering::Greater {
            Edge { start: b, end: a }
        } else {
            Edge { start: a, end: b }
        }
    }

    pub fn from_coords(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(Point::new(x1, y1), Point::new(x2, y2))
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn length(&self) -> f64 {
        self.start.distance(&self.end)
    }

    /// Zero-length edges have no direction and are rejected by the sweep
    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }

    pub fn is_finite(&self) -> bool {
        self.start.is_finite() && self.end.is_finite()
    }

    pub fn has_endpoint(&self, point: &Point) -> bool {
        self.start == *point || self.end == *point
    }

    /// The endpoint opposite to `point`, or `None` if `point` is not an endpoint
    pub fn other_endpoint(&self, point: &Point) -> Option<Point> {
        if self.start == *point {
            Some(self.end)
        } else if self.end == *point {
            Some(self.start)
        } else {
            None
        }
    }

    /// Distance from `point` to the closest point of the segment
    pub fn distance(&self, point: &Point) -> f64 {
        geometry::point_segment_distance(&self.start, &self.end, point)
    }

    /// Where the infinite line through `p`-`q` meets this edge's supporting line
    pub fn line_intersection(&self, p: &Point, q: &Point) -> Option<Point> {
        geometry::line_intersection(&self.start, &self.end, p, q)
    }

    /// Proper crossing with another edge (shared endpoints and overlaps excluded)
    pub fn intersects(&self, other: &Edge) -> bool {
        geometry::segments_intersect(&self.start, &self.end, &other.start, &other.end)
    }

    /// Ray parameter `t` at which `origin + t * direction` meets the supporting line
    ///
    /// `None` when the ray is parallel to the edge or the edge lies behind the
    /// origin. The parameter is in units of `direction`.
    pub fn ray_distance(&self, origin: &Point, direction: &Point) -> Option<f64> {
        let ex = self.end.x - self.start.x;
        let ey = self.end.y - self.start.y;
        let denom = direction.x * ey - direction.y * ex;
        if denom == 0.0 {
            return None;
        }
        let t = ((self.start.x - origin.x) * ey - (self.start.y - origin.y) * ex) / denom;
        if t >= 0.0 {
            Some(t)
        } else {
            None
        }
    }
}

impl PartialOrd for Edge {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Edge {
    fn cmp(&self, other: &Self) -> Ordering {
        self.start
            .total_order(&other.start)
            .then_with(|| self.end.total_order(&other.end))
    }
}
