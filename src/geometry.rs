use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// Relative tolerance below which two lines are treated as parallel
const PARALLEL_EPSILON: f64 = 1e-12;

/// A point in the plane
///
/// Equality is exact numeric equality. Inputs are expected to sit on a
/// consistent grid, so no tolerance is applied here.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance_squared(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn distance(&self, other: &Point) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Total lexicographic order on (x, y), with -0.0 equal to 0.0
    pub fn total_order(&self, other: &Point) -> Ordering {
        canonical(self.x)
            .total_cmp(&canonical(other.x))
            .then_with(|| canonical(self.y).total_cmp(&canonical(other.y)))
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

// Walls are filtered for non-finite coordinates before they reach any hashed
// collection, so NaN never breaks reflexivity in practice.
impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        canonical(self.x).to_bits().hash(state);
        canonical(self.y).to_bits().hash(state);
    }
}

/// Map -0.0 to 0.0 so that equal values share one bit pattern
fn canonical(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

/// Result of a turn test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Clockwise,
    CounterClockwise,
    Collinear,
}

impl Orientation {
    fn from_cross(cross: f64) -> Self {
        if cross > 0.0 {
            Orientation::CounterClockwise
        } else if cross < 0.0 {
            Orientation::Clockwise
        } else {
            Orientation::Collinear
        }
    }

    /// The same turn seen in a mirrored coordinate system
    pub fn mirrored(self) -> Self {
        match self {
            Orientation::Clockwise => Orientation::CounterClockwise,
            Orientation::CounterClockwise => Orientation::Clockwise,
            Orientation::Collinear => Orientation::Collinear,
        }
    }
}

/// Vertical axis convention of the caller's coordinate space
///
/// `YUp` is the usual math convention. `YDown` is screen space, where y grows
/// towards the bottom of the display. Angles and turn tests are reported as
/// they appear on the caller's display, so "counter-clockwise" always means
/// counter-clockwise to the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    #[default]
    YUp,
    YDown,
}

impl Axis {
    /// +1.0 for `YUp`, -1.0 for `YDown`
    pub fn sign(self) -> f64 {
        match self {
            Axis::YUp => 1.0,
            Axis::YDown => -1.0,
        }
    }

    /// Vertical offset from `from` to `to`, pointing "up" on the display
    pub fn rise(self, from: &Point, to: &Point) -> f64 {
        match self {
            Axis::YUp => to.y - from.y,
            Axis::YDown => from.y - to.y,
        }
    }

    /// Signed angle of `target` seen from `source`, in (-pi, pi]
    pub fn angle(self, source: &Point, target: &Point) -> f64 {
        self.rise(source, target).atan2(target.x - source.x)
    }

    /// Cross product `(p2 - p1) x (p3 - p1)` as seen on the display
    pub fn cross(self, p1: &Point, p2: &Point, p3: &Point) -> f64 {
        self.sign() * cross(p1, p2, p3)
    }

    /// Turn test as seen on the display
    pub fn orientation(self, p1: &Point, p2: &Point, p3: &Point) -> Orientation {
        match self {
            Axis::YUp => orientation(p1, p2, p3),
            Axis::YDown => orientation(p1, p2, p3).mirrored(),
        }
    }
}

/// Cross product `(p2 - p1) x (p3 - p1)` in y-up convention
pub fn cross(p1: &Point, p2: &Point, p3: &Point) -> f64 {
    (p2.x - p1.x) * (p3.y - p1.y) - (p2.y - p1.y) * (p3.x - p1.x)
}

/// Turn test in y-up convention. Exactly zero means collinear; no epsilon.
pub fn orientation(p1: &Point, p2: &Point, p3: &Point) -> Orientation {
    Orientation::from_cross(cross(p1, p2, p3))
}

/// Euclidean distance from `point` to the segment `start`-`end`
///
/// A zero-length segment degrades to the distance to its single point.
pub fn point_segment_distance(start: &Point, end: &Point, point: &Point) -> f64 {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let length_sq = dx * dx + dy * dy;
    if length_sq == 0.0 {
        return start.distance(point);
    }

    let t = ((point.x - start.x) * dx + (point.y - start.y) * dy) / length_sq;
    if t <= 0.0 {
        start.distance(point)
    } else if t >= 1.0 {
        end.distance(point)
    } else {
        cross(start, end, point).abs() / length_sq.sqrt()
    }
}

/// Intersection of the infinite lines p1-p2 and p3-p4
///
/// Returns `None` when the lines are parallel or coincident, or when either
/// pair of points does not define a line. The result is not clamped to
/// either segment.
pub fn line_intersection(p1: &Point, p2: &Point, p3: &Point, p4: &Point) -> Option<Point> {
    let d1x = p1.x - p2.x;
    let d1y = p1.y - p2.y;
    let d2x = p3.x - p4.x;
    let d2y = p3.y - p4.y;

    let scale = (d1x * d1x + d1y * d1y).sqrt() * (d2x * d2x + d2y * d2y).sqrt();
    if scale == 0.0 {
        return None;
    }

    let denom = determinant(d1x, d1y, d2x, d2y);
    if denom.abs() <= PARALLEL_EPSILON * scale {
        return None;
    }

    let a = determinant(p1.x, p1.y, p2.x, p2.y);
    let b = determinant(p3.x, p3.y, p4.x, p4.y);
    Some(Point::new(
        determinant(a, d1x, b, d2x) / denom,
        determinant(a, d1y, b, d2y) / denom,
    ))
}

fn determinant(a: f64, b: f64, c: f64, d: f64) -> f64 {
    a * d - b * c
}

/// True iff segments a1-a2 and b1-b2 properly cross
///
/// Touching at an endpoint and collinear overlap are not crossings.
pub fn segments_intersect(a1: &Point, a2: &Point, b1: &Point, b2: &Point) -> bool {
    let o1 = orientation(a1, a2, b1);
    let o2 = orientation(a1, a2, b2);
    let o3 = orientation(b1, b2, a1);
    let o4 = orientation(b1, b2, a2);

    straddles(o1, o2) && straddles(o3, o4)
}

fn straddles(a: Orientation, b: Orientation) -> bool {
    a != Orientation::Collinear && b != Orientation::Collinear && a != b
}
