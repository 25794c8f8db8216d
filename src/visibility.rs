//! Angular plane sweep computing the visibility polygon of a point source.
//!
//! The sweep turns a ray counter-clockwise (as seen on the caller's display)
//! around the source. Wall endpoints are the only places where the set of
//! walls crossed by the ray can change, so the ray only stops at *bearings*:
//! groups of wall endpoints lying on one ray from the source. Between two
//! consecutive bearings the nearest crossed wall is fixed, and every run of
//! bearings sharing a nearest wall becomes one triangle of the output fan.
//!
//! The engine keeps no state between calls. Each call normalizes its input,
//! injects the four arena walls, and returns a fresh triangle list.

use crate::edge::Edge;
use crate::geometry::{self, Axis, Orientation, Point};
use log::{debug, error, trace, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Rectangle (0,0)-(width,height) bounding the visible region
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f64,
    pub height: f64,
}

impl Arena {
    pub fn new(width: f64, height: f64) -> Self {
        Arena { width, height }
    }

    pub fn validate(&self) -> Result<(), VisibilityError> {
        let valid = self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0;
        if valid {
            Ok(())
        } else {
            Err(VisibilityError::InvalidArena {
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Inside or on the boundary
    pub fn contains(&self, point: &Point) -> bool {
        point.x >= 0.0 && point.x <= self.width && point.y >= 0.0 && point.y <= self.height
    }

    /// Inside and not on the boundary
    pub fn contains_strictly(&self, point: &Point) -> bool {
        point.x > 0.0 && point.x < self.width && point.y > 0.0 && point.y < self.height
    }

    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(0.0, 0.0),
            Point::new(0.0, self.height),
            Point::new(self.width, self.height),
            Point::new(self.width, 0.0),
        ]
    }

    /// The four walls injected around every sweep
    pub fn boundary_walls(&self) -> [Edge; 4] {
        let [a, b, c, d] = self.corners();
        [Edge::new(a, b), Edge::new(b, c), Edge::new(c, d), Edge::new(d, a)]
    }

    /// True if the edge runs along one of the arena sides
    pub fn lies_on_boundary(&self, edge: &Edge) -> bool {
        let (a, b) = (edge.start(), edge.end());
        (a.x == 0.0 && b.x == 0.0)
            || (a.x == self.width && b.x == self.width)
            || (a.y == 0.0 && b.y == 0.0)
            || (a.y == self.height && b.y == self.height)
    }
}

/// One wedge of the visibility fan
///
/// `start` lies on the earlier bounding ray in sweep order, `end` on the
/// later one. Both lie on the wall that bounds the wedge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Triangle {
    pub source: Point,
    pub start: Point,
    pub end: Point,
}

impl Triangle {
    pub fn points(&self) -> [Point; 3] {
        [self.source, self.start, self.end]
    }

    /// Signed area in y-up convention
    pub fn signed_area(&self) -> f64 {
        geometry::cross(&self.source, &self.start, &self.end) / 2.0
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Angle subtended at the source, in [0, pi]
    pub fn angular_span(&self) -> f64 {
        let (ux, uy) = (self.start.x - self.source.x, self.start.y - self.source.y);
        let (vx, vy) = (self.end.x - self.source.x, self.end.y - self.source.y);
        (ux * vy - uy * vx).abs().atan2(ux * vx + uy * vy)
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum VisibilityError {
    #[error("arena must have positive finite extents, got {width} x {height}")]
    InvalidArena { width: f64, height: f64 },

    #[error("source ({x}, {y}) is not strictly inside the arena")]
    SourceOutsideArena { x: f64, y: f64 },

    /// No wall crosses the sweep ray. The arena walls make this unreachable
    /// for valid input, so it signals a broken invariant.
    #[error("no wall crosses the sweep ray past bearing ({x}, {y})")]
    EmptyActiveSet { x: f64, y: f64 },

    #[error("nearest wall never changes around the source")]
    UnboundedSweep,
}

/// A wall endpoint together with the walls that end there
#[derive(Debug, Clone)]
struct VertexEvent {
    point: Point,
    angle: f64,
    distance_sq: f64,
    walls: Vec<usize>,
}

/// Vertices lying on one ray from the source, nearest first
#[derive(Debug, Clone)]
struct Bearing {
    ray: Point,
    events: Vec<VertexEvent>,
}

/// Indices of the walls crossed by the sweep ray
#[derive(Debug, Clone, Default)]
struct ActiveSet {
    walls: Vec<usize>,
}

impl ActiveSet {
    fn contains(&self, wall: usize) -> bool {
        self.walls.contains(&wall)
    }

    fn insert(&mut self, wall: usize) {
        if !self.contains(wall) {
            self.walls.push(wall);
        }
    }

    fn remove(&mut self, wall: usize) {
        self.walls.retain(|&active| active != wall);
    }

    /// Wall met first by the ray `source + t * direction`; ties go to the lower index
    fn nearest(&self, walls: &[Edge], source: &Point, direction: &Point) -> Option<usize> {
        let mut best: Option<(f64, usize)> = None;
        for &index in &self.walls {
            let Some(t) = walls[index].ray_distance(source, direction) else {
                continue;
            };
            let closer = match best {
                None => true,
                Some((best_t, best_index)) => t < best_t || (t == best_t && index < best_index),
            };
            if closer {
                best = Some((t, index));
            }
        }
        best.map(|(_, index)| index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EndpointRole {
    /// The sweep reaches this endpoint first; the wall opens here
    Near,
    /// The sweep leaves the wall here
    Far,
    /// The wall points at the source and is never crossed
    Radial,
}

/// Drop unusable walls, canonicalize, deduplicate, and append the arena walls
///
/// Zero-length and non-finite walls, walls not fully inside the arena, and
/// walls running along the arena sides are dropped. The result is sorted, so
/// the sweep does not depend on the caller's wall order.
pub fn normalize_walls(walls: &[Edge], arena: &Arena) -> Vec<Edge> {
    let mut normalized = Vec::with_capacity(walls.len() + 4);

    for wall in walls {
        if !wall.is_finite() {
            warn!("Dropping wall with non-finite coordinates: {:?}", wall);
            continue;
        }
        if wall.is_degenerate() {
            warn!(
                "Dropping zero-length wall at ({}, {})",
                wall.start().x,
                wall.start().y
            );
            continue;
        }
        if !arena.contains(&wall.start()) || !arena.contains(&wall.end()) {
            warn!("Dropping wall outside the arena: {:?}", wall);
            continue;
        }
        if arena.lies_on_boundary(wall) {
            continue;
        }
        normalized.push(*wall);
    }

    normalized.sort();
    normalized.dedup();
    normalized.extend(arena.boundary_walls());
    normalized
}

/// Compute the visibility fan of `source` among `walls` inside `arena`
///
/// Triangles are returned in sweep order, counter-clockwise on the caller's
/// display as selected by `axis`. The trailing ray of each triangle is the
/// leading ray of the next, and the last triangle closes back onto the first.
pub fn build_visibility_triangles(
    walls: &[Edge],
    source: Point,
    arena: Arena,
    axis: Axis,
) -> Result<Vec<Triangle>, VisibilityError> {
    arena.validate()?;
    if !source.is_finite() || !arena.contains_strictly(&source) {
        return Err(VisibilityError::SourceOutsideArena {
            x: source.x,
            y: source.y,
        });
    }

    let walls = normalize_walls(walls, &arena);
    let bearings = sorted_bearings(&walls, &source, axis);
    let count = bearings.len();
    let wedges: Vec<Point> = (0..count)
        .map(|i| wedge_direction(&source, &bearings[i].ray, &bearings[(i + 1) % count].ray, axis))
        .collect();

    // Priming lap: after one full turn the active set holds exactly the walls
    // straddling the seam, so the emitting lap starts from a settled state.
    let mut active = ActiveSet::default();
    for bearing in &bearings {
        apply_bearing(&mut active, bearing, &walls, &source, axis);
    }
    let last = count - 1;
    let mut current = nearest_in_wedge(&active, &walls, &source, &wedges[last], &bearings[last])?;

    let mut triangles = Vec::new();
    let mut run_start: Option<usize> = None;
    let mut first_change: Option<usize> = None;

    for (index, bearing) in bearings.iter().enumerate() {
        apply_bearing(&mut active, bearing, &walls, &source, axis);
        let nearest = nearest_in_wedge(&active, &walls, &source, &wedges[index], bearing)?;
        if nearest == current {
            continue;
        }

        match run_start {
            Some(start) => {
                let triangle = wedge_triangle(&source, &bearings[start], bearing, &walls[current]);
                trace!("wedge {:?} bounded by {:?}", triangle, walls[current]);
                triangles.push(triangle);
            }
            None => first_change = Some(index),
        }
        run_start = Some(index);
        current = nearest;
    }

    // The open run wraps across the seam and ends where the first run began
    let (Some(start), Some(first)) = (run_start, first_change) else {
        error!(
            "Nearest wall never changed over {} bearings from ({}, {})",
            count, source.x, source.y
        );
        return Err(VisibilityError::UnboundedSweep);
    };
    triangles.push(wedge_triangle(&source, &bearings[start], &bearings[first], &walls[current]));

    debug!(
        "Visibility sweep from ({}, {}): {} walls, {} bearings, {} triangles",
        source.x,
        source.y,
        walls.len(),
        count,
        triangles.len()
    );
    Ok(triangles)
}

/// Ordered outline of the visibility polygon described by a triangle fan
pub fn visibility_outline(triangles: &[Triangle]) -> Vec<Point> {
    let mut outline: Vec<Point> = Vec::with_capacity(triangles.len() * 2);
    for triangle in triangles {
        for point in [triangle.start, triangle.end] {
            if outline.last() != Some(&point) {
                outline.push(point);
            }
        }
    }
    if outline.len() > 1 && outline.first() == outline.last() {
        outline.pop();
    }
    outline
}

/// Pairs of walls that properly cross each other
///
/// The sweep assumes walls only meet at endpoints; any pair reported here
/// makes its output unreliable.
pub fn crossing_walls(walls: &[Edge]) -> Vec<(Edge, Edge)> {
    let mut crossings = Vec::new();
    for (i, a) in walls.iter().enumerate() {
        for b in &walls[i + 1..] {
            if a.intersects(b) {
                crossings.push((*a, *b));
            }
        }
    }
    crossings
}

fn sorted_bearings(walls: &[Edge], source: &Point, axis: Axis) -> Vec<Bearing> {
    let mut incident: HashMap<Point, Vec<usize>> = HashMap::new();
    for (index, wall) in walls.iter().enumerate() {
        incident.entry(wall.start()).or_default().push(index);
        incident.entry(wall.end()).or_default().push(index);
    }

    // A vertex at the source has no bearing; its walls are all radial
    let mut events: Vec<VertexEvent> = incident
        .into_iter()
        .filter(|(point, _)| point != source)
        .map(|(point, walls)| VertexEvent {
            point,
            angle: axis.angle(source, &point),
            distance_sq: source.distance_squared(&point),
            walls,
        })
        .collect();

    events.sort_by(|a, b| {
        a.angle
            .total_cmp(&b.angle)
            .then_with(|| a.distance_sq.total_cmp(&b.distance_sq))
            .then_with(|| a.point.total_order(&b.point))
    });

    let mut bearings: Vec<Bearing> = Vec::new();
    for event in events {
        let joins_last = bearings
            .last()
            .is_some_and(|bearing| same_bearing(source, &bearing.ray, &event.point));
        match bearings.last_mut() {
            Some(bearing) if joins_last => bearing.events.push(event),
            _ => bearings.push(Bearing {
                ray: event.point,
                events: vec![event],
            }),
        }
    }
    bearings
}

/// Exact test that `a` and `b` lie on the same ray from `source`
fn same_bearing(source: &Point, a: &Point, b: &Point) -> bool {
    let dot = (a.x - source.x) * (b.x - source.x) + (a.y - source.y) * (b.y - source.y);
    geometry::cross(source, a, b) == 0.0 && dot > 0.0
}

fn endpoint_role(wall: &Edge, vertex: &Point, source: &Point, axis: Axis) -> EndpointRole {
    let Some(other) = wall.other_endpoint(vertex) else {
        return EndpointRole::Radial;
    };
    // The wall opens here when its other end is still ahead of the sweep
    match axis.orientation(source, vertex, &other) {
        Orientation::CounterClockwise => EndpointRole::Near,
        Orientation::Clockwise => EndpointRole::Far,
        Orientation::Collinear => EndpointRole::Radial,
    }
}

fn apply_bearing(active: &mut ActiveSet, bearing: &Bearing, walls: &[Edge], source: &Point, axis: Axis) {
    for event in &bearing.events {
        for &index in &event.walls {
            match endpoint_role(&walls[index], &event.point, source, axis) {
                EndpointRole::Near if !active.contains(index) => active.insert(index),
                EndpointRole::Far if active.contains(index) => active.remove(index),
                _ => {}
            }
        }
    }
}

/// Direction strictly inside the wedge between two consecutive bearings
fn wedge_direction(source: &Point, from: &Point, to: &Point, axis: Axis) -> Point {
    let u = unit(source, from);
    let v = unit(source, to);
    let sum = Point::new(u.x + v.x, u.y + v.y);
    let turn = axis.sign() * (u.x * v.y - u.y * v.x);
    let sum_len = (sum.x * sum.x + sum.y * sum.y).sqrt();

    if turn > 0.0 {
        sum
    } else if turn < 0.0 && sum_len > 1e-12 {
        // Gap wider than a half turn: bisect the reflex side
        Point::new(-sum.x, -sum.y)
    } else {
        let sign = axis.sign();
        Point::new(-sign * u.y, sign * u.x)
    }
}

fn unit(source: &Point, target: &Point) -> Point {
    let dx = target.x - source.x;
    let dy = target.y - source.y;
    let len = (dx * dx + dy * dy).sqrt();
    Point::new(dx / len, dy / len)
}

fn nearest_in_wedge(
    active: &ActiveSet,
    walls: &[Edge],
    source: &Point,
    direction: &Point,
    bearing: &Bearing,
) -> Result<usize, VisibilityError> {
    active.nearest(walls, source, direction).ok_or_else(|| {
        error!(
            "No wall crosses the sweep ray past ({}, {}); {} walls active",
            bearing.ray.x,
            bearing.ray.y,
            active.walls.len()
        );
        VisibilityError::EmptyActiveSet {
            x: bearing.ray.x,
            y: bearing.ray.y,
        }
    })
}

/// Where the ray through `bearing` meets `wall`
///
/// A wall endpoint on the bearing is returned exactly; otherwise the ray is
/// intersected with the wall's supporting line, falling back to the bearing's
/// own vertex if the two are parallel.
fn wall_hit(wall: &Edge, bearing: &Bearing, source: &Point) -> Point {
    if let Some(event) = bearing.events.iter().find(|e| wall.has_endpoint(&e.point)) {
        return event.point;
    }
    wall.line_intersection(source, &bearing.ray).unwrap_or(bearing.ray)
}

fn wedge_triangle(source: &Point, from: &Bearing, to: &Bearing, wall: &Edge) -> Triangle {
    Triangle {
        source: *source,
        start: wall_hit(wall, from, source),
        end: wall_hit(wall, to, source),
    }
}
