#![allow(dead_code)]

use rustsight::geometry::{self, segments_intersect};
use rustsight::map_file::{load_layout, MapLayout};
use rustsight::{build_visibility_triangles, Arena, Axis, Edge, Grid, Point, Triangle};
use std::f64::consts::TAU;
use std::fs;
use std::path::{Path, PathBuf};

pub const TILE_SIZE: f64 = 10.0;
pub const EPSILON: f64 = 1e-6;

/// All map files under test_data/maps, sorted by name
pub fn map_paths() -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = fs::read_dir("./test_data/maps")
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .map(|e| e.path())
                .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("txt"))
                .collect()
        })
        .unwrap_or_default();
    paths.sort();
    paths
}

pub fn load_map(path: &Path) -> MapLayout {
    load_layout(path).unwrap_or_else(|e| panic!("failed to load {}: {}", path.display(), e))
}

/// Walls, source and arena of a layout at the shared test tile size
pub fn scene(layout: &MapLayout) -> (Vec<Edge>, Point, Arena) {
    (
        layout.grid.boundary_walls(TILE_SIZE),
        layout.source_point(TILE_SIZE),
        layout.grid.arena(TILE_SIZE),
    )
}

pub fn sweep_layout(layout: &MapLayout, axis: Axis) -> Vec<Triangle> {
    let (walls, source, arena) = scene(layout);
    build_visibility_triangles(&walls, source, arena, axis)
        .unwrap_or_else(|e| panic!("sweep failed for {:?}: {}", source, e))
}

pub fn total_area(triangles: &[Triangle]) -> f64 {
    triangles.iter().map(Triangle::area).sum()
}

/// True if `a` and `b` lie on one ray leaving `source`
pub fn on_same_ray(source: &Point, a: &Point, b: &Point) -> bool {
    let scale = source.distance(a) * source.distance(b);
    let dot = (a.x - source.x) * (b.x - source.x) + (a.y - source.y) * (b.y - source.y);
    geometry::cross(source, a, b).abs() <= EPSILON * scale.max(1.0) && dot > 0.0
}

/// Check the structural properties every visibility fan must have
pub fn assert_valid_fan(
    triangles: &[Triangle],
    walls: &[Edge],
    source: Point,
    arena: Arena,
    axis: Axis,
    name: &str,
) {
    assert!(!triangles.is_empty(), "{}: empty fan", name);
    let all_walls: Vec<Edge> = walls.iter().copied().chain(arena.boundary_walls()).collect();

    let mut span = 0.0;
    for (i, triangle) in triangles.iter().enumerate() {
        assert_eq!(triangle.source, source, "{}: triangle {} has wrong apex", name, i);
        assert!(triangle.area() > 0.0, "{}: triangle {} is degenerate", name, i);

        let expected_sign = match axis {
            Axis::YUp => 1.0,
            Axis::YDown => -1.0,
        };
        assert!(
            triangle.signed_area() * expected_sign > 0.0,
            "{}: triangle {} winds the wrong way",
            name,
            i
        );

        for point in [triangle.start, triangle.end] {
            assert!(
                point.x >= -EPSILON
                    && point.x <= arena.width + EPSILON
                    && point.y >= -EPSILON
                    && point.y <= arena.height + EPSILON,
                "{}: triangle {} leaves the arena at {:?}",
                name,
                i,
                point
            );
            let on_wall = all_walls.iter().any(|w| w.distance(&point) <= EPSILON);
            assert!(on_wall, "{}: triangle {} point {:?} is not on a wall", name, i, point);
        }

        // Just short of the far side, the wedge is unobstructed
        let mid = Point::new(
            (triangle.start.x + triangle.end.x) / 2.0,
            (triangle.start.y + triangle.end.y) / 2.0,
        );
        let probe = Point::new(
            source.x + (mid.x - source.x) * 0.999,
            source.y + (mid.y - source.y) * 0.999,
        );
        let blocker = all_walls
            .iter()
            .find(|w| segments_intersect(&source, &probe, &w.start(), &w.end()));
        assert!(
            blocker.is_none(),
            "{}: triangle {} is crossed by {:?}",
            name,
            i,
            blocker
        );

        let next = &triangles[(i + 1) % triangles.len()];
        assert!(
            on_same_ray(&source, &triangle.end, &next.start),
            "{}: triangles {} and {} do not share a ray",
            name,
            i,
            (i + 1) % triangles.len()
        );

        span += triangle.angular_span();
    }

    assert!(
        (span - TAU).abs() < EPSILON,
        "{}: fan spans {} radians instead of a full turn",
        name,
        span
    );
}

/// Mirror a layout left-right
pub fn flip_horizontal(layout: &MapLayout) -> MapLayout {
    flip(layout, true, false)
}

/// Mirror a layout top-bottom
pub fn flip_vertical(layout: &MapLayout) -> MapLayout {
    flip(layout, false, true)
}

/// Mirror a layout both ways
pub fn flip_both(layout: &MapLayout) -> MapLayout {
    flip(layout, true, true)
}

fn flip(layout: &MapLayout, horizontal: bool, vertical: bool) -> MapLayout {
    let grid = &layout.grid;
    let map_x = |x: i32| if horizontal { grid.cols - 1 - x } else { x };
    let map_y = |y: i32| if vertical { grid.rows - 1 - y } else { y };

    let blocked: Vec<i32> = grid
        .blocked_cells()
        .into_iter()
        .map(|id| {
            let (x, y) = grid.get_coords(id);
            grid.get_id(map_x(x), map_y(y))
        })
        .collect();

    MapLayout {
        grid: Grid::with_blocked(grid.rows, grid.cols, &blocked),
        source_x: map_x(layout.source_x),
        source_y: map_y(layout.source_y),
    }
}

/// The original layout and its three mirror images, named
pub fn variants(layout: &MapLayout) -> Vec<(&'static str, MapLayout)> {
    vec![
        ("original", layout.clone()),
        ("h_flip", flip_horizontal(layout)),
        ("v_flip", flip_vertical(layout)),
        ("hv_flip", flip_both(layout)),
    ]
}
