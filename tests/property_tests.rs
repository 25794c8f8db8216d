mod common;

use common::{assert_valid_fan, total_area, TILE_SIZE};
use proptest::prelude::*;
use rustsight::visibility::crossing_walls;
use rustsight::{build_visibility_triangles, Arena, Axis, Edge, Grid, Point};

fn arb_axis() -> impl Strategy<Value = Axis> {
    prop_oneof![Just(Axis::YUp), Just(Axis::YDown)]
}

/// Random tile grid with a free source tile and a source somewhere inside it
fn arb_grid_scene() -> impl Strategy<Value = (Grid, Point)> {
    (2i32..9, 2i32..9)
        .prop_flat_map(|(rows, cols)| {
            let cells = (rows * cols) as usize;
            (
                Just((rows, cols)),
                prop::collection::vec(prop::bool::weighted(0.3), cells),
                0..cells,
                0.05f64..0.95,
                0.05f64..0.95,
            )
        })
        .prop_map(|((rows, cols), blocked, source_cell, fx, fy)| {
            let blocked_ids: Vec<i32> = blocked
                .iter()
                .enumerate()
                .filter(|(id, b)| **b && *id != source_cell)
                .map(|(id, _)| id as i32)
                .collect();
            let grid = Grid::with_blocked(rows, cols, &blocked_ids);
            let (x, y) = grid.get_coords(source_cell as i32);
            let source = Point::new((x as f64 + fx) * TILE_SIZE, (y as f64 + fy) * TILE_SIZE);
            (grid, source)
        })
}

fn arb_segment() -> impl Strategy<Value = Edge> {
    (1.0f64..99.0, 1.0f64..99.0, 1.0f64..99.0, 1.0f64..99.0)
        .prop_map(|(x1, y1, x2, y2)| Edge::from_coords(x1, y1, x2, y2))
}

/// Keep segments that neither cross earlier ones nor pass close to the source
fn disjoint_walls(candidates: &[Edge], source: &Point) -> Vec<Edge> {
    let mut walls: Vec<Edge> = Vec::new();
    for candidate in candidates {
        if candidate.length() < 1.0 || candidate.distance(source) < 1.0 {
            continue;
        }
        let mut trial = walls.clone();
        trial.push(*candidate);
        if crossing_walls(&trial).is_empty() {
            walls = trial;
        }
    }
    walls
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn grid_fans_are_valid((grid, source) in arb_grid_scene(), axis in arb_axis()) {
        let walls = grid.boundary_walls(TILE_SIZE);
        let arena = grid.arena(TILE_SIZE);
        let triangles = build_visibility_triangles(&walls, source, arena, axis).unwrap();

        assert_valid_fan(&triangles, &walls, source, arena, axis, "random grid");
        prop_assert!(total_area(&triangles) <= arena.width * arena.height + 1e-6);
    }

    #[test]
    fn segment_fans_are_valid(
        candidates in prop::collection::vec(arb_segment(), 0..8),
        sx in 5.0f64..95.0,
        sy in 5.0f64..95.0,
        axis in arb_axis(),
    ) {
        let source = Point::new(sx, sy);
        let arena = Arena::new(100.0, 100.0);
        let walls = disjoint_walls(&candidates, &source);
        let triangles = build_visibility_triangles(&walls, source, arena, axis).unwrap();

        assert_valid_fan(&triangles, &walls, source, arena, axis, "random segments");
        prop_assert!(total_area(&triangles) <= 10000.0 + 1e-6);
    }

    #[test]
    fn axis_choice_only_changes_order(
        candidates in prop::collection::vec(arb_segment(), 0..6),
        sx in 5.0f64..95.0,
        sy in 5.0f64..95.0,
    ) {
        let source = Point::new(sx, sy);
        let arena = Arena::new(100.0, 100.0);
        let walls = disjoint_walls(&candidates, &source);

        let up = build_visibility_triangles(&walls, source, arena, Axis::YUp).unwrap();
        let down = build_visibility_triangles(&walls, source, arena, Axis::YDown).unwrap();
        prop_assert_eq!(up.len(), down.len());
        prop_assert!((total_area(&up) - total_area(&down)).abs() < 1e-6);
    }
}
