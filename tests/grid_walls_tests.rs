mod common;

use common::{load_map, map_paths, variants, TILE_SIZE};
use rustsight::visibility::crossing_walls;
use rustsight::{Edge, Grid};

#[test]
fn merged_runs_form_single_walls() {
    // Two blocked tiles side by side share one top and one bottom wall
    let grid = Grid::with_blocked(3, 4, &[5, 6]);
    let mut walls = grid.boundary_walls(1.0);
    walls.sort();
    assert_eq!(
        walls,
        vec![
            Edge::from_coords(1.0, 1.0, 1.0, 2.0),
            Edge::from_coords(1.0, 1.0, 3.0, 1.0),
            Edge::from_coords(1.0, 2.0, 3.0, 2.0),
            Edge::from_coords(3.0, 1.0, 3.0, 2.0),
        ]
    );
}

#[test]
fn opposite_facings_are_not_merged() {
    // Tile (0,0) blocked above the line, tile (1,1) blocked below it
    let grid = Grid::with_blocked(2, 2, &[0, 3]);
    let mut walls = grid.boundary_walls(1.0);
    walls.sort();
    assert_eq!(
        walls,
        vec![
            Edge::from_coords(0.0, 1.0, 1.0, 1.0),
            Edge::from_coords(1.0, 0.0, 1.0, 1.0),
            Edge::from_coords(1.0, 1.0, 1.0, 2.0),
            Edge::from_coords(1.0, 1.0, 2.0, 1.0),
        ]
    );
}

#[test]
fn border_tiles_add_no_border_walls() {
    let grid = Grid::with_blocked(2, 3, &[0, 1, 2]);
    let walls = grid.boundary_walls(5.0);
    assert_eq!(walls, vec![Edge::from_coords(0.0, 5.0, 15.0, 5.0)]);
}

#[test]
fn empty_and_full_grids_have_no_walls() {
    assert!(Grid::new(4, 4).boundary_walls(1.0).is_empty());
    let all: Vec<i32> = (0..16).collect();
    assert!(Grid::with_blocked(4, 4, &all).boundary_walls(1.0).is_empty());
}

#[test]
fn grid_walls_never_cross() {
    for path in map_paths() {
        let layout = load_map(&path);
        for (variant_name, variant) in variants(&layout) {
            let walls = variant.grid.boundary_walls(TILE_SIZE);
            assert!(
                crossing_walls(&walls).is_empty(),
                "{} [{}]: grid walls cross",
                path.display(),
                variant_name
            );
        }
    }
}

#[test]
fn walls_stay_inside_the_arena() {
    for path in map_paths() {
        let layout = load_map(&path);
        let arena = layout.grid.arena(TILE_SIZE);
        for wall in layout.grid.boundary_walls(TILE_SIZE) {
            assert!(arena.contains(&wall.start()) && arena.contains(&wall.end()));
            assert!(!arena.lies_on_boundary(&wall), "{:?} runs along the border", wall);
            assert!(wall.length() >= TILE_SIZE);
        }
    }
}
