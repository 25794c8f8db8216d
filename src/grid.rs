use crate::edge::Edge;
use crate::geometry::Point;
use crate::visibility::Arena;

/// State of a single tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tile {
    #[default]
    Free,
    Blocked,
}

/// Which side of a wall the blocked tile lies on; only walls facing the same
/// way are merged into one segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Facing {
    Negative,
    Positive,
}

/// Tile map from which occluding walls are derived
#[derive(Clone, Debug)]
pub struct Grid {
    pub rows: i32,
    pub cols: i32,
    pub cells: Vec<Tile>,
    /// Revision number - incremented whenever a tile changes
    pub revision: u64,
}

impl Grid {
    /// Create a new grid with all tiles free
    pub fn new(rows: i32, cols: i32) -> Self {
        Grid {
            rows,
            cols,
            cells: vec![Tile::Free; (rows.max(0) * cols.max(0)) as usize],
            revision: 0,
        }
    }

    /// Create a grid with specific blocked cells
    pub fn with_blocked(rows: i32, cols: i32, blocked: &[i32]) -> Self {
        let mut grid = Self::new(rows, cols);
        for &cell_id in blocked {
            if cell_id >= 0 && cell_id < (rows * cols) {
                grid.cells[cell_id as usize] = Tile::Blocked;
            }
        }
        grid
    }

    /// Check if a tile at (x, y) is blocked; out of bounds counts as blocked
    pub fn is_blocked(&self, x: i32, y: i32) -> bool {
        self.get_tile(x, y) == Tile::Blocked
    }

    /// Convert (x, y) coordinates to cell ID
    pub fn get_id(&self, x: i32, y: i32) -> i32 {
        x + y * self.cols
    }

    /// Convert cell ID to (x, y) coordinates
    pub fn get_coords(&self, id: i32) -> (i32, i32) {
        (id % self.cols, id / self.cols)
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.cols && y >= 0 && y < self.rows
    }

    pub fn get_tile(&self, x: i32, y: i32) -> Tile {
        if !self.in_bounds(x, y) {
            return Tile::Blocked;
        }
        self.cells[self.get_id(x, y) as usize]
    }

    /// Set tile at (x, y), bumping the revision if it changed
    pub fn set_tile(&mut self, x: i32, y: i32, tile: Tile) {
        if self.in_bounds(x, y) {
            let id = self.get_id(x, y) as usize;
            if self.cells[id] != tile {
                self.cells[id] = tile;
                self.revision += 1;
            }
        }
    }

    pub fn toggle(&mut self, x: i32, y: i32) {
        let next = match self.get_tile(x, y) {
            Tile::Free => Tile::Blocked,
            Tile::Blocked => Tile::Free,
        };
        self.set_tile(x, y, next);
    }

    /// IDs of all blocked tiles in row-major order
    pub fn blocked_cells(&self) -> Vec<i32> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, tile)| **tile == Tile::Blocked)
            .map(|(id, _)| id as i32)
            .collect()
    }

    pub fn get_revision(&self) -> u64 {
        self.revision
    }

    /// Arena spanned by the grid at the given tile size
    pub fn arena(&self, tile_size: f64) -> Arena {
        Arena::new(self.cols as f64 * tile_size, self.rows as f64 * tile_size)
    }

    /// Walls separating blocked tiles from free tiles, scaled by `tile_size`
    ///
    /// Unit edges on one grid line that face the same way are merged into a
    /// single wall. Edges on the outer border are skipped: the arena walls
    /// already cover them.
    pub fn boundary_walls(&self, tile_size: f64) -> Vec<Edge> {
        let mut walls = Vec::new();

        // Horizontal grid lines: tile (x, y - 1) above, (x, y) below
        for y in 1..self.rows {
            let facings: Vec<Option<Facing>> = (0..self.cols)
                .map(|x| facing(self.is_blocked(x, y - 1), self.is_blocked(x, y)))
                .collect();
            for (from, to) in runs(&facings) {
                walls.push(Edge::new(
                    scaled(from, y, tile_size),
                    scaled(to, y, tile_size),
                ));
            }
        }

        // Vertical grid lines: tile (x - 1, y) left, (x, y) right
        for x in 1..self.cols {
            let facings: Vec<Option<Facing>> = (0..self.rows)
                .map(|y| facing(self.is_blocked(x - 1, y), self.is_blocked(x, y)))
                .collect();
            for (from, to) in runs(&facings) {
                walls.push(Edge::new(
                    scaled(x, from, tile_size),
                    scaled(x, to, tile_size),
                ));
            }
        }

        walls
    }
}

fn facing(before_blocked: bool, after_blocked: bool) -> Option<Facing> {
    match (before_blocked, after_blocked) {
        (true, false) => Some(Facing::Positive),
        (false, true) => Some(Facing::Negative),
        _ => None,
    }
}

/// Maximal runs of equal facing as half-open unit ranges [from, to)
fn runs(facings: &[Option<Facing>]) -> Vec<(i32, i32)> {
    let mut result = Vec::new();
    let mut i = 0;
    while i < facings.len() {
        let Some(current) = facings[i] else {
            i += 1;
            continue;
        };
        let start = i;
        while i < facings.len() && facings[i] == Some(current) {
            i += 1;
        }
        result.push((start as i32, i as i32));
    }
    result
}

fn scaled(x: i32, y: i32, tile_size: f64) -> Point {
    Point::new(x as f64 * tile_size, y as f64 * tile_size)
}
