use crate::geometry::Point;
use crate::grid::{Grid, Tile};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SaveStateError {
    #[error("failed to access save file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to (de)serialize save state: {0}")]
    Json(#[from] serde_json::Error),
}

/// Save state containing the tile grid and source position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveState {
    /// Grid revision number
    pub grid_revision: u64,
    /// Grid dimensions
    pub grid_cols: i32,
    pub grid_rows: i32,
    pub tile_size: f64,
    /// Blocked cells (stored as cell IDs)
    pub blocked_cells: Vec<i32>,
    /// Source position in world coordinates
    pub source_x: f64,
    pub source_y: f64,
}

impl SaveState {
    pub fn from_grid_and_source(grid: &Grid, source: Point, tile_size: f64) -> Self {
        SaveState {
            grid_revision: grid.get_revision(),
            grid_cols: grid.cols,
            grid_rows: grid.rows,
            tile_size,
            blocked_cells: grid.blocked_cells(),
            source_x: source.x,
            source_y: source.y,
        }
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), SaveStateError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SaveStateError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Rebuild the grid; the revision is carried over so callers notice the change
    pub fn restore_grid(&self) -> Grid {
        let mut grid = Grid::new(self.grid_rows, self.grid_cols);
        for &cell_id in &self.blocked_cells {
            let (x, y) = grid.get_coords(cell_id);
            grid.set_tile(x, y, Tile::Blocked);
        }
        grid.revision = self.grid_revision.max(grid.revision);
        grid
    }

    pub fn source(&self) -> Point {
        Point::new(self.source_x, self.source_y)
    }
}
