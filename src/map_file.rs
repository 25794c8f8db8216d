//! Text map layouts.
//!
//! Format:
//! - `■` or `#`: blocked tile
//! - `□`, `.` or space: free tile
//! - `s`: free tile holding the source
//!
//! Blank lines are ignored; all other lines are rows of equal width.

use crate::geometry::Point;
use crate::grid::Grid;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const BLOCKED: char = '■';
pub const FREE: char = '□';
pub const SOURCE: char = 's';

#[derive(Debug, Error)]
pub enum MapFileError {
    #[error("failed to read map file: {0}")]
    Io(#[from] std::io::Error),

    #[error("map layout contains no rows")]
    Empty,

    #[error("row {row} has {found} tiles, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },

    #[error("unknown tile '{ch}' at row {row}, column {col}")]
    UnknownTile { ch: char, row: usize, col: usize },

    #[error("no source tile 's' in map layout")]
    MissingSource,

    #[error("second source tile at row {row}, column {col}")]
    DuplicateSource { row: usize, col: usize },
}

/// A tile grid together with the tile holding the source
#[derive(Debug, Clone)]
pub struct MapLayout {
    pub grid: Grid,
    pub source_x: i32,
    pub source_y: i32,
}

impl MapLayout {
    /// Center of the source tile in world coordinates
    pub fn source_point(&self, tile_size: f64) -> Point {
        Point::new(
            (self.source_x as f64 + 0.5) * tile_size,
            (self.source_y as f64 + 0.5) * tile_size,
        )
    }

    /// Render back to the text format (one row per line)
    pub fn to_layout_string(&self) -> String {
        let mut result = String::new();
        for y in 0..self.grid.rows {
            for x in 0..self.grid.cols {
                let symbol = if x == self.source_x && y == self.source_y {
                    SOURCE
                } else if self.grid.is_blocked(x, y) {
                    BLOCKED
                } else {
                    FREE
                };
                result.push(symbol);
            }
            result.push('\n');
        }
        result
    }
}

pub fn parse_layout(contents: &str) -> Result<MapLayout, MapFileError> {
    let rows: Vec<&str> = contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect();

    let Some(first) = rows.first() else {
        return Err(MapFileError::Empty);
    };
    let cols = first.chars().count();

    let mut blocked_cells = Vec::new();
    let mut source = None;

    for (y, line) in rows.iter().enumerate() {
        let width = line.chars().count();
        if width != cols {
            return Err(MapFileError::RaggedRow {
                row: y,
                expected: cols,
                found: width,
            });
        }

        for (x, ch) in line.chars().enumerate() {
            match ch {
                BLOCKED | '#' => blocked_cells.push((x + y * cols) as i32),
                FREE | '.' | ' ' => {}
                SOURCE => {
                    if source.is_some() {
                        return Err(MapFileError::DuplicateSource { row: y, col: x });
                    }
                    source = Some((x as i32, y as i32));
                }
                _ => return Err(MapFileError::UnknownTile { ch, row: y, col: x }),
            }
        }
    }

    let (source_x, source_y) = source.ok_or(MapFileError::MissingSource)?;
    Ok(MapLayout {
        grid: Grid::with_blocked(rows.len() as i32, cols as i32, &blocked_cells),
        source_x,
        source_y,
    })
}

pub fn load_layout(path: impl AsRef<Path>) -> Result<MapLayout, MapFileError> {
    let contents = fs::read_to_string(path)?;
    parse_layout(&contents)
}
