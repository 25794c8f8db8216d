pub mod config;
pub mod edge;
pub mod geometry;
pub mod grid;
pub mod map_file;
pub mod save_state;
pub mod visibility;

pub use edge::Edge;
pub use geometry::{Axis, Point};
pub use grid::Grid;
pub use visibility::{build_visibility_triangles, Arena, Triangle, VisibilityError};
