use crate::geometry::{Axis, Point};
use crate::visibility::Arena;
use log::{info, warn};
use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub sweep: SweepConfig,
    #[serde(default)]
    pub visual: VisualConfig,
    #[serde(default)]
    pub default_map_file: DefaultMapFileConfig,
    #[serde(default)]
    pub save: SaveConfig,
}

#[derive(Debug, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_cols")]
    pub cols: i32,
    #[serde(default = "default_rows")]
    pub rows: i32,
    #[serde(default = "default_tile_size")]
    pub tile_size: f64,
}

#[derive(Debug, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_source_x")]
    pub x: f64,
    #[serde(default = "default_source_y")]
    pub y: f64,
    #[serde(default = "default_source_radius")]
    pub radius: f32,
}

#[derive(Debug, Deserialize)]
pub struct SweepConfig {
    /// Screen coordinates grow downwards
    #[serde(default = "default_axis")]
    pub axis: Axis,
}

#[derive(Debug, Deserialize)]
pub struct VisualConfig {
    #[serde(default = "default_window_title")]
    pub window_title: String,
    #[serde(default = "default_bg_r")]
    pub background_r: u8,
    #[serde(default = "default_bg_g")]
    pub background_g: u8,
    #[serde(default = "default_bg_b")]
    pub background_b: u8,
    #[serde(default = "default_show_grid")]
    pub show_grid: bool,
    #[serde(default = "default_show_walls")]
    pub show_walls: bool,
}

#[derive(Debug, Deserialize)]
pub struct DefaultMapFileConfig {
    #[serde(default = "default_map_file_path")]
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct SaveConfig {
    #[serde(default = "default_save_path")]
    pub path: String,
}

// Default values
fn default_cols() -> i32 { 20 }
fn default_rows() -> i32 { 15 }
fn default_tile_size() -> f64 { 40.0 }
fn default_source_x() -> f64 { 400.0 }
fn default_source_y() -> f64 { 300.0 }
fn default_source_radius() -> f32 { 10.0 }
fn default_axis() -> Axis { Axis::YDown }
fn default_window_title() -> String { "RustSight - Visibility Polygon Demo".to_string() }
fn default_bg_r() -> u8 { 0 }
fn default_bg_g() -> u8 { 0 }
fn default_bg_b() -> u8 { 0 }
fn default_show_grid() -> bool { true }
fn default_show_walls() -> bool { true }
fn default_map_file_path() -> String { "maps/default_map.txt".to_string() }
fn default_save_path() -> String { "visibility_save.json".to_string() }

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cols: default_cols(),
            rows: default_rows(),
            tile_size: default_tile_size(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            x: default_source_x(),
            y: default_source_y(),
            radius: default_source_radius(),
        }
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            axis: default_axis(),
        }
    }
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            window_title: default_window_title(),
            background_r: default_bg_r(),
            background_g: default_bg_g(),
            background_b: default_bg_b(),
            show_grid: default_show_grid(),
            show_walls: default_show_walls(),
        }
    }
}

impl Default for DefaultMapFileConfig {
    fn default() -> Self {
        Self {
            path: default_map_file_path(),
        }
    }
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            path: default_save_path(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            source: SourceConfig::default(),
            sweep: SweepConfig::default(),
            visual: VisualConfig::default(),
            default_map_file: DefaultMapFileConfig::default(),
            save: SaveConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from config.toml, or use defaults if it is missing or invalid
    pub fn load() -> Self {
        match fs::read_to_string("config.toml") {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => {
                    info!("Loaded configuration from config.toml");
                    config
                }
                Err(e) => {
                    warn!("Failed to parse config.toml: {}", e);
                    warn!("Using default configuration");
                    Config::default()
                }
            },
            Err(_) => {
                info!("No config.toml found, using default configuration");
                Config::default()
            }
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn arena(&self) -> Arena {
        Arena::new(
            self.grid.cols as f64 * self.grid.tile_size,
            self.grid.rows as f64 * self.grid.tile_size,
        )
    }

    pub fn source_point(&self) -> Point {
        Point::new(self.source.x, self.source.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_empty_file() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.grid.cols, 20);
        assert_eq!(config.sweep.axis, Axis::YDown);
        assert_eq!(config.arena(), Arena::new(800.0, 600.0));
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::from_toml_str(
            "[grid]\ncols = 10\ntile_size = 8.0\n\n[sweep]\naxis = \"y_up\"\n",
        )
        .unwrap();
        assert_eq!(config.grid.cols, 10);
        assert_eq!(config.grid.rows, 15);
        assert_eq!(config.sweep.axis, Axis::YUp);
        assert_eq!(config.arena(), Arena::new(80.0, 120.0));
    }

    #[test]
    fn test_rejects_unknown_axis() {
        assert!(Config::from_toml_str("[sweep]\naxis = \"sideways\"\n").is_err());
    }
}
