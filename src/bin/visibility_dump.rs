/// Headless visibility dump
///
/// Loads a map layout, runs the sweep from its source tile and prints the
/// walls, arena and triangle fan as JSON on stdout.

use log::{error, warn};
use rustsight::map_file::load_layout;
use rustsight::visibility::{crossing_walls, visibility_outline};
use rustsight::{build_visibility_triangles, Arena, Axis, Edge, Point, Triangle};
use serde::Serialize;
use std::env;
use std::process;

#[derive(Serialize)]
struct Dump {
    arena: Arena,
    source: Point,
    axis: Axis,
    walls: Vec<Edge>,
    triangles: Vec<Triangle>,
    outline: Vec<Point>,
    total_area: f64,
}

struct Args {
    map_path: String,
    tile_size: f64,
    axis: Axis,
}

fn usage(program: &str) -> ! {
    eprintln!("Usage: {} <map.txt> [--tile-size N] [--y-up]", program);
    eprintln!("Prints the visibility fan of the map's source tile as JSON");
    process::exit(1);
}

fn parse_args() -> Args {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("visibility_dump");

    let mut map_path = None;
    let mut tile_size = 1.0;
    let mut axis = Axis::YDown;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--tile-size" => {
                i += 1;
                match args.get(i).and_then(|v| v.parse::<f64>().ok()) {
                    Some(size) if size > 0.0 => tile_size = size,
                    _ => usage(program),
                }
            }
            "--y-up" => axis = Axis::YUp,
            path if map_path.is_none() && !path.starts_with("--") => {
                map_path = Some(path.to_string())
            }
            _ => usage(program),
        }
        i += 1;
    }

    match map_path {
        Some(map_path) => Args {
            map_path,
            tile_size,
            axis,
        },
        None => usage(program),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = parse_args();

    let layout = match load_layout(&args.map_path) {
        Ok(layout) => layout,
        Err(e) => {
            error!("{}: {}", args.map_path, e);
            process::exit(1);
        }
    };

    let arena = layout.grid.arena(args.tile_size);
    let source = layout.source_point(args.tile_size);
    let walls = layout.grid.boundary_walls(args.tile_size);

    let crossings = crossing_walls(&walls);
    if !crossings.is_empty() {
        warn!("{} wall pairs cross; output may be unreliable", crossings.len());
    }

    let triangles = match build_visibility_triangles(&walls, source, arena, args.axis) {
        Ok(triangles) => triangles,
        Err(e) => {
            error!("Visibility sweep failed: {}", e);
            process::exit(1);
        }
    };

    let dump = Dump {
        arena,
        source,
        axis: args.axis,
        walls,
        outline: visibility_outline(&triangles),
        total_area: triangles.iter().map(Triangle::area).sum(),
        triangles,
    };

    match serde_json::to_string_pretty(&dump) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            error!("Failed to serialize output: {}", e);
            process::exit(1);
        }
    }
}
