use arboard::Clipboard;
use log::{error, info, warn};
use macroquad::prelude::*;
use rustsight::config::Config;
use rustsight::map_file::{load_layout, MapLayout};
use rustsight::save_state::SaveState;
use rustsight::{build_visibility_triangles, Axis, Edge, Grid, Point, Triangle};

fn window_conf() -> Conf {
    let config = Config::load();
    let arena = config.arena();
    Conf {
        window_title: config.visual.window_title.clone(),
        window_width: arena.width as i32,
        window_height: arena.height as i32,
        ..Default::default()
    }
}

/// Visualization state
struct DemoState {
    grid: Grid,
    tile_size: f64,
    source: Point,
    axis: Axis,
    walls: Vec<Edge>,
    triangles: Vec<Triangle>,
    /// (grid revision, source) the cached triangles were built for
    computed_for: Option<(u64, Point)>,
    dragging_source: bool,
    config: Config,
}

impl DemoState {
    fn new(config: Config) -> Self {
        let tile_size = config.grid.tile_size;
        let (grid, source) = match load_layout(&config.default_map_file.path) {
            Ok(layout) => {
                info!(
                    "Loaded map {} ({}x{})",
                    config.default_map_file.path, layout.grid.cols, layout.grid.rows
                );
                let source = layout.source_point(tile_size);
                (layout.grid, source)
            }
            Err(e) => {
                warn!("Could not load map {}: {}", config.default_map_file.path, e);
                (
                    Grid::new(config.grid.rows, config.grid.cols),
                    config.source_point(),
                )
            }
        };

        let mut state = DemoState {
            grid,
            tile_size,
            source,
            axis: config.sweep.axis,
            walls: Vec::new(),
            triangles: Vec::new(),
            computed_for: None,
            dragging_source: false,
            config,
        };
        state.clamp_source();
        state.fit_window();
        state
    }

    fn fit_window(&self) {
        let arena = self.grid.arena(self.tile_size);
        request_new_screen_size(arena.width as f32, arena.height as f32);
    }

    /// Keep the source strictly inside the arena
    fn clamp_source(&mut self) {
        let arena = self.grid.arena(self.tile_size);
        let margin = 0.5;
        self.source = Point::new(
            self.source.x.clamp(margin, arena.width - margin),
            self.source.y.clamp(margin, arena.height - margin),
        );
    }

    fn source_tile(&self) -> (i32, i32) {
        (
            (self.source.x / self.tile_size) as i32,
            (self.source.y / self.tile_size) as i32,
        )
    }

    fn handle_input(&mut self) {
        let (mouse_x, mouse_y) = mouse_position();
        let mouse = Point::new(mouse_x as f64, mouse_y as f64);
        let grab_radius = self.config.source.radius as f64 * 1.5;

        if is_mouse_button_pressed(MouseButton::Left) {
            if mouse.distance(&self.source) <= grab_radius {
                self.dragging_source = true;
            } else {
                let grid_x = (mouse.x / self.tile_size).floor() as i32;
                let grid_y = (mouse.y / self.tile_size).floor() as i32;
                self.grid.toggle(grid_x, grid_y);
            }
        }

        if self.dragging_source {
            if is_mouse_button_down(MouseButton::Left) {
                self.source = mouse;
                self.clamp_source();
            } else {
                self.dragging_source = false;
            }
        }

        if is_mouse_button_pressed(MouseButton::Right) {
            self.source = mouse;
            self.clamp_source();
        }
    }

    fn update_visible(&mut self) {
        let key = (self.grid.get_revision(), self.source);
        if self.computed_for == Some(key) {
            return;
        }

        self.walls = self.grid.boundary_walls(self.tile_size);
        let arena = self.grid.arena(self.tile_size);
        self.triangles = match build_visibility_triangles(&self.walls, self.source, arena, self.axis) {
            Ok(triangles) => triangles,
            Err(e) => {
                error!("Visibility sweep failed: {}", e);
                Vec::new()
            }
        };
        self.computed_for = Some(key);
    }

    fn layout(&self) -> MapLayout {
        let (source_x, source_y) = self.source_tile();
        MapLayout {
            grid: self.grid.clone(),
            source_x,
            source_y,
        }
    }

    fn copy_to_clipboard(&self) {
        let layout_string = self.layout().to_layout_string();
        match Clipboard::new() {
            Ok(mut clipboard) => {
                if let Err(e) = clipboard.set_text(&layout_string) {
                    warn!("Failed to copy to clipboard: {}", e);
                } else {
                    info!("Map layout copied to clipboard");
                    // Clipboard managers need the owner alive for a moment
                    std::thread::sleep(std::time::Duration::from_millis(100));
                }
            }
            Err(e) => {
                warn!("Failed to access clipboard: {}", e);
            }
        }
    }

    fn save(&self) {
        let path = &self.config.save.path;
        let state = SaveState::from_grid_and_source(&self.grid, self.source, self.tile_size);
        match state.save_to_file(path) {
            Ok(()) => info!("Saved state to {}", path),
            Err(e) => error!("Failed to save state to {}: {}", path, e),
        }
    }

    fn load(&mut self) {
        let path = self.config.save.path.clone();
        match SaveState::load_from_file(&path) {
            Ok(state) => {
                self.grid = state.restore_grid();
                self.tile_size = state.tile_size;
                self.source = state.source();
                self.clamp_source();
                self.computed_for = None;
                self.fit_window();
                info!("Loaded state from {}", path);
            }
            Err(e) => error!("Failed to load state from {}: {}", path, e),
        }
    }

    fn draw(&self) {
        let visual = &self.config.visual;
        clear_background(Color::from_rgba(
            visual.background_r,
            visual.background_g,
            visual.background_b,
            255,
        ));

        let size = self.tile_size as f32;
        for y in 0..self.grid.rows {
            for x in 0..self.grid.cols {
                if self.grid.is_blocked(x, y) {
                    draw_rectangle(x as f32 * size, y as f32 * size, size, size, DARKGRAY);
                } else if visual.show_grid {
                    draw_rectangle_lines(
                        x as f32 * size,
                        y as f32 * size,
                        size,
                        size,
                        1.0,
                        Color::from_rgba(40, 40, 40, 255),
                    );
                }
            }
        }

        let lit = Color::from_rgba(255, 230, 120, 110);
        for triangle in &self.triangles {
            draw_triangle(
                to_screen(&triangle.source),
                to_screen(&triangle.start),
                to_screen(&triangle.end),
                lit,
            );
        }

        if visual.show_walls {
            for wall in &self.walls {
                let (a, b) = (to_screen(&wall.start()), to_screen(&wall.end()));
                draw_line(a.x, a.y, b.x, b.y, 2.0, RED);
            }
        }

        let source = to_screen(&self.source);
        draw_circle(source.x, source.y, self.config.source.radius, YELLOW);

        let info = [
            format!("Source: ({:.1}, {:.1})", self.source.x, self.source.y),
            format!("Walls: {}  Triangles: {}", self.walls.len(), self.triangles.len()),
            "Left click: toggle tile / drag source".to_string(),
            "Right click: place source".to_string(),
            "C: copy layout  S: save  L: load  Esc: quit".to_string(),
        ];
        for (i, line) in info.iter().enumerate() {
            draw_text(line, 10.0, 20.0 + i as f32 * 20.0, 20.0, WHITE);
        }
    }
}

fn to_screen(point: &Point) -> Vec2 {
    vec2(point.x as f32, point.y as f32)
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut state = DemoState::new(Config::load());

    loop {
        state.handle_input();

        if is_key_pressed(KeyCode::C) {
            state.copy_to_clipboard();
        }
        if is_key_pressed(KeyCode::S) {
            state.save();
        }
        if is_key_pressed(KeyCode::L) {
            state.load();
        }
        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        state.update_visible();
        state.draw();

        next_frame().await
    }
}
