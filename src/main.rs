//! maze3d: a first-person 3D maze
//!
//! The maze is a "cubicmap": a small image where white pixels are walls
//! and black pixels are open floor. It is turned into a textured mesh of
//! culled cube faces, and the player walks through it with mouse-look and
//! WASD/EQ while a circle-vs-rectangle test keeps them out of the walls.
//!
//! Usage:
//!   cargo xtask gen-assets          # Create assets/maps/maze.png and assets/textures/cubicmap_atlas.png
//!   maze3d [config.ron]             # Play; without a config, ./maze3d.ron then the per-user config
//!   maze3d --write-config [PATH]    # Write the default config (per-user location if no PATH)
//!
//! The assets are generated, not committed: run `cargo xtask gen-assets`
//! once before the first start. A missing map opens an empty world.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod camera;
mod collision;
mod config;
mod cubicmap;
mod frame;
mod game;
mod input;
mod math;
mod render;

use std::path::PathBuf;
use clap::Parser;
use macroquad::prelude::*;
use config::{ConfigError, GameConfig};
use cubicmap::Grid;
use frame::FrameLimiter;
use game::MazeGame;
use input::{Action, Button, InputSample, InputState};
use render::MapModel;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "maze3d", version)]
#[command(about = "First-person 3D maze built from a cubicmap image")]
struct Cli {
    /// Config file (default: ./maze3d.ron, then the per-user config)
    config: Option<PathBuf>,
    /// Write the default config to PATH (or the per-user config) and exit
    #[arg(long, value_name = "PATH")]
    write_config: Option<Option<PathBuf>>,
}

/// Frames between frame-rate debug logs
const FPS_LOG_INTERVAL: u64 = 120;

fn window_conf() -> Conf {
    // Runs before logging is up, so lookup problems are reported again in main
    let config = config_from_args(&Cli::parse()).unwrap_or_default();
    Conf {
        window_title: format!("{} v{}", config.window.title, VERSION),
        window_width: config.window.width,
        window_height: config.window.height,
        window_resizable: config.window.resizable,
        ..Default::default()
    }
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false))
        .init();
}

/// Config named on the command line, else the first one on the search path
fn config_from_args(cli: &Cli) -> Result<GameConfig, ConfigError> {
    match &cli.config {
        Some(path) => GameConfig::load(path),
        None => Ok(GameConfig::load_or_default()),
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    init_logging();
    let cli = Cli::parse();

    if let Some(path) = cli.write_config.clone() {
        match config::write_default_config(path) {
            Ok(path) => {
                tracing::info!("Default config written to {}", path.display());
                return;
            }
            Err(e) => {
                tracing::error!("Failed to write config: {}", e);
                std::process::exit(1);
            }
        }
    }

    tracing::info!("Window initialized successfully ({}x{})", screen_width(), screen_height());

    let config = match config_from_args(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    let grid = Grid::load_or_empty(&config.map_path);
    let (walls, open, unmapped) = grid.counts();
    tracing::debug!("Map cells: {} walls, {} open, {} unmapped", walls, open, unmapped);

    let mesh = cubicmap::generate_mesh(&grid, config.cube_size);
    match mesh.bounds() {
        Some((min, max)) => tracing::debug!("Mesh bounds: {:?} to {:?}", min, max),
        None => tracing::warn!("Map mesh is empty, nothing to draw"),
    }
    let mut model = MapModel::with_atlas(mesh, &config.atlas_path);
    let tint = render::color_from_rgba(config.tint);

    let mut game = MazeGame::new(grid, &config);
    let mut input = InputState::new();
    let mut limiter = FrameLimiter::new(config.target_fps);

    if config.window.grab_cursor {
        set_cursor_grab(true);
        show_mouse(false);
    }

    let mut last_cell = None;
    loop {
        input.begin_frame(InputSample::poll(&config.bindings));
        if input.action_down(Action::Quit) {
            break;
        }
        // Focus loss can release the grab; clicking takes it back
        if config.window.grab_cursor && input.mouse_pressed(Button::Left) {
            set_cursor_grab(true);
            show_mouse(false);
        }

        let report = game.update(&input);
        if let Some((x, z)) = report.reported_cell {
            tracing::info!("Player map cell position: ({}, {})", x, z);
        }
        if report.player_cell != last_cell {
            tracing::debug!("Entered cell {:?} at {:?}", report.player_cell, report.position);
            last_cell = report.player_cell;
        }
        if report.collided {
            tracing::trace!("Held at {:?}", report.position);
        }

        render::draw_frame(&mut model, game.camera(), config.map_position, 1.0, tint);

        limiter.sync(get_time);
        if game.frame() % FPS_LOG_INTERVAL == 0 {
            tracing::debug!("{:.1} fps ({:.2} ms/frame)", limiter.fps(), limiter.frame_time() * 1000.0);
        }
        next_frame().await;
    }

    tracing::info!("Window closed after {} frames", game.frame());
}
