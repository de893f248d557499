//! Asset tasks for maze3d
//!
//! Usage:
//!   cargo xtask gen-assets                   # Default maze + texture atlas into assets/
//!   cargo xtask gen-assets --layout maze.txt # Maze from an ASCII layout ('#' wall, '.' open)

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Asset generation for maze3d")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the cubicmap maze image and the 2x2 texture atlas
    GenAssets {
        /// ASCII layout file ('#' wall, '.' or ' ' open, anything else unmapped)
        #[arg(long)]
        layout: Option<PathBuf>,
        /// Atlas quadrant size in pixels
        #[arg(long, default_value_t = 64)]
        tile: u32,
        /// Output directory (default: <project>/assets)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::GenAssets { layout, tile, out } => gen_assets(layout, tile, out),
    }
}

/// Get the project root directory
fn project_root() -> Result<PathBuf> {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .context("xtask has no parent directory")
}

const DEFAULT_LAYOUT: &str = "\
################
#..............#
#.######.#####.#
#.#....#.#...#.#
#.#.##.#.#.#.#.#
#...#..#...#...#
###.#.######.###
#...#......#...#
#.####.###.###.#
#......#.......#
#.######.#####.#
#.#......#...#.#
#.#.######.#.#.#
#...#......#...#
#.#...####...#.#
################";

const WALL: Rgba<u8> = Rgba([255, 255, 255, 255]);
const OPEN: Rgba<u8> = Rgba([0, 0, 0, 255]);
const UNMAPPED: Rgba<u8> = Rgba([128, 128, 128, 255]);

/// One pixel per cell
fn maze_image(layout: &str) -> Result<RgbaImage> {
    let rows: Vec<&str> = layout.lines().filter(|l| !l.trim().is_empty()).collect();
    let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
    if rows.is_empty() || width == 0 {
        anyhow::bail!("layout is empty");
    }

    let mut img = RgbaImage::from_pixel(width as u32, rows.len() as u32, OPEN);
    for (z, row) in rows.iter().enumerate() {
        for (x, c) in row.chars().enumerate() {
            let px = match c {
                '#' => WALL,
                '.' | ' ' => OPEN,
                _ => UNMAPPED,
            };
            img.put_pixel(x as u32, z as u32, px);
        }
    }
    Ok(img)
}

/// Cheap deterministic per-pixel noise
fn hash(x: u32, y: u32) -> u8 {
    let mut h = x.wrapping_mul(374_761_393) ^ y.wrapping_mul(668_265_263);
    h = (h ^ (h >> 13)).wrapping_mul(1_274_126_177);
    (h >> 24) as u8
}

fn shade(base: [u8; 3], amount: i16) -> Rgba<u8> {
    let c = |v: u8| (v as i16 + amount).clamp(0, 255) as u8;
    Rgba([c(base[0]), c(base[1]), c(base[2]), 255])
}

/// Quadrant painters, all taking local (x, y) within a `tile`-sized square
fn brick(x: u32, y: u32, tile: u32) -> Rgba<u8> {
    let row_h = (tile / 4).max(1);
    let brick_w = (tile / 2).max(1);
    let row = y / row_h;
    let offset = if row % 2 == 0 { 0 } else { brick_w / 2 };
    let mortar = y % row_h == 0 || (x + offset) % brick_w == 0;
    if mortar {
        shade([170, 165, 150], hash(x, y) as i16 / 16)
    } else {
        shade([150, 60, 45], hash(x, y) as i16 / 8 - 16)
    }
}

fn stone(x: u32, y: u32, tile: u32) -> Rgba<u8> {
    let block = (tile / 2).max(1);
    let edge = x % block == 0 || y % block == 0;
    let base = if edge { [60, 60, 70] } else { [110, 110, 120] };
    shade(base, hash(x / 2, y / 2) as i16 / 8 - 16)
}

fn ceiling(x: u32, y: u32, tile: u32) -> Rgba<u8> {
    let plank = (tile / 8).max(1);
    let seam = x % plank == 0;
    shade(if seam { [70, 50, 30] } else { [120, 90, 60] }, hash(x, y / 4) as i16 / 12)
}

fn floor(x: u32, y: u32, tile: u32) -> Rgba<u8> {
    let cell = (tile / 4).max(1);
    let light = ((x / cell) + (y / cell)) % 2 == 0;
    shade(if light { [140, 140, 130] } else { [90, 90, 85] }, hash(x, y) as i16 / 16 - 8)
}

/// 2x2 atlas: walls in the top row (right/front left, back/left right),
/// top face bottom-left, bottom face bottom-right
fn atlas_image(tile: u32) -> RgbaImage {
    RgbaImage::from_fn(tile * 2, tile * 2, |x, y| {
        let (lx, ly) = (x % tile, y % tile);
        match (x / tile, y / tile) {
            (0, 0) => brick(lx, ly, tile),
            (1, 0) => stone(lx, ly, tile),
            (0, _) => ceiling(lx, ly, tile),
            _ => floor(lx, ly, tile),
        }
    })
}

fn gen_assets(layout: Option<PathBuf>, tile: u32, out: Option<PathBuf>) -> Result<()> {
    if tile == 0 {
        anyhow::bail!("--tile must be at least 1");
    }
    let out = match out {
        Some(out) => out,
        None => project_root()?.join("assets"),
    };

    let layout = match layout {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read layout {}", path.display()))?,
        None => DEFAULT_LAYOUT.to_string(),
    };

    let maze_path = out.join("maps/maze.png");
    let atlas_path = out.join("textures/cubicmap_atlas.png");
    for dir in [maze_path.parent(), atlas_path.parent()].into_iter().flatten() {
        std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let maze = maze_image(&layout)?;
    maze.save(&maze_path)
        .with_context(|| format!("Failed to write {}", maze_path.display()))?;
    println!("Wrote {} ({}x{})", maze_path.display(), maze.width(), maze.height());

    let atlas = atlas_image(tile);
    atlas.save(&atlas_path)
        .with_context(|| format!("Failed to write {}", atlas_path.display()))?;
    println!("Wrote {} ({}x{})", atlas_path.display(), atlas.width(), atlas.height());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_is_closed() {
        let img = maze_image(DEFAULT_LAYOUT).unwrap();
        let (w, h) = img.dimensions();
        assert_eq!((w, h), (16, 16));
        for x in 0..w {
            assert_eq!(*img.get_pixel(x, 0), WALL);
            assert_eq!(*img.get_pixel(x, h - 1), WALL);
        }
        for y in 0..h {
            assert_eq!(*img.get_pixel(0, y), WALL);
            assert_eq!(*img.get_pixel(w - 1, y), WALL);
        }
        // Default start position (1, 1) is open
        assert_eq!(*img.get_pixel(1, 1), OPEN);
    }

    #[test]
    fn test_short_rows_pad_open_and_unknown_chars_unmapped() {
        let img = maze_image("##\n#x#").unwrap();
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(*img.get_pixel(2, 0), OPEN);
        assert_eq!(*img.get_pixel(1, 1), UNMAPPED);
        assert!(maze_image("\n\n").is_err());
    }

    #[test]
    fn test_atlas_size_and_opaque() {
        let atlas = atlas_image(8);
        assert_eq!(atlas.dimensions(), (16, 16));
        assert!(atlas.pixels().all(|p| p[3] == 255));
    }

    #[test]
    fn test_gen_assets_writes_pngs() {
        let dir = tempfile::tempdir().unwrap();
        gen_assets(None, 4, Some(dir.path().to_path_buf())).unwrap();
        let maze = image::open(dir.path().join("maps/maze.png")).unwrap();
        assert_eq!(maze.width(), 16);
        let atlas = image::open(dir.path().join("textures/cubicmap_atlas.png")).unwrap();
        assert_eq!(atlas.width(), 8);
    }
}
