//! Cubicmap grid
//!
//! A cubicmap is an image where every pixel is one maze cell:
//! pure white is a wall cube, pure black is open floor. Any other
//! color is left unmapped and produces neither geometry nor collision.

use std::path::Path;
use image::RgbaImage;
use tracing::{info, warn};
use super::MapError;

/// Image extensions accepted for cubicmaps and textures
pub const SUPPORTED_EXTENSIONS: &[&str] = &["bmp", "png", "tga", "jpg", "jpeg", "gif"];

/// State of a single map cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// Solid cube (pure white pixel)
    Wall,
    /// Walkable floor with a ceiling above (pure black pixel)
    Open,
    /// Any other color; skipped entirely
    Unmapped,
}

impl Cell {
    /// Classify a pixel by exact RGB equality. Alpha is ignored.
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        match (r, g, b) {
            (255, 255, 255) => Cell::Wall,
            (0, 0, 0) => Cell::Open,
            _ => Cell::Unmapped,
        }
    }

    pub fn is_wall(self) -> bool {
        self == Cell::Wall
    }

    pub fn is_open(self) -> bool {
        self == Cell::Open
    }
}

/// Row-major grid of cells, immutable once built
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// The 0×0 grid produced by a failed load
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_image(img: &RgbaImage) -> Self {
        let cells = img.pixels().map(|p| Cell::from_rgb(p[0], p[1], p[2])).collect();
        Self {
            width: img.width() as usize,
            height: img.height() as usize,
            cells,
        }
    }

    /// Parse a text layout: `#` is a wall, `.` or space is open, anything else unmapped.
    /// All rows must have the same length.
    #[cfg(test)]
    pub fn from_ascii(layout: &str) -> Result<Self, MapError> {
        let rows: Vec<&str> = layout
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .filter(|l| !l.is_empty())
            .collect();
        let height = rows.len();
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);

        let mut cells = Vec::with_capacity(width * height);
        for (z, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(MapError::Layout(format!(
                    "row {} has {} cells, expected {}",
                    z,
                    row.chars().count(),
                    width
                )));
            }
            cells.extend(row.chars().map(|c| match c {
                '#' => Cell::Wall,
                '.' | ' ' => Cell::Open,
                _ => Cell::Unmapped,
            }));
        }
        Ok(Self { width, height, cells })
    }

    /// Decode an image file into a grid
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, MapError> {
        let img = load_image(path)?;
        Ok(Self::from_image(&img))
    }

    /// Load a grid, degrading to an empty grid on failure
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(grid) => grid,
            Err(e) => {
                warn!("Failed to load cubicmap {}: {}", path.display(), e);
                Self::empty()
            }
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell at (x, z), or None when out of bounds
    pub fn get(&self, x: i32, z: i32) -> Option<Cell> {
        if x < 0 || z < 0 || x as usize >= self.width || z as usize >= self.height {
            return None;
        }
        Some(self.cells[z as usize * self.width + x as usize])
    }

    pub fn is_wall(&self, x: i32, z: i32) -> bool {
        self.get(x, z).is_some_and(Cell::is_wall)
    }

    /// Row-major iterator over (x, z, cell)
    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        let width = self.width.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &c)| (i % width, i / width, c))
    }

    /// Number of cells of each kind: (walls, open, unmapped)
    pub fn counts(&self) -> (usize, usize, usize) {
        self.cells.iter().fold((0, 0, 0), |(w, o, u), c| match c {
            Cell::Wall => (w + 1, o, u),
            Cell::Open => (w, o + 1, u),
            Cell::Unmapped => (w, o, u + 1),
        })
    }
}

/// Decode an image file to RGBA8
///
/// The extension is checked before the file is touched, so an
/// unsupported format never reaches the decoder.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<RgbaImage, MapError> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(MapError::UnsupportedFormat(path.display().to_string()));
    }

    let bytes = std::fs::read(path)?;
    let img = image::load_from_memory(&bytes)
        .map_err(|e| MapError::Decode(e.to_string()))?
        .to_rgba8();

    info!("Image loaded successfully ({}x{})", img.width(), img.height());
    Ok(img)
}
