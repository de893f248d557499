//! Cubicmap level system
//!
//! - `grid` - image → wall/open cell grid
//! - `mesh` - grid → culled triangle mesh with atlas UVs

mod grid;
mod mesh;

pub use grid::{Cell, Grid, load_image};
pub use mesh::{Mesh, generate_mesh};

/// Error type for cubicmap and texture image loading
#[derive(Debug)]
pub enum MapError {
    /// File could not be read
    Io(std::io::Error),
    /// Extension is not one of `SUPPORTED_EXTENSIONS`
    UnsupportedFormat(String),
    /// Decoder rejected the file contents
    Decode(String),
    /// Malformed layout or oversized image
    Layout(String),
}

impl From<std::io::Error> for MapError {
    fn from(e: std::io::Error) -> Self {
        MapError::Io(e)
    }
}

impl std::fmt::Display for MapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapError::Io(e) => write!(f, "IO error: {}", e),
            MapError::UnsupportedFormat(path) => write!(f, "unsupported image format: {}", path),
            MapError::Decode(msg) => write!(f, "decode error: {}", msg),
            MapError::Layout(msg) => write!(f, "layout error: {}", msg),
        }
    }
}

impl std::error::Error for MapError {}
