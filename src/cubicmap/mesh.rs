//! Cubicmap mesh generation
//!
//! Walks the grid and emits two triangles per visible cube face.
//! Wall sides that touch another wall (or an unmapped cell) are culled,
//! so only the surfaces bordering corridors and the map edge survive.
//!
//! Cube corner layout for the cell at (x, z), cube size `s`:
//!
//! ```text
//!         v1 ------- v4        top    (y = s)
//!        /|         /|
//!      v2 ------- v3 |
//!       | v6 -----|- v5        bottom (y = 0)
//!       |/        | /
//!      v7 ------- v8           -z is "back", +z is "front"
//! ```

use tracing::info;
use crate::math::{Vec2, Vec3};
use super::{Cell, Grid};

/// Sub-rectangle of the texture atlas in UV space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl UvRect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    fn corner(&self, (u_far, v_far): (bool, bool)) -> Vec2 {
        Vec2::new(
            if u_far { self.x + self.w } else { self.x },
            if v_far { self.y + self.h } else { self.y },
        )
    }
}

/// 2x2 atlas quadrants shared by every face of the map
pub mod atlas {
    use super::UvRect;

    pub const RIGHT: UvRect = UvRect::new(0.0, 0.0, 0.5, 0.5);
    pub const LEFT: UvRect = UvRect::new(0.5, 0.0, 0.5, 0.5);
    pub const FRONT: UvRect = UvRect::new(0.0, 0.0, 0.5, 0.5);
    pub const BACK: UvRect = UvRect::new(0.5, 0.0, 0.5, 0.5);
    pub const TOP: UvRect = UvRect::new(0.0, 0.5, 0.5, 0.5);
    pub const BOTTOM: UvRect = UvRect::new(0.5, 0.5, 0.5, 0.5);
}

/// The kinds of quads the generator can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    /// Wall cube top (y = s, facing +Y)
    Top,
    /// Wall cube bottom (y = 0, facing -Y)
    Bottom,
    /// Wall side at +z
    Front,
    /// Wall side at -z
    Back,
    /// Wall side at +x
    Right,
    /// Wall side at -x
    Left,
    /// Open cell floor (y = 0, facing +Y)
    Floor,
    /// Open cell ceiling (y = s, facing -Y)
    Ceiling,
}

impl Face {
    #[cfg(test)]
    fn normal(self) -> Vec3 {
        self.layout().normal
    }

    #[cfg(test)]
    fn uv_rect(self) -> UvRect {
        self.layout().uv
    }

    fn layout(self) -> &'static FaceLayout {
        match self {
            Face::Top => &TOP,
            Face::Bottom => &BOTTOM,
            Face::Front => &FRONT,
            Face::Back => &BACK,
            Face::Right => &RIGHT,
            Face::Left => &LEFT,
            Face::Floor => &FLOOR,
            Face::Ceiling => &CEILING,
        }
    }
}

/// Fixed vertex order and UV corners for one face type.
/// `corners` index v1..v8 as 0..7; `uvs` pick (far u, far v) atlas corners.
struct FaceLayout {
    corners: [usize; 6],
    uvs: [(bool, bool); 6],
    uv: UvRect,
    normal: Vec3,
}

const N: bool = false;
const F: bool = true;

const TOP: FaceLayout = FaceLayout {
    corners: [0, 1, 2, 0, 2, 3],
    uvs: [(N, N), (N, F), (F, F), (N, N), (F, F), (F, N)],
    uv: atlas::TOP,
    normal: Vec3::new(0.0, 1.0, 0.0),
};

const BOTTOM: FaceLayout = FaceLayout {
    corners: [5, 7, 6, 5, 4, 7],
    uvs: [(F, N), (N, F), (F, F), (F, N), (N, N), (N, F)],
    uv: atlas::BOTTOM,
    normal: Vec3::new(0.0, -1.0, 0.0),
};

const FRONT: FaceLayout = FaceLayout {
    corners: [1, 6, 2, 2, 6, 7],
    uvs: [(N, N), (N, F), (F, N), (F, N), (N, F), (F, F)],
    uv: atlas::FRONT,
    normal: Vec3::new(0.0, 0.0, 1.0),
};

const BACK: FaceLayout = FaceLayout {
    corners: [0, 4, 5, 0, 3, 4],
    uvs: [(F, N), (N, F), (F, F), (F, N), (N, N), (N, F)],
    uv: atlas::BACK,
    normal: Vec3::new(0.0, 0.0, -1.0),
};

const RIGHT: FaceLayout = FaceLayout {
    corners: [2, 7, 3, 3, 7, 4],
    uvs: [(N, N), (N, F), (F, N), (F, N), (N, F), (F, F)],
    uv: atlas::RIGHT,
    normal: Vec3::new(1.0, 0.0, 0.0),
};

const LEFT: FaceLayout = FaceLayout {
    corners: [0, 6, 1, 0, 5, 6],
    uvs: [(N, N), (F, F), (F, N), (N, N), (N, F), (F, F)],
    uv: atlas::LEFT,
    normal: Vec3::new(-1.0, 0.0, 0.0),
};

const CEILING: FaceLayout = FaceLayout {
    corners: [0, 2, 1, 0, 3, 2],
    uvs: [(N, N), (F, F), (N, F), (N, N), (F, N), (F, F)],
    uv: atlas::TOP,
    normal: Vec3::new(0.0, -1.0, 0.0),
};

const FLOOR: FaceLayout = FaceLayout {
    corners: [5, 6, 7, 5, 7, 4],
    uvs: [(F, N), (F, F), (N, F), (F, N), (N, F), (N, N)],
    uv: atlas::BOTTOM,
    normal: Vec3::new(0.0, 1.0, 0.0),
};

/// Triangle soup with per-vertex position, texcoord and normal.
/// All three arrays always have the same length, a multiple of 3.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vec3>,
    pub texcoords: Vec<Vec2>,
    pub normals: Vec<Vec3>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Axis-aligned bounds (min, max) of all vertices, None when empty
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        if self.is_empty() {
            return None;
        }
        let first = self.vertices[0];
        Some(
            self.vertices
                .iter()
                .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
        )
    }

    /// Iterate triangles as vertex-index triples
    #[cfg(test)]
    fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        (0..self.triangle_count()).map(|t| [t * 3, t * 3 + 1, t * 3 + 2])
    }

    fn push_face(&mut self, face: Face, cube: &[Vec3; 8]) {
        let layout = face.layout();
        for (&corner, &uv) in layout.corners.iter().zip(layout.uvs.iter()) {
            self.vertices.push(cube[corner]);
            self.texcoords.push(layout.uv.corner(uv));
            self.normals.push(layout.normal);
        }
    }
}

/// Corners v1..v8 of the cube at (x, z)
fn cube_corners(x: usize, z: usize, size: f32) -> [Vec3; 8] {
    let (x, z) = (x as f32, z as f32);
    let (x0, x1) = (size * (x - 0.5), size * (x + 0.5));
    let (z0, z1) = (size * (z - 0.5), size * (z + 0.5));
    [
        Vec3::new(x0, size, z0),
        Vec3::new(x0, size, z1),
        Vec3::new(x1, size, z1),
        Vec3::new(x1, size, z0),
        Vec3::new(x1, 0.0, z0),
        Vec3::new(x0, 0.0, z0),
        Vec3::new(x0, 0.0, z1),
        Vec3::new(x1, 0.0, z1),
    ]
}

/// A wall side is visible when its neighbor is off the map or open floor
fn side_visible(grid: &Grid, x: i32, z: i32) -> bool {
    grid.get(x, z).map_or(true, Cell::is_open)
}

/// Faces emitted for a single cell, in emission order
pub fn cell_faces(grid: &Grid, x: usize, z: usize) -> Vec<Face> {
    let Some(cell) = grid.get(x as i32, z as i32) else { return Vec::new() };
    let (xi, zi) = (x as i32, z as i32);

    match cell {
        Cell::Wall => {
            let mut faces = vec![Face::Top, Face::Bottom];
            let sides = [
                (Face::Front, xi, zi + 1),
                (Face::Back, xi, zi - 1),
                (Face::Right, xi + 1, zi),
                (Face::Left, xi - 1, zi),
            ];
            faces.extend(
                sides
                    .iter()
                    .filter(|(_, nx, nz)| side_visible(grid, *nx, *nz))
                    .map(|(face, _, _)| *face),
            );
            faces
        }
        Cell::Open => vec![Face::Ceiling, Face::Floor],
        Cell::Unmapped => Vec::new(),
    }
}

/// Generate the maze mesh for a grid
pub fn generate_mesh(grid: &Grid, cube_size: f32) -> Mesh {
    let mut mesh = Mesh::new();

    for z in 0..grid.height() {
        for x in 0..grid.width() {
            let faces = cell_faces(grid, x, z);
            if faces.is_empty() {
                continue;
            }
            let cube = cube_corners(x, z, cube_size);
            for face in faces {
                mesh.push_face(face, &cube);
            }
        }
    }

    info!("Mesh generated successfully (vertexCount: {})", mesh.vertex_count());
    mesh
}
