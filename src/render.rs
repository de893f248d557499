//! Map rendering
//!
//! Uploads a cubicmap `Mesh` into macroquad meshes and draws it through a
//! `Camera3D` built from the first-person camera.
//!
//! macroquad caps a single draw call at a few thousand vertices/indices, so
//! the triangle list is split into batches. The model transform
//! (position + uniform scale) is baked into the vertices and only re-baked
//! when it changes.

use std::path::Path;
use macroquad::models::{draw_mesh, Mesh as GpuMesh, Vertex};
use macroquad::prelude::{
    clear_background, set_camera, set_default_camera, Camera3D, Color, FilterMode, Texture2D, BLACK,
};
use crate::camera::FirstPersonCamera;
use crate::cubicmap::{self, MapError, Mesh};
use crate::math::{Vec3, DEG2RAD};

/// Triangles per draw call, kept under macroquad's default index capacity
pub const BATCH_TRIANGLES: usize = 1600;

fn to_mq(v: Vec3) -> macroquad::math::Vec3 {
    macroquad::math::vec3(v.x, v.y, v.z)
}

pub fn color_from_rgba(rgba: [u8; 4]) -> Color {
    Color::from_rgba(rgba[0], rgba[1], rgba[2], rgba[3])
}

/// Split the triangle list into draw batches with `position + v * scale`
/// applied to every vertex. Normals ride along in `Vertex::normal` (w = 0).
pub fn bake_batches(mesh: &Mesh, position: Vec3, scale: f32, tint: Color) -> Vec<Vec<Vertex>> {
    let batch_vertices = BATCH_TRIANGLES * 3;
    mesh.vertices
        .chunks(batch_vertices)
        .zip(mesh.texcoords.chunks(batch_vertices))
        .zip(mesh.normals.chunks(batch_vertices))
        .map(|((positions, uvs), normals)| {
            positions
                .iter()
                .zip(uvs)
                .zip(normals)
                .map(|((p, uv), n)| {
                    let w = position + p.scale(scale);
                    let mut vertex = Vertex::new(w.x, w.y, w.z, uv.x, uv.y, tint);
                    vertex.normal = macroquad::math::vec4(n.x, n.y, n.z, 0.0);
                    vertex
                })
                .collect()
        })
        .collect()
}

/// Load the atlas image into a nearest-filtered texture
pub fn load_texture(path: &Path) -> Result<Texture2D, MapError> {
    let image = cubicmap::load_image(path)?;
    let (w, h) = image.dimensions();
    let (Ok(w16), Ok(h16)) = (u16::try_from(w), u16::try_from(h)) else {
        return Err(MapError::Layout(format!("texture too large ({}x{})", w, h)));
    };
    let texture = Texture2D::from_rgba8(w16, h16, image.as_raw());
    texture.set_filter(FilterMode::Nearest);
    tracing::info!("Texture loaded successfully ({}x{})", w, h);
    Ok(texture)
}

/// 1x1 white texture for untextured drawing
pub fn default_texture() -> Texture2D {
    let texture = Texture2D::from_rgba8(1, 1, &[255, 255, 255, 255]);
    texture.set_filter(FilterMode::Nearest);
    texture
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Placement {
    position: Vec3,
    scale: f32,
    tint: Color,
}

/// A map mesh with its diffuse texture, ready to draw
pub struct MapModel {
    mesh: Mesh,
    texture: Texture2D,
    batches: Vec<GpuMesh>,
    placement: Option<Placement>,
}

impl MapModel {
    pub fn new(mesh: Mesh, texture: Texture2D) -> Self {
        tracing::info!(
            "Mesh uploaded successfully ({} vertices, {} triangles)",
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        Self { mesh, texture, batches: Vec::new(), placement: None }
    }

    /// Model with the atlas at `atlas_path`, or the default texture if it fails to load
    pub fn with_atlas(mesh: Mesh, atlas_path: &Path) -> Self {
        let texture = match load_texture(atlas_path) {
            Ok(texture) => texture,
            Err(e) => {
                tracing::warn!("Failed to load texture {}: {}, using default", atlas_path.display(), e);
                default_texture()
            }
        };
        Self::new(mesh, texture)
    }

    fn prepare(&mut self, placement: Placement) {
        if self.placement == Some(placement) {
            return;
        }
        self.batches = bake_batches(&self.mesh, placement.position, placement.scale, placement.tint)
            .into_iter()
            .map(|vertices| {
                let indices = (0..vertices.len() as u16).collect();
                GpuMesh { vertices, indices, texture: Some(self.texture.clone()) }
            })
            .collect();
        self.placement = Some(placement);
    }

    /// Draw at `position` with uniform `scale`, modulated by `tint`
    pub fn draw(&mut self, position: Vec3, scale: f32, tint: Color) {
        self.prepare(Placement { position, scale, tint });
        for batch in &self.batches {
            draw_mesh(batch);
        }
    }
}

/// 3D camera matching the first-person view
pub fn camera_3d(camera: &FirstPersonCamera) -> Camera3D {
    Camera3D {
        position: to_mq(camera.position),
        target: to_mq(camera.target()),
        up: to_mq(camera.up()),
        fovy: camera.fovy() * DEG2RAD,
        ..Default::default()
    }
}

/// Clear, draw the map from the player's view, restore the 2D camera
pub fn draw_frame(model: &mut MapModel, camera: &FirstPersonCamera, position: Vec3, scale: f32, tint: Color) {
    clear_background(BLACK);
    set_camera(&camera_3d(camera));
    model.draw(position, scale, tint);
    set_default_camera();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cubicmap::{generate_mesh, Grid};
    use macroquad::prelude::WHITE;

    #[test]
    fn test_batches_cover_every_vertex() {
        // 40x40 open floor = 3200 faces = 6400 triangles
        let row = ".".repeat(40);
        let text = vec![row; 40].join("\n");
        let mesh = generate_mesh(&Grid::from_ascii(&text).unwrap(), 1.0);
        let batches = bake_batches(&mesh, Vec3::ZERO, 1.0, WHITE);

        assert_eq!(batches.len(), mesh.triangle_count().div_ceil(BATCH_TRIANGLES));
        let total: usize = batches.iter().map(|b| b.len()).sum();
        assert_eq!(total, mesh.vertex_count());
        for batch in &batches {
            assert_eq!(batch.len() % 3, 0);
            assert!(batch.len() <= BATCH_TRIANGLES * 3);
            assert!(batch.len() <= u16::MAX as usize);
        }
    }

    #[test]
    fn test_bake_applies_position_and_scale() {
        let mesh = generate_mesh(&Grid::from_ascii("#").unwrap(), 1.0);
        let offset = Vec3::new(10.0, -1.0, 4.0);
        let batches = bake_batches(&mesh, offset, 2.0, WHITE);
        for (v, p) in batches[0].iter().zip(&mesh.vertices) {
            assert!((v.position.x - (10.0 + p.x * 2.0)).abs() < 1e-5);
            assert!((v.position.y - (-1.0 + p.y * 2.0)).abs() < 1e-5);
            assert!((v.position.z - (4.0 + p.z * 2.0)).abs() < 1e-5);
        }
        for (v, uv) in batches[0].iter().zip(&mesh.texcoords) {
            assert_eq!(v.uv.x, uv.x);
            assert_eq!(v.uv.y, uv.y);
        }
        for (v, n) in batches[0].iter().zip(&mesh.normals) {
            assert_eq!((v.normal.x, v.normal.y, v.normal.z, v.normal.w), (n.x, n.y, n.z, 0.0));
        }
    }

    #[test]
    fn test_empty_mesh_has_no_batches() {
        assert!(bake_batches(&Mesh::new(), Vec3::ZERO, 1.0, WHITE).is_empty());
    }

    #[test]
    fn test_tint_conversion() {
        let c = color_from_rgba([255, 0, 51, 255]);
        assert_eq!(c.r, 1.0);
        assert_eq!(c.g, 0.0);
        assert!((c.b - 0.2).abs() < 1e-6);
        assert_eq!(c.a, 1.0);
    }
}
