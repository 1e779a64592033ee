//! Vertex format and the mutable local-space vertex list owned by each shape.
//!
//! - [`Vertex`]: position + color, laid out exactly as the shaders expect
//! - [`Mesh`]: an ordered, unindexed triangle list in local space
//!
//! # Vertex Layout
//!
//! The [`Vertex`] struct uses the following GPU layout (28 bytes per vertex):
//!
//! | Attribute | Format    | Offset | Shader Location |
//! |-----------|-----------|--------|-----------------|
//! | position  | Float32x3 | 0      | 0               |
//! | color     | Float32x4 | 12     | 1               |
//!
//! This layout is exposed via [`Vertex::LAYOUT`] for pipeline creation.
//!
//! # Triangle Lists
//!
//! Meshes are drawn without an index buffer: every consecutive triple of
//! vertices is one triangle, so vertex order matters and the vertex count is
//! always a multiple of 3.

use crate::color::Color;
use crate::error::ShapeError;
use crate::geometry;
use glam::{Mat4, Vec3};

/// A vertex with a local-space position and an RGBA color.
///
/// Uses `#[repr(C)]` and derives [`bytemuck::Pod`] so a `&[Vertex]` can be
/// cast to bytes and uploaded as-is.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position in local space.
    pub position: [f32; 3],
    /// RGBA color.
    pub color: [f32; 4],
}

impl Vertex {
    /// The wgpu vertex buffer layout for this vertex type.
    ///
    /// - **Array stride**: 28 bytes per vertex
    /// - **Attributes**: position (loc 0), color (loc 1)
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            // color
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x4,
            },
        ],
    };

    pub fn new(position: Vec3, color: Color) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_array(),
        }
    }

    /// Local-space position as a vector.
    pub fn pos(&self) -> Vec3 {
        Vec3::from(self.position)
    }

    pub fn set_pos(&mut self, position: Vec3) {
        self.position = position.to_array();
    }
}

/// An ordered, mutable triangle list in local space.
///
/// The vertex count is kept a multiple of 3 by every operation that changes it.
/// Positions and colors can be rewritten freely; the renderer uploads the whole
/// list every frame, so edits show up on the next draw.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vertex>,
}

impl Mesh {
    /// Creates a mesh from a triangle list.
    ///
    /// Returns [`ShapeError::IncompleteTriangle`] if the vertex count is not a
    /// multiple of 3.
    pub fn new(vertices: Vec<Vertex>) -> Result<Self, ShapeError> {
        if vertices.len() % 3 != 0 {
            return Err(ShapeError::IncompleteTriangle(vertices.len()));
        }
        Ok(Self { vertices })
    }

    /// Wraps generator output, which is always built from whole triangles.
    pub(crate) fn from_generated(vertices: Vec<Vertex>) -> Self {
        debug_assert_eq!(vertices.len() % 3, 0);
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Mutable access to vertex data. The count cannot change through this slice.
    pub fn vertices_mut(&mut self) -> &mut [Vertex] {
        &mut self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Applies one color to every vertex, replacing any per-vertex colors.
    pub fn set_color(&mut self, color: Color) {
        let color = color.to_array();
        for v in &mut self.vertices {
            v.color = color;
        }
    }

    /// Appends `count` vertices at the local origin, colored blue.
    ///
    /// Existing vertices are kept as they are. `count` must keep the total a
    /// multiple of 3; otherwise the mesh is left untouched and
    /// [`ShapeError::IncompleteTriangle`] is returned.
    pub fn add_vertices(&mut self, count: usize) -> Result<(), ShapeError> {
        let total = self.vertices.len() + count;
        if total % 3 != 0 {
            return Err(ShapeError::IncompleteTriangle(total));
        }
        self.vertices
            .resize(total, Vertex::new(Vec3::ZERO, Color::BLUE));
        Ok(())
    }

    /// Places every vertex on an ellipse spanning `width` × `height`.
    ///
    /// Vertex `i` moves to `(cos θ * width/2, sin θ * height/2)` with
    /// `θ = start_degrees + i * 360/len` degrees. Z and colors are kept.
    pub fn set_vector_positions(&mut self, width: f32, height: f32, start_degrees: f32) {
        geometry::place_on_ellipse(
            &mut self.vertices,
            width * 0.5,
            height * 0.5,
            start_degrees,
        );
    }

    /// Places every vertex on a circle of `radius`, starting at 0 degrees.
    pub fn set_vectors_circle(&mut self, radius: f32) {
        geometry::place_on_ellipse(&mut self.vertices, radius, radius, 0.0);
    }

    /// Axis-aligned `(min, max)` of all vertices after applying `matrix` as points.
    ///
    /// Returns [`ShapeError::EmptyMesh`] if there are no vertices.
    pub fn bounds(&self, matrix: Mat4) -> Result<(Vec3, Vec3), ShapeError> {
        geometry::world_bounds(&self.vertices, matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri() -> Mesh {
        Mesh::new(vec![
            Vertex::new(Vec3::new(-1.0, 0.0, 0.0), Color::RED),
            Vertex::new(Vec3::new(1.0, 0.0, 0.0), Color::GREEN),
            Vertex::new(Vec3::new(0.0, 1.0, 0.0), Color::BLUE),
        ])
        .unwrap()
    }

    #[test]
    fn vertex_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 28);
        assert_eq!(std::mem::offset_of!(Vertex, position), 0);
        assert_eq!(std::mem::offset_of!(Vertex, color), 12);
        assert_eq!(Vertex::LAYOUT.array_stride, 28);
    }

    #[test]
    fn vertex_bytes_are_position_then_color() {
        let v = Vertex::new(Vec3::new(1.0, 2.0, 3.0), Color::rgba(0.1, 0.2, 0.3, 0.4));
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&v));
        assert_eq!(floats, &[1.0, 2.0, 3.0, 0.1, 0.2, 0.3, 0.4]);
    }

    #[test]
    fn new_rejects_partial_triangles() {
        let v = Vertex::new(Vec3::ZERO, Color::WHITE);
        assert_eq!(
            Mesh::new(vec![v; 4]),
            Err(ShapeError::IncompleteTriangle(4))
        );
        assert!(Mesh::new(vec![v; 6]).is_ok());
    }

    #[test]
    fn set_color_overwrites_every_vertex() {
        let mut mesh = tri();
        mesh.set_color(Color::WHITE);
        assert!(mesh.vertices().iter().all(|v| v.color == Color::WHITE.to_array()));
    }

    #[test]
    fn add_vertices_preserves_existing_data() {
        let mut mesh = tri();
        let before = mesh.vertices().to_vec();
        mesh.add_vertices(3).unwrap();

        assert_eq!(mesh.len(), 6);
        assert_eq!(&mesh.vertices()[..3], &before[..]);
        for v in &mesh.vertices()[3..] {
            assert_eq!(v.pos(), Vec3::ZERO);
            assert_eq!(v.color, Color::BLUE.to_array());
        }
    }

    #[test]
    fn add_vertices_rejects_partial_growth() {
        let mut mesh = tri();
        assert_eq!(mesh.add_vertices(2), Err(ShapeError::IncompleteTriangle(5)));
        assert_eq!(mesh.len(), 3);
    }

    #[test]
    fn set_vectors_circle_puts_vertices_on_radius() {
        let mut mesh = tri();
        mesh.add_vertices(9).unwrap();
        mesh.set_vectors_circle(0.4);
        for v in mesh.vertices() {
            assert!((v.pos().truncate().length() - 0.4).abs() < 1e-5);
        }
        // First vertex sits at 0 degrees.
        assert!((mesh.vertices()[0].pos() - Vec3::new(0.4, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn set_vector_positions_spans_width_and_height() {
        let mut mesh = tri();
        mesh.set_vector_positions(2.0, 4.0, 90.0);
        let p = mesh.vertices()[0].pos();
        assert!((p - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-5);
        // Remaining vertices step by 120 degrees.
        let q = mesh.vertices()[1].pos();
        let theta = 210f32.to_radians();
        assert!((q - Vec3::new(theta.cos(), theta.sin() * 2.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn bounds_of_empty_mesh_fail() {
        let mesh = Mesh::default();
        assert_eq!(mesh.bounds(Mat4::IDENTITY), Err(ShapeError::EmptyMesh));
    }
}
