//! Renderable shapes: a local mesh, a transform, a material and a rigid body.
//!
//! A [`Shape`] is one entity type tagged with a [`ShapeKind`]; the kind picks the
//! procedural generator at construction and is kept for inspection afterwards.
//!
//! # Example
//!
//! ```
//! use flatland::{Color, MaterialId, Shape, Vec3};
//!
//! let material = MaterialId::default();
//!
//! let mut ground = Shape::rectangle(material);
//! ground.transform.position = Vec3::new(0.0, -1.0, 0.0);
//! ground.transform.scale = Vec3::new(20.0, 1.0, 1.0);
//! ground.set_mass(f32::INFINITY).unwrap();
//!
//! let mut ball = Shape::circle(material);
//! ball.set_color(Color::WHITE);
//!
//! let (min, max) = ground.bounds().unwrap();
//! assert!(min.x < -1.9 && max.x > 1.9);
//! # let _ = ball;
//! ```

use crate::body::RigidBody;
use crate::color::Color;
use crate::error::ShapeError;
use crate::geometry::{self, ShapeKind};
use crate::material::MaterialId;
use crate::mesh::{Mesh, Vertex};
use crate::transform::Transform;
use glam::{Mat4, Vec3};

/// A renderable, physically simulated 2D shape.
///
/// The shape exclusively owns its [`Transform`] and local [`Mesh`]. The
/// material is a shared handle; the GPU program it names is owned by the
/// [`Renderer`](crate::Renderer).
#[derive(Clone, Debug)]
pub struct Shape {
    kind: ShapeKind,
    mesh: Mesh,
    material: MaterialId,
    pub transform: Transform,
    pub body: RigidBody,
}

impl Shape {
    /// Creates a shape with the generated mesh for `kind`.
    pub fn new(kind: ShapeKind, material: MaterialId) -> Self {
        Self::with_mesh(kind, Mesh::from_generated(geometry::generate(kind)), material)
    }

    /// Creates a shape from a caller-supplied triangle list.
    ///
    /// Returns [`ShapeError::IncompleteTriangle`] unless the vertex count is a
    /// multiple of 3.
    pub fn from_vertices(
        kind: ShapeKind,
        vertices: Vec<Vertex>,
        material: MaterialId,
    ) -> Result<Self, ShapeError> {
        Ok(Self::with_mesh(kind, Mesh::new(vertices)?, material))
    }

    fn with_mesh(kind: ShapeKind, mesh: Mesh, material: MaterialId) -> Self {
        Self {
            kind,
            mesh,
            material,
            transform: Transform::new(),
            body: RigidBody::new(),
        }
    }

    /// Reference triangle (0.2 wide).
    pub fn triangle(material: MaterialId) -> Self {
        Self::new(ShapeKind::Triangle, material)
    }

    /// Isosceles triangle spanning `width` × `height`, apex on +Y.
    pub fn triangle_sized(width: f32, height: f32, material: MaterialId) -> Self {
        Self::with_mesh(
            ShapeKind::Triangle,
            Mesh::from_generated(geometry::triangle_sized(width, height)),
            material,
        )
    }

    /// Reference rectangle (0.2 × 0.2, two triangles).
    pub fn rectangle(material: MaterialId) -> Self {
        Self::new(ShapeKind::Rectangle, material)
    }

    pub fn rectangle_sized(width: f32, height: f32, material: MaterialId) -> Self {
        Self::with_mesh(
            ShapeKind::Rectangle,
            Mesh::from_generated(geometry::rectangle_sized(width, height)),
            material,
        )
    }

    /// Reference circle (radius 0.1, 32 segments).
    pub fn circle(material: MaterialId) -> Self {
        Self::new(ShapeKind::CIRCLE, material)
    }

    pub fn circle_with_radius(radius: f32, material: MaterialId) -> Self {
        Self::new(
            ShapeKind::Circle {
                radius,
                segments: geometry::CIRCLE_SEGMENTS,
            },
            material,
        )
    }

    /// Circular sector of `angle` radians and `radius`, opening along +Y.
    pub fn cone(radius: f32, angle: f32, material: MaterialId) -> Self {
        Self::new(ShapeKind::Cone { radius, angle }, material)
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Local-space vertices, in draw order.
    pub fn vertices(&self) -> &[Vertex] {
        self.mesh.vertices()
    }

    pub fn vertices_mut(&mut self) -> &mut [Vertex] {
        self.mesh.vertices_mut()
    }

    /// Current world matrix of this shape.
    pub fn matrix(&self) -> Mat4 {
        self.transform.matrix()
    }

    /// Colors every vertex with `color`.
    pub fn set_color(&mut self, color: Color) {
        self.mesh.set_color(color);
    }

    /// Appends `count` blue vertices at the origin, keeping the existing ones.
    pub fn add_vertices(&mut self, count: usize) -> Result<(), ShapeError> {
        self.mesh.add_vertices(count)
    }

    /// Places the vertex ring on a `width` × `height` ellipse, starting at `start_degrees`.
    pub fn set_vector_positions(&mut self, width: f32, height: f32, start_degrees: f32) {
        self.mesh.set_vector_positions(width, height, start_degrees);
    }

    /// Places the vertex ring on a circle of `radius`.
    pub fn set_vectors_circle(&mut self, radius: f32) {
        self.mesh.set_vectors_circle(radius);
    }

    pub fn mass(&self) -> f32 {
        self.body.mass()
    }

    pub fn inverse_mass(&self) -> f32 {
        self.body.inverse_mass()
    }

    /// See [`RigidBody::set_mass`].
    pub fn set_mass(&mut self, mass: f32) -> Result<(), ShapeError> {
        self.body.set_mass(mass)
    }

    /// Adds `force` for the next physics step only.
    pub fn apply_force(&mut self, force: Vec3) {
        self.body.apply_force(force);
    }

    /// World-space axis-aligned `(min, max)`, recomputed from every vertex.
    pub fn bounds(&self) -> Result<(Vec3, Vec3), ShapeError> {
        self.mesh.bounds(self.matrix())
    }

    pub fn min_bounds(&self) -> Result<Vec3, ShapeError> {
        self.bounds().map(|(min, _)| min)
    }

    pub fn max_bounds(&self) -> Result<Vec3, ShapeError> {
        self.bounds().map(|(_, max)| max)
    }

    /// Midpoint of the world-space bounds.
    pub fn center(&self) -> Result<Vec3, ShapeError> {
        self.bounds().map(|(min, max)| (min + max) / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn constructors_tag_their_kind() {
        let m = MaterialId::default();
        assert_eq!(Shape::triangle(m).kind(), ShapeKind::Triangle);
        assert_eq!(Shape::rectangle_sized(1.0, 2.0, m).kind(), ShapeKind::Rectangle);
        assert_eq!(Shape::circle(m).kind(), ShapeKind::CIRCLE);
        assert_eq!(
            Shape::cone(0.5, 1.0, m).kind(),
            ShapeKind::Cone { radius: 0.5, angle: 1.0 }
        );
    }

    #[test]
    fn from_vertices_keeps_caller_mesh() {
        let vertices = vec![
            Vertex::new(Vec3::new(-0.1, 0.0, 0.0), Color::RED),
            Vertex::new(Vec3::new(0.1, 0.0, 0.0), Color::GREEN),
            Vertex::new(Vec3::new(0.0, 0.133, 0.0), Color::BLUE),
        ];
        let shape =
            Shape::from_vertices(ShapeKind::Triangle, vertices.clone(), MaterialId::default())
                .unwrap();
        assert_eq!(shape.vertices(), &vertices[..]);
    }

    #[test]
    fn from_vertices_rejects_partial_triangles() {
        let v = Vertex::new(Vec3::ZERO, Color::WHITE);
        let err = Shape::from_vertices(ShapeKind::Triangle, vec![v; 2], MaterialId::default())
            .unwrap_err();
        assert_eq!(err, ShapeError::IncompleteTriangle(2));
    }

    #[test]
    fn bounds_follow_transform() {
        let mut shape = Shape::rectangle(MaterialId::default());
        shape.transform.position = Vec3::new(1.0, 2.0, 0.0);
        shape.transform.scale = Vec3::new(10.0, 1.0, 1.0);

        let (min, max) = shape.bounds().unwrap();
        assert!(approx(min, Vec3::new(0.0, 1.9, 0.0)));
        assert!(approx(max, Vec3::new(2.0, 2.1, 0.0)));
        assert!(approx(shape.center().unwrap(), Vec3::new(1.0, 2.0, 0.0)));
    }

    #[test]
    fn bounds_are_axis_aligned_after_rotation() {
        let mut shape = Shape::rectangle_sized(2.0, 1.0, MaterialId::default());
        shape.transform.rotate(FRAC_PI_2);
        let before = Shape::rectangle_sized(2.0, 1.0, MaterialId::default())
            .bounds()
            .unwrap();
        let after = shape.bounds().unwrap();
        // A quarter turn swaps the X and Y extents.
        assert!((after.1.x - before.1.y).abs() < 1e-5);
        assert!((after.1.y - before.1.x).abs() < 1e-5);
    }

    #[test]
    fn center_is_midpoint_of_bounds() {
        let mut shape = Shape::cone(0.8, 1.2, MaterialId::default());
        shape.transform.position = Vec3::new(-0.3, 0.4, 0.0);
        shape.transform.rotate(0.6);
        let min = shape.min_bounds().unwrap();
        let max = shape.max_bounds().unwrap();
        assert!(approx(shape.center().unwrap(), (min + max) * 0.5));
    }

    #[test]
    fn degenerate_mesh_bounds_collapse_to_point() {
        let p = Vec3::new(0.25, -0.5, 0.0);
        let v = Vertex::new(p, Color::WHITE);
        let mut shape =
            Shape::from_vertices(ShapeKind::Triangle, vec![v; 3], MaterialId::default()).unwrap();
        shape.transform.position = Vec3::new(1.0, 1.0, 0.0);

        let expected = p + Vec3::new(1.0, 1.0, 0.0);
        assert!(approx(shape.min_bounds().unwrap(), expected));
        assert!(approx(shape.max_bounds().unwrap(), expected));
        assert!(approx(shape.center().unwrap(), expected));
    }

    #[test]
    fn empty_mesh_bounds_fail() {
        let shape =
            Shape::from_vertices(ShapeKind::Triangle, Vec::new(), MaterialId::default()).unwrap();
        assert_eq!(shape.bounds(), Err(ShapeError::EmptyMesh));
        assert_eq!(shape.center(), Err(ShapeError::EmptyMesh));
    }

    #[test]
    fn set_color_after_generation() {
        let mut shape = Shape::circle(MaterialId::default());
        shape.set_color(Color::grey(0.5));
        assert!(shape
            .vertices()
            .iter()
            .all(|v| v.color == Color::grey(0.5).to_array()));
    }

    #[test]
    fn circle_ring_workflow() {
        // Grow a single triangle into a ring of 18 and place it on a circle.
        let mut shape = Shape::triangle(MaterialId::default());
        shape.add_vertices(15).unwrap();
        shape.set_vectors_circle(0.1);
        assert_eq!(shape.vertices().len(), 18);
        for v in shape.vertices() {
            assert!((v.pos().length() - 0.1).abs() < 1e-6);
        }
    }

    #[test]
    fn set_mass_rejects_zero() {
        let mut shape = Shape::triangle(MaterialId::default());
        assert_eq!(shape.set_mass(0.0), Err(ShapeError::InvalidMass(0.0)));
        shape.set_mass(4.0).unwrap();
        assert_eq!(shape.inverse_mass(), 0.25);
    }
}
