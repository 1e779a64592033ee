//! Procedural local-space meshes for each shape kind.
//!
//! Every [`ShapeKind`] has a generator that produces an unindexed triangle list
//! around the local origin. Generators are plain functions keyed by the kind
//! tag, see [`generate`].
//!
//! | Kind      | Vertices            | Notes |
//! |-----------|---------------------|-------|
//! | Triangle  | 3                   | 0.2 wide, equilateral proportions |
//! | Rectangle | 6                   | two triangles, 0.2 × 0.2 |
//! | Circle    | `segments * 3`      | triangle fan, one center vertex per segment |
//! | Cone      | [`CONE_SEGMENTS`] * 3 | circular sector opening along +Y |
//!
//! This module also holds the two geometric helpers meshes are built on:
//! [`place_on_ellipse`] for repositioning a vertex ring and [`world_bounds`] for
//! world-space axis-aligned bounds.

use crate::color::Color;
use crate::error::ShapeError;
use crate::math;
use crate::mesh::Vertex;
use glam::{Mat4, Vec3};
use std::f32::consts::{FRAC_PI_2, TAU};

/// Half-extent of the reference meshes.
pub const REFERENCE_SCALE: f32 = 0.1;

/// Segment count of the reference circle.
pub const CIRCLE_SEGMENTS: u32 = 32;

/// Segment count used for cone sectors.
pub const CONE_SEGMENTS: u32 = 16;

/// The closed set of shape kinds, with the parameters their generator needs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShapeKind {
    Triangle,
    Rectangle,
    Circle { radius: f32, segments: u32 },
    /// Circular sector with its apex at the origin, opening along +Y.
    Cone { radius: f32, angle: f32 },
}

impl ShapeKind {
    /// The reference circle: radius 0.1, 32 segments.
    pub const CIRCLE: ShapeKind = ShapeKind::Circle {
        radius: REFERENCE_SCALE,
        segments: CIRCLE_SEGMENTS,
    };
}

/// Builds the local-space mesh for `kind`.
pub fn generate(kind: ShapeKind) -> Vec<Vertex> {
    match kind {
        ShapeKind::Triangle => triangle(),
        ShapeKind::Rectangle => rectangle(),
        ShapeKind::Circle { radius, segments } => circle(segments, radius),
        ShapeKind::Cone { radius, angle } => cone(radius, angle, CONE_SEGMENTS),
    }
}

/// Reference triangle: base 0.2 wide on the bottom, apex on +Y.
pub fn triangle() -> Vec<Vertex> {
    let s = REFERENCE_SCALE;
    let height = 0.75f32.sqrt() * s;
    vec![
        Vertex::new(Vec3::new(-s, -height / 2.0, 0.0), Color::RED),
        Vertex::new(Vec3::new(s, -height / 2.0, 0.0), Color::GREEN),
        Vertex::new(Vec3::new(0.0, height, 0.0), Color::BLUE),
    ]
}

/// Isosceles triangle spanning `width` × `height`, apex on +Y.
pub fn triangle_sized(width: f32, height: f32) -> Vec<Vertex> {
    let mut vertices = triangle();
    place_on_ellipse(&mut vertices, width * 0.5, height * 0.5, 90.0);
    vertices
}

/// Reference rectangle: two triangles covering a 0.2 × 0.2 square.
pub fn rectangle() -> Vec<Vertex> {
    let s = REFERENCE_SCALE;
    vec![
        Vertex::new(Vec3::new(-s, -s, 0.0), Color::RED),
        Vertex::new(Vec3::new(s, -s, 0.0), Color::GREEN),
        Vertex::new(Vec3::new(-s, s, 0.0), Color::BLUE),
        Vertex::new(Vec3::new(s, -s, 0.0), Color::GREEN),
        Vertex::new(Vec3::new(s, s, 0.0), Color::RED),
        Vertex::new(Vec3::new(-s, s, 0.0), Color::BLUE),
    ]
}

/// Rectangle whose corners sit on the `width` × `height` ellipse at 45°, 135°,
/// 225° and 315°, split into two triangles.
pub fn rectangle_sized(width: f32, height: f32) -> Vec<Vertex> {
    let mut corners = [
        Vertex::new(Vec3::ZERO, Color::RED),
        Vertex::new(Vec3::ZERO, Color::GREEN),
        Vertex::new(Vec3::ZERO, Color::BLUE),
        Vertex::new(Vec3::ZERO, Color::BLUE),
    ];
    place_on_ellipse(&mut corners, width * 0.5, height * 0.5, 45.0);
    vec![
        corners[0], corners[1], corners[2], //
        corners[0], corners[2], corners[3],
    ]
}

/// Triangle-fan circle of `segments` slices.
///
/// Slice `i` emits the center, the point at the previous angle and the point
/// at `TAU / segments * (i + 1)`. Zero segments yields an empty mesh.
pub fn circle(segments: u32, radius: f32) -> Vec<Vertex> {
    fan(segments, radius, 0.0, TAU)
}

/// Circular sector of `angle` radians centered on +Y, as a fan of `segments` slices.
pub fn cone(radius: f32, angle: f32, segments: u32) -> Vec<Vertex> {
    fan(segments, radius, FRAC_PI_2 - angle * 0.5, angle)
}

fn fan(segments: u32, radius: f32, start: f32, sweep: f32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(segments as usize * 3);
    let rim = |angle: f32| Vec3::new(angle.cos(), angle.sin(), 0.0) * radius;

    let mut old_angle = start;
    for i in 0..segments {
        let new_angle = start + sweep / segments as f32 * (i + 1) as f32;
        vertices.push(Vertex::new(Vec3::ZERO, Color::BLUE));
        vertices.push(Vertex::new(rim(old_angle), Color::GREEN));
        vertices.push(Vertex::new(rim(new_angle), Color::RED));
        old_angle = new_angle;
    }
    vertices
}

/// Moves every vertex onto the ellipse with half-extents `rx`, `ry`.
///
/// Vertex `i` lands at angle `start_degrees + i * 360 / len` degrees. Z and
/// colors are left alone.
pub fn place_on_ellipse(vertices: &mut [Vertex], rx: f32, ry: f32, start_degrees: f32) {
    if vertices.is_empty() {
        return;
    }
    let step = 360.0 / vertices.len() as f32;
    for (i, v) in vertices.iter_mut().enumerate() {
        let theta = (start_degrees + step * i as f32).to_radians();
        v.position[0] = theta.cos() * rx;
        v.position[1] = theta.sin() * ry;
    }
}

/// Component-wise `(min, max)` of `vertices` transformed by `matrix` as points.
pub fn world_bounds(vertices: &[Vertex], matrix: Mat4) -> Result<(Vec3, Vec3), ShapeError> {
    let mut points = vertices
        .iter()
        .map(|v| math::transform(matrix, v.pos(), math::POINT));
    let first = points.next().ok_or(ShapeError::EmptyMesh)?;
    Ok(points.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
}
