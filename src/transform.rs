//! Position, rotation and scale for shapes in the XY plane.
//!
//! [`Transform`] stores its three components separately and derives the world
//! matrix on every read, so there is no cached state that can go stale after a
//! direct field write.
//!
//! # Example
//!
//! ```
//! use flatland::{Transform, Vec3};
//!
//! let mut transform = Transform::new()
//!     .position(Vec3::new(0.0, -1.0, 0.0))
//!     .scale(Vec3::new(20.0, 1.0, 1.0));
//!
//! transform.move_by(Vec3::new(0.5, 0.0, 0.0));
//! transform.rotate(std::f32::consts::FRAC_PI_4);
//!
//! let world = transform.matrix();
//! # let _ = world;
//! ```

use crate::math;
use glam::{Mat4, Vec3};

/// A 2D transformation: translation, rotation around Z, and per-axis scale.
///
/// # Transformation Order
///
/// [`Transform::matrix()`] composes `translation * rotation * scale`: local
/// vertices are scaled, then rotated around the local origin, then moved to
/// `position`.
///
/// # Default Values
///
/// - `position`: `(0, 0, 0)`
/// - `rotation`: `(0, 0, 0)` (only `.z` is used, in radians)
/// - `scale`: `(1, 1, 1)`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// World-space position (translation).
    pub position: Vec3,
    /// Rotation angles in radians. Only `z` is meaningful.
    pub rotation: Vec3,
    /// Scale factors for each axis.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Creates an identity transform (origin, no rotation, unit scale).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transform positioned at the given location.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Sets the position component.
    pub fn position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Sets the rotation around Z, in radians.
    pub fn rotation(mut self, angle: f32) -> Self {
        self.rotation = Vec3::new(0.0, 0.0, angle);
        self
    }

    /// Sets non-uniform scale factors for each axis.
    pub fn scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Sets the same scale on all axes.
    pub fn uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    /// Adds `direction` to the position. No clamping.
    pub fn move_by(&mut self, direction: Vec3) {
        self.position += direction;
    }

    /// Multiplies every scale component by `multiplier`.
    pub fn scale_by(&mut self, multiplier: f32) {
        self.scale *= multiplier;
    }

    /// Adds `delta` radians to the Z rotation.
    ///
    /// The angle is not wrapped; it grows without bound if a caller keeps
    /// rotating in one direction.
    pub fn rotate(&mut self, delta: f32) {
        self.rotation.z += delta;
    }

    /// Returns the world matrix `translation * rotation * scale`.
    ///
    /// Recomputed on every call from the current fields.
    pub fn matrix(&self) -> Mat4 {
        math::compose(self.position, self.rotation, self.scale)
    }

    /// World-space image of the forward axis (+Y).
    ///
    /// Directions are transformed with weight 0: rotation and scale apply,
    /// translation does not. The result is not normalized, so a non-uniform
    /// scale stretches it.
    pub fn forward(&self) -> Vec3 {
        self.direction(math::FORWARD)
    }

    /// World-space image of the backward axis (-Y).
    pub fn backward(&self) -> Vec3 {
        self.direction(math::BACKWARD)
    }

    /// World-space image of the left axis (-X).
    pub fn left(&self) -> Vec3 {
        self.direction(math::LEFT)
    }

    /// World-space image of the right axis (+X).
    pub fn right(&self) -> Vec3 {
        self.direction(math::RIGHT)
    }

    fn direction(&self, axis: Vec3) -> Vec3 {
        math::transform(self.matrix(), axis, math::DIRECTION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Vec3::ZERO);
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn matrix_for_translated_quarter_turn() {
        let t = Transform::new()
            .position(Vec3::new(1.0, 0.0, 0.0))
            .rotation(FRAC_PI_2);
        let m = t.matrix();
        assert!(approx(math::transform(m, Vec3::ZERO, 1.0), Vec3::new(1.0, 0.0, 0.0)));
        assert!(approx(math::transform(m, Vec3::X, 1.0), Vec3::new(1.0, 1.0, 0.0)));
    }

    #[test]
    fn matrix_tracks_direct_field_writes() {
        let mut t = Transform::new();
        t.position = Vec3::new(0.0, 3.0, 0.0);
        assert!(approx(math::transform(t.matrix(), Vec3::ZERO, 1.0), t.position));
    }

    #[test]
    fn forward_at_identity_is_canonical() {
        assert_eq!(Transform::new().forward(), Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn half_turn_flips_forward() {
        let t = Transform::new().rotation(PI);
        assert!(approx(t.forward(), Vec3::new(0.0, -1.0, 0.0)));
        assert!(approx(t.backward(), Vec3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn directions_ignore_position() {
        let t = Transform::from_position(Vec3::new(5.0, 5.0, 0.0));
        assert_eq!(t.left(), Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(t.right(), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn directions_follow_scale() {
        let t = Transform::new().scale(Vec3::new(0.5, 2.0, 1.0));
        assert!(approx(t.forward(), Vec3::new(0.0, 2.0, 0.0)));
        assert!(approx(t.right(), Vec3::new(0.5, 0.0, 0.0)));
    }

    #[test]
    fn move_scale_rotate_accumulate() {
        let mut t = Transform::new();
        t.move_by(Vec3::new(1.0, 2.0, 0.0));
        t.move_by(Vec3::new(-0.5, 0.0, 0.0));
        t.scale_by(2.0);
        t.scale_by(0.5);
        t.scale_by(3.0);
        t.rotate(PI);
        t.rotate(PI);

        assert_eq!(t.position, Vec3::new(0.5, 2.0, 0.0));
        assert_eq!(t.scale, Vec3::splat(3.0));
        // Not wrapped back into [0, 2π).
        assert!((t.rotation.z - 2.0 * PI).abs() < 1e-6);
    }
}
