//! Vector and matrix helpers for the 2D engine.
//!
//! The engine uses [`glam::Vec3`] as its vector type and [`glam::Mat4`] as its
//! transform matrix. Geometry is strictly 2D, but vectors keep a Z component so
//! forward/up bookkeeping works the same way it would in 3D.
//!
//! This module adds the handful of operations the rest of the crate is built on:
//!
//! - [`translation`], [`rotation`] and [`scale`] build the three primitive matrices
//! - [`compose`] combines them in the fixed `T * R * S` order
//! - [`transform`] applies a matrix to a vector with an explicit homogeneous weight
//! - [`normalize`] is the zero-safe normalization used for input directions
//!
//! # Composition Order
//!
//! World matrices are always `translation(p) * rotation(r) * scale(s)`, so a
//! local-space vertex is scaled first, then rotated around the local origin, and
//! finally translated. [`Transform::matrix`](crate::Transform::matrix) relies on
//! this order.
//!
//! # Example
//!
//! ```
//! use flatland::math;
//! use flatland::Vec3;
//!
//! let m = math::compose(
//!     Vec3::new(1.0, 0.0, 0.0),
//!     Vec3::new(0.0, 0.0, std::f32::consts::FRAC_PI_2),
//!     Vec3::ONE,
//! );
//! let p = math::transform(m, Vec3::X, 1.0);
//! assert!((p - Vec3::new(1.0, 1.0, 0.0)).length() < 1e-5);
//! ```

use glam::{Mat4, Vec3, Vec4};

/// Canonical forward axis (+Y).
pub const FORWARD: Vec3 = Vec3::new(0.0, 1.0, 0.0);
/// Canonical backward axis (-Y).
pub const BACKWARD: Vec3 = Vec3::new(0.0, -1.0, 0.0);
/// Canonical left axis (-X).
pub const LEFT: Vec3 = Vec3::new(-1.0, 0.0, 0.0);
/// Canonical right axis (+X).
pub const RIGHT: Vec3 = Vec3::new(1.0, 0.0, 0.0);

/// Homogeneous weight for directions: translation is not applied.
pub const DIRECTION: f32 = 0.0;
/// Homogeneous weight for points: translation is applied.
pub const POINT: f32 = 1.0;

/// Builds a translation matrix.
pub fn translation(offset: Vec3) -> Mat4 {
    Mat4::from_translation(offset)
}

/// Builds a rotation matrix from the Z component of `angles` (radians).
///
/// X and Y are ignored; the engine only rotates in the XY plane.
pub fn rotation(angles: Vec3) -> Mat4 {
    Mat4::from_rotation_z(angles.z)
}

/// Builds a per-axis scale matrix.
pub fn scale(factors: Vec3) -> Mat4 {
    Mat4::from_scale(factors)
}

/// Composes a world matrix as `translation(position) * rotation(angles) * scale(factors)`.
pub fn compose(position: Vec3, angles: Vec3, factors: Vec3) -> Mat4 {
    translation(position) * rotation(angles) * scale(factors)
}

/// Applies `matrix` to `v` with homogeneous weight `w`.
///
/// Use [`POINT`] (`1.0`) for positions and [`DIRECTION`] (`0.0`) for directions.
/// The result is not divided by the output W; engine matrices are affine.
pub fn transform(matrix: Mat4, v: Vec3, w: f32) -> Vec3 {
    (matrix * Vec4::new(v.x, v.y, v.z, w)).truncate()
}

/// Returns `v` scaled to unit length, or [`Vec3::ZERO`] if `v` has zero (or
/// non-finite) length.
///
/// Input handling sums key directions and normalizes the result; with no keys
/// held that sum is exactly zero, which must stay zero rather than become NaN.
pub fn normalize(v: Vec3) -> Vec3 {
    v.normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn compose_translates_origin() {
        let m = compose(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, FRAC_PI_2), Vec3::ONE);
        assert!(approx(transform(m, Vec3::ZERO, POINT), Vec3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn compose_rotates_before_translating() {
        let m = compose(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, FRAC_PI_2), Vec3::ONE);
        assert!(approx(transform(m, Vec3::X, POINT), Vec3::new(1.0, 1.0, 0.0)));
    }

    #[test]
    fn compose_scales_before_rotating() {
        let m = compose(Vec3::ZERO, Vec3::new(0.0, 0.0, FRAC_PI_2), Vec3::new(2.0, 1.0, 1.0));
        // Scaled along X to (2,0), then rotated onto +Y.
        assert!(approx(transform(m, Vec3::X, POINT), Vec3::new(0.0, 2.0, 0.0)));
    }

    #[test]
    fn compose_matches_explicit_product() {
        let p = Vec3::new(-3.0, 2.5, 0.0);
        let r = Vec3::new(0.0, 0.0, 0.7);
        let s = Vec3::new(0.5, 4.0, 1.0);
        let expected = translation(p) * rotation(r) * scale(s);
        let v = Vec3::new(0.3, -1.2, 0.0);
        assert!(approx(
            transform(compose(p, r, s), v, POINT),
            transform(expected, v, POINT)
        ));
    }

    #[test]
    fn directions_ignore_translation() {
        let m = compose(Vec3::new(10.0, -4.0, 0.0), Vec3::ZERO, Vec3::ONE);
        assert!(approx(transform(m, FORWARD, DIRECTION), FORWARD));
    }

    #[test]
    fn rotation_uses_only_z() {
        let m = rotation(Vec3::new(1.0, 2.0, PI));
        assert!(approx(transform(m, FORWARD, DIRECTION), BACKWARD));
    }

    #[test]
    fn normalize_zero_is_zero() {
        assert_eq!(normalize(Vec3::ZERO), Vec3::ZERO);
    }

    #[test]
    fn normalize_unit_length() {
        let n = normalize(Vec3::new(3.0, 4.0, 0.0));
        assert!((n.length() - 1.0).abs() < 1e-6);
        assert!(approx(n, Vec3::new(0.6, 0.8, 0.0)));
    }

    #[test]
    fn dot_min_max_are_componentwise() {
        let a = Vec3::new(1.0, -2.0, 3.0);
        let b = Vec3::new(-1.0, 5.0, 0.5);
        assert_eq!(a.dot(b), -1.0 - 10.0 + 1.5);
        assert_eq!(a.min(b), Vec3::new(-1.0, -2.0, 0.5));
        assert_eq!(a.max(b), Vec3::new(1.0, 5.0, 3.0));
    }
}
