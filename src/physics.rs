//! Fixed-step kinematic integration.
//!
//! [`Physics::update`] advances every shape in a [`Scene`] by one step of
//! semi-implicit Euler:
//!
//! 1. `acceleration = linear_force * inverse_mass + gravity * gravity_scale`
//!    (zero for immovable bodies)
//! 2. `velocity += acceleration * dt`
//! 3. `position += velocity * dt`
//! 4. `linear_force = 0`
//!
//! Shapes are visited in scene order. There is no collision response; callers
//! that need contact use the bounds queries on [`Shape`].

use crate::scene::{Scene, ShapeId};
use crate::shape::Shape;
use glam::Vec3;

/// Standard downward gravity, in units per second squared.
pub const EARTH_GRAVITY: Vec3 = Vec3::new(0.0, -9.8, 0.0);

/// Injects forces into shapes right before they are integrated.
///
/// Closures of the form `FnMut(ShapeId, &mut Shape)` implement this trait.
pub trait ForceGenerator {
    fn apply(&mut self, id: ShapeId, shape: &mut Shape);
}

impl<F> ForceGenerator for F
where
    F: FnMut(ShapeId, &mut Shape),
{
    fn apply(&mut self, id: ShapeId, shape: &mut Shape) {
        self(id, shape)
    }
}

/// The integrator and its world settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Physics {
    /// Gravitational acceleration, scaled per body by `gravity_scale`.
    pub gravity: Vec3,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            gravity: EARTH_GRAVITY,
        }
    }
}

impl Physics {
    pub fn new(gravity: Vec3) -> Self {
        Self { gravity }
    }

    /// Advances every shape in `scene` by `dt` seconds.
    pub fn update(&self, scene: &mut Scene, dt: f32) {
        for (_, shape) in scene.iter_mut() {
            self.integrate(shape, dt);
        }
    }

    /// Like [`update`](Self::update), but lets `forces` touch each shape first.
    pub fn update_with<G: ForceGenerator>(&self, scene: &mut Scene, dt: f32, forces: &mut G) {
        for (id, shape) in scene.iter_mut() {
            forces.apply(id, shape);
            self.integrate(shape, dt);
        }
    }

    /// One integration step for a single shape.
    pub fn integrate(&self, shape: &mut Shape, dt: f32) {
        let body = &mut shape.body;
        let acceleration = if body.is_immovable() {
            Vec3::ZERO
        } else {
            body.linear_force * body.inverse_mass() + self.gravity * body.gravity_scale
        };

        body.velocity += acceleration * dt;
        shape.transform.position += body.velocity * dt;
        body.linear_force = Vec3::ZERO;
    }
}
