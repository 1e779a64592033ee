use crate::error::ShapeError;
use glam::Vec3;

/// Rigid-body state integrated by [`Physics`](crate::Physics).
///
/// `mass` and `inverse_mass` are private and only change together through
/// [`RigidBody::set_mass`]: `inverse_mass` is `0` exactly when `mass` is
/// `+inf`, and `1 / mass` otherwise.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RigidBody {
    mass: f32,
    inverse_mass: f32,
    /// Multiplier on the integrator's gravity.
    pub gravity_scale: f32,
    pub velocity: Vec3,
    /// Force accumulated for the current step. Cleared after every update.
    pub linear_force: Vec3,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self {
            mass: 1.0,
            inverse_mass: 1.0,
            gravity_scale: 1.0,
            velocity: Vec3::ZERO,
            linear_force: Vec3::ZERO,
        }
    }
}

impl RigidBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// A body that force and gravity cannot move.
    pub fn immovable() -> Self {
        Self {
            mass: f32::INFINITY,
            inverse_mass: 0.0,
            ..Self::default()
        }
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn inverse_mass(&self) -> f32 {
        self.inverse_mass
    }

    pub fn is_immovable(&self) -> bool {
        self.inverse_mass == 0.0
    }

    /// Sets the mass and its inverse together.
    ///
    /// `mass` must be positive and finite, or `+inf` for an immovable body.
    /// Anything else (zero, negative, NaN, or so small its inverse overflows)
    /// returns [`ShapeError::InvalidMass`] and leaves the body unchanged.
    pub fn set_mass(&mut self, mass: f32) -> Result<(), ShapeError> {
        if mass == f32::INFINITY {
            self.mass = mass;
            self.inverse_mass = 0.0;
            return Ok(());
        }
        // Tiny subnormal masses pass the sign check but their inverse overflows.
        let inverse = 1.0 / mass;
        if !mass.is_finite() || mass <= 0.0 || !inverse.is_finite() {
            return Err(ShapeError::InvalidMass(mass));
        }
        self.mass = mass;
        self.inverse_mass = inverse;
        Ok(())
    }

    /// Adds `force` to this step's accumulator.
    pub fn apply_force(&mut self, force: Vec3) {
        self.linear_force += force;
    }
}
