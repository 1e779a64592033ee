//! # Flatland
//!
//! **A minimal 2D real-time engine on wgpu.**
//!
//! A [`Scene`] holds procedurally generated [`Shape`]s. Each shape has a
//! [`Transform`], a mutable local-space [`Mesh`], a [`MaterialId`] naming the
//! shader program it is drawn with, and a [`RigidBody`] that the fixed-step
//! [`Physics`] integrator advances under force and gravity.
//!
//! ## Quick Start
//!
//! ```no_run
//! use flatland::*;
//!
//! fn main() -> Result<(), Error> {
//!     run_with_config(AppConfig::new().title("Falling"), |ctx| {
//!         let material = ctx.material(
//!             "shaders/world-position-color.vert.wgsl",
//!             "shaders/vertex-color.frag.wgsl",
//!         )?;
//!
//!         let mut ground = Shape::rectangle(material);
//!         ground.transform = Transform::from_position(Vec3::new(0.0, -1.0, 0.0))
//!             .scale(Vec3::new(20.0, 1.0, 1.0));
//!         ground.set_mass(f32::INFINITY)?;
//!         ctx.scene.add(ground);
//!
//!         let ball = ctx.scene.add(Shape::circle(material));
//!
//!         Ok(move |step: &mut Step| {
//!             if step.key_down(KeyCode::Space) {
//!                 if let Some(ball) = step.scene.get_mut(ball) {
//!                     ball.apply_force(Vec3::new(0.0, 20.0, 0.0));
//!                 }
//!             }
//!         })
//!     })
//! }
//! ```
//!
//! ## Frame structure
//!
//! Every frame runs zero or more fixed steps (the step closure, then
//! [`Physics::update`]) followed by exactly one render, so a frame never shows
//! a half-updated scene.

mod app;
mod body;
mod color;
mod error;
pub mod geometry;
mod gpu;
mod input;
pub mod logging;
mod material;
pub mod math;
mod mesh;
mod physics;
mod renderer;
mod scene;
mod shape;
mod time;
mod transform;

pub use app::{AppConfig, SetupContext, Step, run, run_with_config};
pub use body::RigidBody;
pub use color::Color;
pub use error::{Error, RenderError, ShapeError};
pub use geometry::ShapeKind;
pub use gpu::GpuContext;
pub use input::Input;
pub use logging::{LoggingConfig, init_logging};
pub use material::{Material, MaterialId, TransformUniform};
pub use mesh::{Mesh, Vertex};
pub use physics::{EARTH_GRAVITY, ForceGenerator, Physics};
pub use renderer::Renderer;
pub use scene::{Scene, ShapeId};
pub use shape::Shape;
pub use time::FixedTimestep;
pub use transform::Transform;

// Re-export glam math types for convenience
pub use glam::{Mat4, Vec3, Vec4};

// Re-export the key type `Step::key_down` takes
pub use winit::keyboard::KeyCode;
