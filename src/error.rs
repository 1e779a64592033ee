//! Error types for shapes, rendering and the application loop.

use std::path::PathBuf;

/// Errors raised by shape construction, mass updates and bounds queries.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ShapeError {
    #[error("invalid mass {0}: mass must be positive or +infinity")]
    InvalidMass(f32),
    #[error("bounds requested for a shape with no vertices")]
    EmptyMesh,
    #[error("vertex count {0} is not a multiple of 3")]
    IncompleteTriangle(usize),
}

/// Errors raised while acquiring or using GPU resources.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported {0}")]
    UnsupportedSurface(&'static str),
    #[error("failed to acquire surface texture: {0}")]
    Surface(#[from] wgpu::SurfaceError),
    #[error("failed to read shader {path:?}: {source}")]
    ShaderIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("shader {path:?} failed to compile: {message}")]
    ShaderCompile { path: PathBuf, message: String },
    #[error("failed to allocate {what}: {message}")]
    Allocation { what: &'static str, message: String },
}

/// Top-level error returned by [`run`](crate::run) and [`run_with_config`](crate::run_with_config).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Shape(#[from] ShapeError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
}
