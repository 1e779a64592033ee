//! Shader programs loaded from WGSL files on disk.
//!
//! A [`Material`] pairs a vertex shader file (entry point `vs`) with a
//! fragment shader file (entry point `fs`) and compiles them into one render
//! pipeline. Shapes refer to materials through a [`MaterialId`]; the
//! [`Renderer`](crate::Renderer) owns the materials themselves.
//!
//! # Shader contract
//!
//! ```wgsl
//! struct Transform { matrix: mat4x4f }
//! @group(0) @binding(0) var<uniform> transform: Transform;
//!
//! struct VertexIn {
//!     @location(0) position: vec3f,
//!     @location(1) color: vec4f,
//! }
//! ```
//!
//! # Hot reload
//!
//! Both files are watched by modification time. When either changes, the
//! pair is recompiled; if compilation fails the previous pipeline stays in
//! use and a warning is logged.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use glam::Mat4;

use crate::error::RenderError;
use crate::gpu::GpuContext;
use crate::mesh::Vertex;

/// Shared handle to a material owned by the renderer.
///
/// The default id names the first material loaded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MaterialId(pub(crate) usize);

/// Per-shape uniform at `@group(0) @binding(0)`: the world matrix.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransformUniform {
    pub matrix: [[f32; 4]; 4],
}

impl From<Mat4> for TransformUniform {
    fn from(matrix: Mat4) -> Self {
        Self {
            matrix: matrix.to_cols_array_2d(),
        }
    }
}

/// Layout of the transform uniform bind group every material pipeline uses.
pub fn transform_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Transform Bind Group Layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

/// A shader file and the modification time it was read at.
struct ShaderFile {
    path: PathBuf,
    last_modified: Option<SystemTime>,
    source: String,
}

impl ShaderFile {
    fn load(path: &Path) -> Result<Self, RenderError> {
        let source = fs::read_to_string(path).map_err(|source| RenderError::ShaderIo {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            last_modified: Self::modified(path),
            source,
        })
    }

    fn modified(path: &Path) -> Option<SystemTime> {
        fs::metadata(path).and_then(|m| m.modified()).ok()
    }

    /// Re-reads the file if it changed on disk. Returns `true` if it did.
    fn check_reload(&mut self) -> bool {
        let Some(modified) = Self::modified(&self.path) else {
            return false;
        };
        if self.last_modified.is_some_and(|last| modified <= last) {
            return false;
        }

        match fs::read_to_string(&self.path) {
            Ok(source) => {
                self.source = source;
                self.last_modified = Some(modified);
                true
            }
            Err(e) => {
                log::warn!("failed to re-read shader {:?}: {e}", self.path);
                false
            }
        }
    }

    fn compile(&self, device: &wgpu::Device) -> Result<wgpu::ShaderModule, RenderError> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: self.path.to_str(),
            source: wgpu::ShaderSource::Wgsl(self.source.as_str().into()),
        });
        match pollster::block_on(device.pop_error_scope()) {
            None => Ok(module),
            Some(err) => Err(RenderError::ShaderCompile {
                path: self.path.clone(),
                message: err.to_string(),
            }),
        }
    }
}

/// A compiled vertex + fragment shader pair.
pub struct Material {
    vertex: ShaderFile,
    fragment: ShaderFile,
    pipeline: wgpu::RenderPipeline,
}

impl Material {
    /// Loads and compiles the two shader files.
    ///
    /// `transform_layout` must come from [`transform_bind_group_layout`].
    pub fn load(
        gpu: &GpuContext,
        transform_layout: &wgpu::BindGroupLayout,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Self, RenderError> {
        let vertex = ShaderFile::load(vertex_path.as_ref())?;
        let fragment = ShaderFile::load(fragment_path.as_ref())?;
        let pipeline = Self::build_pipeline(gpu, transform_layout, &vertex, &fragment)?;
        log::debug!("loaded material {:?} + {:?}", vertex.path, fragment.path);

        Ok(Self {
            vertex,
            fragment,
            pipeline,
        })
    }

    fn build_pipeline(
        gpu: &GpuContext,
        transform_layout: &wgpu::BindGroupLayout,
        vertex: &ShaderFile,
        fragment: &ShaderFile,
    ) -> Result<wgpu::RenderPipeline, RenderError> {
        let device = &gpu.device;
        let vs = vertex.compile(device)?;
        let fs = fragment.compile(device)?;

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Material Pipeline Layout"),
            bind_group_layouts: &[transform_layout],
            push_constant_ranges: &[],
        });

        // Linking errors (mismatched interfaces, missing entry points) surface here.
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Material Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vs,
                entry_point: Some("vs"),
                buffers: &[Vertex::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &fs,
                entry_point: Some("fs"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                // Generated fans mix windings.
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });
        match pollster::block_on(device.pop_error_scope()) {
            None => Ok(pipeline),
            Some(err) => Err(RenderError::ShaderCompile {
                path: vertex.path.clone(),
                message: format!("linking with {:?}: {err}", fragment.path),
            }),
        }
    }

    /// Recompiles if either shader file changed on disk.
    ///
    /// Returns `true` if a new pipeline was installed. On failure the previous
    /// pipeline is kept.
    pub fn reload_if_changed(
        &mut self,
        gpu: &GpuContext,
        transform_layout: &wgpu::BindGroupLayout,
    ) -> bool {
        // Both checks must run so each file records its new timestamp.
        let vertex_changed = self.vertex.check_reload();
        let fragment_changed = self.fragment.check_reload();
        if !vertex_changed && !fragment_changed {
            return false;
        }

        log::info!(
            "reloading material {:?} + {:?}",
            self.vertex.path,
            self.fragment.path
        );
        match Self::build_pipeline(gpu, transform_layout, &self.vertex, &self.fragment) {
            Ok(pipeline) => {
                self.pipeline = pipeline;
                true
            }
            Err(e) => {
                log::warn!("{e}; keeping previous version");
                false
            }
        }
    }

    /// Makes this material's program current for the following draws.
    pub fn bind(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_pipeline(&self.pipeline);
    }

    /// Uploads `matrix` into a transform uniform buffer.
    pub fn set_transform(queue: &wgpu::Queue, uniform_buffer: &wgpu::Buffer, matrix: Mat4) {
        let uniform = TransformUniform::from(matrix);
        queue.write_buffer(uniform_buffer, 0, bytemuck::bytes_of(&uniform));
    }

    pub fn vertex_path(&self) -> &Path {
        &self.vertex.path
    }

    pub fn fragment_path(&self) -> &Path {
        &self.fragment.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn transform_uniform_is_column_major() {
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let u = TransformUniform::from(m);
        assert_eq!(std::mem::size_of::<TransformUniform>(), 64);
        // Translation lives in the last column.
        assert_eq!(u.matrix[3], [1.0, 2.0, 3.0, 1.0]);
    }

    #[test]
    fn missing_shader_file_reports_path() {
        let path = Path::new("does/not/exist.wgsl");
        match ShaderFile::load(path) {
            Err(RenderError::ShaderIo { path: p, .. }) => assert_eq!(p, path),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("loaded a missing file"),
        }
    }

    #[test]
    fn shader_file_reload_tracks_mtime() {
        let dir = std::env::temp_dir().join(format!("flatland-shader-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("reload.wgsl");
        fs::write(&path, "// v1").unwrap();

        let mut file = ShaderFile::load(&path).unwrap();
        assert_eq!(file.source, "// v1");
        assert!(!file.check_reload());

        // Pretend the file was read long ago.
        file.last_modified = Some(SystemTime::UNIX_EPOCH);
        fs::write(&path, "// v2").unwrap();
        assert!(file.check_reload());
        assert_eq!(file.source, "// v2");

        fs::remove_dir_all(&dir).unwrap();
    }
}
