//! Draws a [`Scene`] to the window surface.
//!
//! Every shape gets its own vertex buffer and transform uniform, allocated
//! the first time the renderer sees the shape and released once the shape
//! leaves the scene. Each frame the full vertex list and current world
//! matrix of every shape are uploaded, then shapes are drawn in scene order
//! with one triangle-list draw call each.

use std::collections::HashMap;
use std::path::Path;

use crate::color::Color;
use crate::error::RenderError;
use crate::gpu::GpuContext;
use crate::material::{self, Material, MaterialId, TransformUniform};
use crate::mesh::Vertex;
use crate::scene::{Scene, ShapeId};
use crate::shape::Shape;

const VERTEX_SIZE: u64 = std::mem::size_of::<Vertex>() as u64;

/// GPU resources backing one shape.
struct ShapeGpu {
    vertex_buffer: wgpu::Buffer,
    /// Vertex capacity of `vertex_buffer`.
    capacity: usize,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Owns materials and per-shape GPU buffers, and records the frame.
pub struct Renderer {
    materials: Vec<Material>,
    transform_layout: wgpu::BindGroupLayout,
    shapes: HashMap<ShapeId, ShapeGpu>,
    pub clear_color: Color,
}

impl Renderer {
    pub fn new(gpu: &GpuContext) -> Self {
        Self {
            materials: Vec::new(),
            transform_layout: material::transform_bind_group_layout(&gpu.device),
            shapes: HashMap::new(),
            clear_color: Color::BLACK,
        }
    }

    /// Compiles a material from a vertex and fragment shader file.
    pub fn load_material(
        &mut self,
        gpu: &GpuContext,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<MaterialId, RenderError> {
        let material = Material::load(gpu, &self.transform_layout, vertex_path, fragment_path)?;
        self.materials.push(material);
        Ok(MaterialId(self.materials.len() - 1))
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0)
    }

    /// Recompiles every material whose shader files changed.
    pub fn reload_materials(&mut self, gpu: &GpuContext) {
        for material in &mut self.materials {
            material.reload_if_changed(gpu, &self.transform_layout);
        }
    }

    /// Number of shapes currently holding GPU buffers.
    pub fn resident_shapes(&self) -> usize {
        self.shapes.len()
    }

    /// Allocates buffers for new or grown shapes and frees those of removed ones.
    pub fn sync(&mut self, gpu: &GpuContext, scene: &Scene) -> Result<(), RenderError> {
        let before = self.shapes.len();
        self.shapes.retain(|id, _| scene.contains(*id));
        if self.shapes.len() < before {
            log::debug!("released buffers of {} shapes", before - self.shapes.len());
        }

        for (id, shape) in scene.iter() {
            let needed = shape.vertices().len();
            let capacity = self.shapes.get(&id).map(|r| r.capacity);
            if capacity.is_some_and(|c| c >= needed) {
                continue;
            }
            if capacity.is_none() && self.material(shape.material()).is_none() {
                log::warn!(
                    "{id:?} uses unknown {:?} and will not be drawn",
                    shape.material()
                );
            }
            let resources = self.allocate(gpu, needed)?;
            self.shapes.insert(id, resources);
        }
        Ok(())
    }

    fn allocate(&self, gpu: &GpuContext, vertices: usize) -> Result<ShapeGpu, RenderError> {
        let device = &gpu.device;
        // Leave room for a few more triangles so small growth does not reallocate.
        let capacity = vertices.max(3).next_multiple_of(3) + 3;

        device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Shape Vertex Buffer"),
            size: capacity as u64 * VERTEX_SIZE,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Shape Transform Uniform"),
            size: std::mem::size_of::<TransformUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(RenderError::Allocation {
                what: "shape buffers",
                message: err.to_string(),
            });
        }

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Shape Transform Bind Group"),
            layout: &self.transform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Ok(ShapeGpu {
            vertex_buffer,
            capacity,
            uniform_buffer,
            bind_group,
        })
    }

    fn upload(gpu: &GpuContext, resources: &ShapeGpu, shape: &Shape) {
        if !shape.vertices().is_empty() {
            gpu.queue.write_buffer(
                &resources.vertex_buffer,
                0,
                bytemuck::cast_slice(shape.vertices()),
            );
        }
        Material::set_transform(&gpu.queue, &resources.uniform_buffer, shape.matrix());
    }

    /// Draws one frame.
    ///
    /// Surface acquisition failures come back as [`RenderError::Surface`] so
    /// the caller can decide whether to skip the frame or stop.
    pub fn render(&mut self, gpu: &GpuContext, scene: &Scene) -> Result<(), RenderError> {
        self.reload_materials(gpu);
        self.sync(gpu, scene)?;

        for (id, shape) in scene.iter() {
            if let Some(resources) = self.shapes.get(&id) {
                Self::upload(gpu, resources, shape);
            }
        }

        let output = gpu.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color.into()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            for (id, shape) in scene.iter() {
                let count = shape.vertices().len();
                if count == 0 {
                    continue;
                }
                let (Some(resources), Some(material)) =
                    (self.shapes.get(&id), self.material(shape.material()))
                else {
                    continue;
                };

                material.bind(&mut render_pass);
                render_pass.set_bind_group(0, &resources.bind_group, &[]);
                render_pass.set_vertex_buffer(
                    0,
                    resources.vertex_buffer.slice(..count as u64 * VERTEX_SIZE),
                );
                render_pass.draw(0..count as u32, 0..1);
            }
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}
