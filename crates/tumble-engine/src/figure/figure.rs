use std::sync::Arc;

use wgpu::util::DeviceExt;

use crate::shader::{Shader, TRANSFORM_UNIFORM_SIZE};
use crate::texture::TextureAsset;

use super::geometry::{GeometryError, MeshGeometry};

/// Per-figure binding state: the transform uniform and the bind group that
/// ties it to the figure's texture and sampler.
pub struct VertexArray {
    transform: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl VertexArray {
    pub fn transform_buffer(&self) -> &wgpu::Buffer {
        &self.transform
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

/// A renderable mesh: three GPU buffers, its binding state and a shared
/// texture. Immutable once built.
///
/// Buffer order is fixed: positions, uvs, indices.
pub struct Figure {
    /// Shared with other figures; kept alive as long as this one.
    _texture: Arc<TextureAsset>,
    vertex_array: VertexArray,
    buffers: [wgpu::Buffer; 3],
    index_count: u32,
    index_format: wgpu::IndexFormat,
}

impl Figure {
    /// Uploads `geometry` and binds `texture` against `shader`'s layout.
    pub fn new(
        device: &wgpu::Device,
        shader: &Shader,
        texture: Arc<TextureAsset>,
        geometry: &MeshGeometry<'_>,
    ) -> Result<Self, GeometryError> {
        geometry.validate()?;

        // COPY_DST keeps the vertex data rewritable in place.
        let positions = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("tumble figure positions"),
            contents: bytemuck::cast_slice(geometry.positions),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        let uvs = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("tumble figure uvs"),
            contents: bytemuck::cast_slice(geometry.uvs),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        let indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("tumble figure indices"),
            contents: bytemuck::cast_slice(geometry.indices),
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        });

        let transform = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("tumble figure transform ubo"),
            size: TRANSFORM_UNIFORM_SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let layout = shader.layout();
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tumble figure bind group"),
            layout: shader.bind_group_layout(),
            entries: &[
                wgpu::BindGroupEntry {
                    binding: layout.projection.binding,
                    resource: transform.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: layout.texture.binding,
                    resource: wgpu::BindingResource::TextureView(texture.view()),
                },
                wgpu::BindGroupEntry {
                    binding: layout.sampler.binding,
                    resource: wgpu::BindingResource::Sampler(texture.sampler()),
                },
            ],
        });

        Ok(Self {
            _texture: texture,
            vertex_array: VertexArray {
                transform,
                bind_group,
            },
            buffers: [positions, uvs, indices],
            index_count: geometry.index_count() as u32,
            index_format: wgpu::IndexFormat::Uint16,
        })
    }

    pub fn vertex_array(&self) -> &VertexArray {
        &self.vertex_array
    }

    /// Positions, uvs, indices, in that order.
    pub fn buffers(&self) -> &[wgpu::Buffer; 3] {
        &self.buffers
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn index_format(&self) -> wgpu::IndexFormat {
        self.index_format
    }
}
