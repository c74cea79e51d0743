use glam::Mat4;

use crate::figure::Figure;

use super::error::ShaderError;
use super::program::{LinkedProgram, ProgramLayout, ProgramSource};

/// Bytes in one `mat4x4<f32>` uniform.
pub const TRANSFORM_UNIFORM_SIZE: u64 = std::mem::size_of::<[f32; 16]>() as u64;

const POSITION_STRIDE: u64 = std::mem::size_of::<[f32; 3]>() as u64;
const UV_STRIDE: u64 = std::mem::size_of::<[f32; 2]>() as u64;

/// Attachment formats a shader's pipeline renders into.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ShaderTargets {
    pub color_format: wgpu::TextureFormat,
    pub depth_format: wgpu::TextureFormat,
}

/// A linked program realized on a device: pipeline + bind group layout.
///
/// Vertex buffer slot 0 feeds the position attribute (3 x f32), slot 1 the
/// uv attribute (2 x f32). Group 0 carries the transform uniform, the
/// texture and its sampler at the slots resolved from the source.
pub struct Shader {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    layout: ProgramLayout,
}

impl Shader {
    /// Builds a shader from source; see [`LinkedProgram::link`].
    ///
    /// Nothing is created on the device unless linking fully succeeds.
    pub fn compile(
        device: &wgpu::Device,
        src: &ProgramSource<'_>,
        targets: ShaderTargets,
    ) -> Result<Self, ShaderError> {
        let linked = LinkedProgram::link(src).inspect_err(|e| log::error!("{e}"))?;
        Ok(Self::from_linked(device, &linked, targets))
    }

    pub fn from_linked(
        device: &wgpu::Device,
        linked: &LinkedProgram,
        targets: ShaderTargets,
    ) -> Self {
        let layout = linked.layout().clone();

        let vertex_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("tumble figure vertex shader"),
            source: wgpu::ShaderSource::Wgsl(linked.vertex().source().into()),
        });
        let fragment_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("tumble figure fragment shader"),
            source: wgpu::ShaderSource::Wgsl(linked.fragment().source().into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("tumble figure bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: layout.projection.binding,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(TRANSFORM_UNIFORM_SIZE),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: layout.texture.binding,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: layout.sampler.binding,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("tumble figure pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let position_attrs = [wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x3,
            offset: 0,
            shader_location: layout.position_location,
        }];
        let uv_attrs = [wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x2,
            offset: 0,
            shader_location: layout.uv_location,
        }];

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("tumble figure pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some(layout.vertex_entry.as_str()),
                compilation_options: Default::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: POSITION_STRIDE,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &position_attrs,
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: UV_STRIDE,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &uv_attrs,
                    },
                ],
            },

            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some(layout.fragment_entry.as_str()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: targets.color_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: Some(wgpu::DepthStencilState {
                format: targets.depth_format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),

            multiview_mask: None,
            cache: None,
        });

        log::info!(
            "shader ready: position@{} uv@{} projection@{}",
            layout.position_location,
            layout.uv_location,
            layout.projection.binding
        );

        Self {
            pipeline,
            bind_group_layout,
            layout,
        }
    }

    pub fn layout(&self) -> &ProgramLayout {
        &self.layout
    }

    /// Layout figures use to build their per-figure bind group.
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    /// Makes this program current on `pass` until the returned guard is
    /// deactivated or dropped.
    pub fn activate<'p, 'e>(
        &self,
        pass: &'p mut wgpu::RenderPass<'e>,
    ) -> ActiveShader<'p, 'e> {
        pass.set_pipeline(&self.pipeline);
        ActiveShader { pass }
    }
}

/// A shader bound to a render pass; the only way to issue figure draws.
pub struct ActiveShader<'p, 'e> {
    pass: &'p mut wgpu::RenderPass<'e>,
}

impl ActiveShader<'_, '_> {
    /// Draws `figure` with `transform` as the projection uniform.
    ///
    /// Uploads the matrix into the figure's own uniform buffer, binds its
    /// position/uv buffers, texture and index buffer, then issues one indexed
    /// triangle-list draw over the figure's index count.
    pub fn draw(&mut self, queue: &wgpu::Queue, figure: &Figure, transform: &Mat4) {
        let vao = figure.vertex_array();
        queue.write_buffer(
            vao.transform_buffer(),
            0,
            bytemuck::cast_slice(&transform.to_cols_array()),
        );

        let [positions, uvs, indices] = figure.buffers();
        self.pass.set_vertex_buffer(0, positions.slice(..));
        self.pass.set_vertex_buffer(1, uvs.slice(..));
        self.pass.set_bind_group(0, vao.bind_group(), &[]);
        self.pass.set_index_buffer(indices.slice(..), figure.index_format());
        self.pass.draw_indexed(0..figure.index_count(), 0, 0..1);
    }

    /// Ends this binding scope; later draws need a fresh [`Shader::activate`].
    /// Dropping the guard does the same; binding state is scoped to the pass.
    pub fn deactivate(self) {}
}
