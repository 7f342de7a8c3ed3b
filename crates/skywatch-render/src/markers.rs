//! Screen-space label markers.
//!
//! Labels are projected to pixel coordinates on the CPU each frame; this
//! pipeline draws a small diamond at each projected point, always on top of
//! the 3D scene. Instances are rewritten every frame as labels move.

use bytemuck::{Pod, Zeroable};

use crate::depth::DepthBuffer;

/// WGSL source for the marker shader.
pub const MARKER_SHADER_SOURCE: &str = r#"
struct MarkerUniform {
    viewport: vec2<f32>,
    size: f32,
    _pad: f32,
};

@group(0) @binding(0)
var<uniform> marker: MarkerUniform;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) corner: vec2<f32>,
};

@vertex
fn vs_marker(
    @location(0) corner: vec2<f32>,
    @location(1) screen_pos: vec2<f32>,
    @location(2) color: vec3<f32>,
) -> VertexOutput {
    var out: VertexOutput;
    let px = screen_pos + corner * marker.size;
    // Pixel coordinates to NDC; pixel y grows downward.
    let ndc = vec2<f32>(
        px.x / marker.viewport.x * 2.0 - 1.0,
        1.0 - px.y / marker.viewport.y * 2.0,
    );
    out.clip_position = vec4<f32>(ndc, 0.0, 1.0);
    out.color = color;
    out.corner = corner;
    return out;
}

@fragment
fn fs_marker(in: VertexOutput) -> @location(0) vec4<f32> {
    // Diamond shape: Manhattan distance from the center.
    let d = abs(in.corner.x) + abs(in.corner.y);
    let alpha = smoothstep(1.0, 0.6, d) * 0.9;
    return vec4<f32>(in.color * alpha, alpha);
}
"#;

/// Per-instance marker data: projected pixel position and color.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct MarkerInstance {
    pub screen_pos: [f32; 2],
    pub color: [f32; 3],
    pub _pad: f32,
}

impl MarkerInstance {
    /// Build an instance from pixel coordinates and a color.
    pub fn new(x: f32, y: f32, color: [f32; 3]) -> Self {
        Self {
            screen_pos: [x, y],
            color,
            _pad: 0.0,
        }
    }

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MarkerInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: 8,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct CornerVertex {
    corner: [f32; 2],
}

impl CornerVertex {
    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<CornerVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x2,
            }],
        }
    }
}

const QUAD_CORNERS: [CornerVertex; 4] = [
    CornerVertex { corner: [-1.0, -1.0] },
    CornerVertex { corner: [1.0, -1.0] },
    CornerVertex { corner: [-1.0, 1.0] },
    CornerVertex { corner: [1.0, 1.0] },
];

const QUAD_INDICES: [u16; 6] = [0, 1, 2, 2, 1, 3];

/// The fragment shader outputs premultiplied color, so blending must use a
/// source factor of one or alpha gets applied twice.
const SPRITE_BLEND: wgpu::BlendState = wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING;

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct MarkerUniform {
    viewport: [f32; 2],
    size: f32,
    _pad: f32,
}

/// Renders the per-frame set of projected label markers.
pub struct MarkerRenderer {
    pipeline: wgpu::RenderPipeline,
    corner_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    instance_buffer: wgpu::Buffer,
    instance_capacity: u32,
    instance_count: u32,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    /// Marker half-extent in pixels.
    pub size: f32,
}

impl MarkerRenderer {
    /// Create the marker pipeline with a fixed instance capacity.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        instance_capacity: u32,
    ) -> Self {
        use wgpu::util::DeviceExt;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("marker-shader"),
            source: wgpu::ShaderSource::Wgsl(MARKER_SHADER_SOURCE.into()),
        });

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("marker-bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: std::num::NonZeroU64::new(
                            std::mem::size_of::<MarkerUniform>() as u64,
                        ),
                    },
                    count: None,
                }],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("marker-pipeline-layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("marker-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_marker"),
                buffers: &[CornerVertex::layout(), MarkerInstance::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            // Markers ignore the depth buffer entirely; they sit over the scene.
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DepthBuffer::FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Always,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_marker"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(SPRITE_BLEND),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        let corner_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("marker-corners"),
            contents: bytemuck::cast_slice(&QUAD_CORNERS),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("marker-quad-indices"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("marker-instances"),
            size: u64::from(instance_capacity) * std::mem::size_of::<MarkerInstance>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform = MarkerUniform {
            viewport: [1.0, 1.0],
            size: 5.0,
            _pad: 0.0,
        };
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("marker-uniform"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("marker-bg"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Self {
            pipeline,
            corner_buffer,
            index_buffer,
            instance_buffer,
            instance_capacity,
            instance_count: 0,
            uniform_buffer,
            bind_group,
            size: 5.0,
        }
    }

    /// Replace the instance set for the current frame. Instances beyond the
    /// capacity are dropped.
    pub fn update(
        &mut self,
        queue: &wgpu::Queue,
        viewport: (u32, u32),
        instances: &[MarkerInstance],
    ) {
        let uniform = MarkerUniform {
            viewport: [viewport.0 as f32, viewport.1 as f32],
            size: self.size,
            _pad: 0.0,
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniform]));

        let count = instances.len().min(self.instance_capacity as usize);
        if count > 0 {
            queue.write_buffer(
                &self.instance_buffer,
                0,
                bytemuck::cast_slice(&instances[..count]),
            );
        }
        self.instance_count = count as u32;
    }

    /// Draw the current marker set.
    pub fn render<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        if self.instance_count == 0 {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.corner_buffer.slice(..));
        render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        render_pass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..self.instance_count);
    }

    /// Markers drawn this frame.
    pub fn instance_count(&self) -> u32 {
        self.instance_count
    }
}
