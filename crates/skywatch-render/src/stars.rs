//! Instanced star sprite pipeline.
//!
//! Each catalog star is one instance of a small screen-facing quad. The quad
//! is expanded in clip space by a fixed pixel size, so stars keep a constant
//! on-screen footprint regardless of catalog distance.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::depth::DepthBuffer;

/// WGSL source for the star sprite shader.
pub const STAR_SHADER_SOURCE: &str = r#"
struct StarUniform {
    view_proj: mat4x4<f32>,
    viewport: vec2<f32>,
    point_size: f32,
    _pad: f32,
};

@group(0) @binding(0)
var<uniform> star: StarUniform;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) corner: vec2<f32>,
};

@vertex
fn vs_star(
    @location(0) corner: vec2<f32>,
    @location(1) position: vec3<f32>,
    @location(2) color: vec3<f32>,
) -> VertexOutput {
    var out: VertexOutput;
    var clip = star.view_proj * vec4<f32>(position, 1.0);
    // Expand by a fixed pixel size: pixel -> NDC -> clip (multiply by w).
    clip.x += corner.x * star.point_size / star.viewport.x * 2.0 * clip.w;
    clip.y += corner.y * star.point_size / star.viewport.y * 2.0 * clip.w;
    out.clip_position = clip;
    out.color = color;
    out.corner = corner;
    return out;
}

@fragment
fn fs_star(in: VertexOutput) -> @location(0) vec4<f32> {
    // Radial falloff gives a soft round point instead of a hard square.
    let d = length(in.corner);
    let alpha = smoothstep(1.0, 0.2, d);
    return vec4<f32>(in.color * alpha, alpha);
}
"#;

/// Per-instance star data: scene position and display color.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct StarInstance {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl StarInstance {
    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<StarInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: 12,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Shared quad corner vertex: one of four sprite corners in [-1, 1].
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

/// GPU uniform for the star pipeline.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct StarUniform {
    view_proj: [[f32; 4]; 4],
    viewport: [f32; 2],
    point_size: f32,
    _pad: f32,
}

/// Renders the whole star catalog with one instanced draw.
pub struct StarRenderer {
    pipeline: wgpu::RenderPipeline,
    corner_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    instance_buffer: wgpu::Buffer,
    instance_count: u32,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    /// Sprite footprint in pixels.
    pub point_size: f32,
}

impl StarRenderer {
    /// Create the star pipeline and upload the instance set.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        instances: &[StarInstance],
    ) -> Self {
        use wgpu::util::DeviceExt;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("star-shader"),
            source: wgpu::ShaderSource::Wgsl(STAR_SHADER_SOURCE.into()),
        });

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("star-bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: std::num::NonZeroU64::new(
                            std::mem::size_of::<StarUniform>() as u64,
                        ),
                    },
                    count: None,
                }],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("star-pipeline-layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("star-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_star"),
                buffers: &[CornerVertex::layout(), StarInstance::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            // Stars test against the globe's depth but never write their own,
            // so sprites behind the globe are occluded and sprites in front
            // blend over it without fighting each other.
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DepthBuffer::FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::GreaterEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_star"),
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
            label: Some("star-corners"),
            contents: bytemuck::cast_slice(&QUAD_CORNERS),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("star-quad-indices"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("star-instances"),
            contents: bytemuck::cast_slice(instances),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let uniform = StarUniform {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            viewport: [1.0, 1.0],
            point_size: 2.5,
            _pad: 0.0,
        };
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("star-uniform"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("star-bg"),
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
            instance_count: instances.len() as u32,
            uniform_buffer,
            bind_group,
            point_size: 2.5,
        }
    }

    /// Update the per-frame uniform.
    pub fn update(&self, queue: &wgpu::Queue, view_proj: Mat4, viewport: (u32, u32)) {
        let uniform = StarUniform {
            view_proj: view_proj.to_cols_array_2d(),
            viewport: [viewport.0 as f32, viewport.1 as f32],
            point_size: self.point_size,
            _pad: 0.0,
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    /// Draw all star instances.
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

    /// Number of stars uploaded to the GPU.
    pub fn instance_count(&self) -> u32 {
        self.instance_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_instance_stride() {
        // position (f32×3) + color (f32×3) = 24 bytes
        assert_eq!(std::mem::size_of::<StarInstance>(), 24);
        assert_eq!(StarInstance::layout().array_stride, 24);
    }

    #[test]
    fn test_star_instance_layout_steps_per_instance() {
        assert_eq!(
            StarInstance::layout().step_mode,
            wgpu::VertexStepMode::Instance
        );
    }

    #[test]
    fn test_star_uniform_size_alignment() {
        assert_eq!(std::mem::size_of::<StarUniform>() % 16, 0);
    }

    #[test]
    fn test_shader_entry_points_present() {
        assert!(STAR_SHADER_SOURCE.contains("fn vs_star"));
        assert!(STAR_SHADER_SOURCE.contains("fn fs_star"));
    }

    #[test]
    fn test_blend_matches_premultiplied_fragment_output() {
        // fs_star returns color already scaled by alpha.
        assert!(STAR_SHADER_SOURCE.contains("in.color * alpha"));
        assert_eq!(
            SPRITE_BLEND.color.src_factor,
            wgpu::BlendFactor::One,
            "premultiplied output must not be scaled by alpha again"
        );
    }

    #[test]
    fn test_quad_indices_cover_four_corners() {
        let mut seen: Vec<u16> = QUAD_INDICES.to_vec();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen, vec![0, 1, 2, 3]);
    }
}
