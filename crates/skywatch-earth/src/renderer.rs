//! GPU pipeline for the textured, sun-shaded globe.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use skywatch_render::{BufferAllocator, CameraUniform, DepthBuffer, IndexData, MeshBuffer};

use crate::rotation::AXIAL_TILT;
use crate::sphere::EarthMesh;
use crate::texture::EarthTexture;

/// Globe radius in scene units.
pub const EARTH_RADIUS: f32 = 5.0;

/// WGSL source for the globe shader.
pub const EARTH_SHADER_SOURCE: &str = r#"
struct CameraUniform {
    view_proj: mat4x4<f32>,
};

struct EarthUniform {
    model: mat4x4<f32>,
    sun_direction: vec3<f32>,
    radius: f32,
};

@group(0) @binding(0)
var<uniform> camera: CameraUniform;

@group(1) @binding(0)
var day_texture: texture_2d<f32>;
@group(1) @binding(1)
var day_sampler: sampler;
@group(1) @binding(2)
var<uniform> earth: EarthUniform;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_normal: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

@vertex
fn vs_earth(
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
) -> VertexOutput {
    var out: VertexOutput;
    let world = earth.model * vec4<f32>(position, 1.0);
    out.clip_position = camera.view_proj * world;
    out.world_normal = normalize((earth.model * vec4<f32>(normal, 0.0)).xyz);
    out.uv = uv;
    return out;
}

@fragment
fn fs_earth(in: VertexOutput) -> @location(0) vec4<f32> {
    let base = textureSample(day_texture, day_sampler, in.uv).rgb;
    // Lambert shading with a floor so the night side stays readable.
    let diffuse = max(dot(normalize(in.world_normal), earth.sun_direction), 0.0);
    let lit = base * (0.15 + 0.85 * diffuse);
    return vec4<f32>(lit, 1.0);
}
"#;

/// GPU uniform for the globe.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct EarthUniform {
    /// Model matrix (tilt × spin × scale).
    pub model: [[f32; 4]; 4],
    /// Normalized sun direction in scene space.
    pub sun_direction: [f32; 3],
    /// Globe radius, baked into the model matrix.
    pub radius: f32,
}

/// Model matrix for the globe: axial tilt, then time-of-day spin, then scale.
pub fn earth_model_matrix(rotation: f32, radius: f32) -> Mat4 {
    Mat4::from_rotation_x(AXIAL_TILT)
        * Mat4::from_rotation_y(rotation)
        * Mat4::from_scale(Vec3::splat(radius))
}

/// Vertex layout: position (vec3), normal (vec3), uv (vec2).
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct EarthVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl EarthVertex {
    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<EarthVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: 12,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: 24,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Owns the GPU resources for drawing the globe.
pub struct EarthRenderer {
    pipeline: wgpu::RenderPipeline,
    mesh_buffer: MeshBuffer,
    earth_uniform_buffer: wgpu::Buffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    earth_bind_group: wgpu::BindGroup,
    radius: f32,
}

impl EarthRenderer {
    /// Create the globe renderer from a mesh and a day texture.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        mesh: &EarthMesh,
        day_texture: &EarthTexture,
    ) -> Self {
        use wgpu::util::DeviceExt;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("earth-shader"),
            source: wgpu::ShaderSource::Wgsl(EARTH_SHADER_SOURCE.into()),
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("earth-camera-bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: std::num::NonZeroU64::new(64),
                    },
                    count: None,
                }],
            });

        let earth_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("earth-bgl"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: std::num::NonZeroU64::new(
                                std::mem::size_of::<EarthUniform>() as u64,
                            ),
                        },
                        count: None,
                    },
                ],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("earth-pipeline-layout"),
            bind_group_layouts: &[&camera_bind_group_layout, &earth_bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("earth-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_earth"),
                buffers: &[EarthVertex::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DepthBuffer::FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::GreaterEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_earth"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        let vertices: Vec<EarthVertex> = (0..mesh.positions.len())
            .map(|i| EarthVertex {
                position: mesh.positions[i].to_array(),
                normal: mesh.normals[i].to_array(),
                uv: mesh.uvs[i],
            })
            .collect();

        let mesh_buffer = BufferAllocator::new(device).create_mesh(
            "earth",
            bytemuck::cast_slice(&vertices),
            IndexData::U32(&mesh.indices),
        );

        let tex_data: Vec<u8> = day_texture
            .pixels
            .iter()
            .flat_map(|p| p.iter().copied())
            .collect();
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some("earth-day-texture"),
                size: wgpu::Extent3d {
                    width: day_texture.width,
                    height: day_texture.height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            &tex_data,
        );
        let texture_view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("earth-day-sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let earth_uniform = EarthUniform {
            model: Mat4::IDENTITY.to_cols_array_2d(),
            sun_direction: [1.0, 0.0, 0.0],
            radius: EARTH_RADIUS,
        };
        let earth_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("earth-uniform"),
            contents: bytemuck::cast_slice(&[earth_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("earth-camera-uniform"),
            contents: &[0u8; 64],
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("earth-camera-bg"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let earth_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("earth-bg"),
            layout: &earth_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: earth_uniform_buffer.as_entire_binding(),
                },
            ],
        });

        Self {
            pipeline,
            mesh_buffer,
            earth_uniform_buffer,
            camera_buffer,
            camera_bind_group,
            earth_bind_group,
            radius: EARTH_RADIUS,
        }
    }

    /// Update the camera and globe uniforms for the current frame.
    pub fn update(&self, queue: &wgpu::Queue, view_proj: Mat4, rotation: f32, sun_position: Vec3) {
        let camera_uniform = CameraUniform {
            view_proj: view_proj.to_cols_array_2d(),
        };
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[camera_uniform]),
        );

        let earth_uniform = EarthUniform {
            model: earth_model_matrix(rotation, self.radius).to_cols_array_2d(),
            sun_direction: sun_position.normalize().to_array(),
            radius: self.radius,
        };
        queue.write_buffer(
            &self.earth_uniform_buffer,
            0,
            bytemuck::cast_slice(&[earth_uniform]),
        );
    }

    /// Draw the globe.
    pub fn render<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
        render_pass.set_bind_group(1, &self.earth_bind_group, &[]);
        self.mesh_buffer.bind(render_pass);
        self.mesh_buffer.draw(render_pass);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_matrix_changes_with_rotation() {
        let t0 = earth_model_matrix(0.0, EARTH_RADIUS);
        let t1 = earth_model_matrix(0.5, EARTH_RADIUS);
        assert_ne!(t0, t1, "Model matrix should change with rotation");

        let equator_point = glam::Vec4::new(1.0, 0.0, 0.0, 1.0);
        let diff = (t0 * equator_point - t1 * equator_point).length();
        assert!(diff > 0.01, "Equator point should move with rotation");
    }

    #[test]
    fn test_model_matrix_applies_tilt() {
        // With zero spin, the north pole should lean away from +Y.
        let m = earth_model_matrix(0.0, 1.0);
        let pole = (m * glam::Vec4::new(0.0, 1.0, 0.0, 1.0)).truncate();
        let lean = pole.normalize().dot(Vec3::Y);
        assert!(
            (lean - AXIAL_TILT.cos()).abs() < 1e-5,
            "pole lean {lean} should match cos(tilt)"
        );
    }

    #[test]
    fn test_model_matrix_scales_to_radius() {
        let m = earth_model_matrix(1.0, EARTH_RADIUS);
        let surface = (m * glam::Vec4::new(1.0, 0.0, 0.0, 1.0)).truncate();
        assert!((surface.length() - EARTH_RADIUS).abs() < 1e-4);
    }

    #[test]
    fn test_earth_uniform_size_alignment() {
        assert_eq!(std::mem::size_of::<EarthUniform>() % 16, 0);
    }

    #[test]
    fn test_earth_vertex_stride() {
        assert_eq!(std::mem::size_of::<EarthVertex>(), 32);
        assert_eq!(EarthVertex::layout().array_stride, 32);
    }

    #[test]
    fn test_shader_entry_points_present() {
        assert!(EARTH_SHADER_SOURCE.contains("fn vs_earth"));
        assert!(EARTH_SHADER_SOURCE.contains("fn fs_earth"));
    }

    fn create_test_device() -> Option<(wgpu::Device, wgpu::Queue)> {
        pollster::block_on(async {
            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
                backends: wgpu::Backends::all(),
                ..Default::default()
            });

            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::default(),
                    compatible_surface: None,
                    force_fallback_adapter: false,
                })
                .await
                .ok()?;

            adapter
                .request_device(&wgpu::DeviceDescriptor::default())
                .await
                .ok()
        })
    }

    #[test]
    fn test_renderer_uploads_mesh_through_allocator() {
        let Some((device, queue)) = create_test_device() else {
            return;
        };

        let mesh = crate::sphere::generate_earth_sphere(1);
        let texture = crate::texture::EarthTexture {
            pixels: vec![[0x1a, 0x5f, 0xb4, 0xff]; 4],
            width: 2,
            height: 2,
        };
        let renderer = EarthRenderer::new(
            &device,
            &queue,
            wgpu::TextureFormat::Bgra8UnormSrgb,
            &mesh,
            &texture,
        );

        assert_eq!(
            renderer.mesh_buffer.index_count,
            mesh.indices.len() as u32,
            "uploaded index count should match the generated mesh"
        );
        assert_eq!(renderer.mesh_buffer.index_format, wgpu::IndexFormat::Uint32);
    }
}
