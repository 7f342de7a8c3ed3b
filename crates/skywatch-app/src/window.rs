//! Window creation and event handling via winit.
//!
//! Provides [`SkyApp`] which implements winit's [`ApplicationHandler`] trait,
//! and [`run`] to start the event loop.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use glam::Vec3;
use tracing::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowAttributes, WindowId};

use skywatch_config::Config;
use skywatch_earth::{
    EarthRenderer, EarthState, generate_earth_sphere, load_or_fallback,
};
use skywatch_overlay::{OverlayVisibility, place_labels};
use skywatch_render::{
    Camera, DepthBuffer, FrameEncoder, LineRenderer, MarkerInstance, MarkerRenderer,
    RenderContext, RenderPassBuilder, StarInstance, StarRenderer, SurfaceError,
    init_render_context_blocking,
};

use crate::scene::SceneData;

/// Camera distance from the globe, matching a comfortable full-disc view.
const CAMERA_DISTANCE: f32 = 15.0;

/// Vertical field of view in radians (75 degrees).
const CAMERA_FOV_Y: f32 = 75.0 * std::f32::consts::PI / 180.0;

/// Sphere subdivision level for the globe mesh.
const EARTH_SUBDIVISIONS: u32 = 5;

/// Auto-orbit rate around the globe, radians per second.
const ORBIT_RATE: f32 = 0.02;

/// Zoom limits keep the globe visible without clipping through it.
const MIN_CAMERA_DISTANCE: f32 = 8.0;
const MAX_CAMERA_DISTANCE: f32 = 40.0;

/// Zoom step per scroll-wheel line.
const ZOOM_STEP: f32 = 1.0;

/// One stage of the scene pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DrawStage {
    Globe,
    Stars,
    Lines,
    Markers,
}

/// The globe draws first so its depth is written before the star and line
/// pipelines (which test depth but never write it) draw; stars in front of
/// the globe survive, stars behind it are occluded. Markers ignore depth and
/// stay on top.
const DRAW_ORDER: [DrawStage; 4] = [
    DrawStage::Globe,
    DrawStage::Stars,
    DrawStage::Lines,
    DrawStage::Markers,
];

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ))
}

/// Application state: window, GPU context, scene data, and renderers.
pub struct SkyApp {
    window: Option<Arc<Window>>,
    gpu: Option<RenderContext>,
    config: Config,
    scene: SceneData,
    camera: Camera,
    visibility: OverlayVisibility,
    depth_buffer: Option<DepthBuffer>,
    star_renderer: Option<StarRenderer>,
    line_renderer: Option<LineRenderer>,
    marker_renderer: Option<MarkerRenderer>,
    earth_renderer: Option<EarthRenderer>,
    camera_yaw: f32,
    camera_distance: f32,
    last_frame: Option<Instant>,
    /// Second-of-day of the last title update, to throttle to 1 Hz.
    last_title_second: u32,
}

impl SkyApp {
    /// Build the application from a loaded config and scene.
    pub fn new(config: Config, scene: SceneData) -> Self {
        let mut camera = Camera {
            position: Vec3::new(0.0, 0.0, CAMERA_DISTANCE),
            fov_y: CAMERA_FOV_Y,
            aspect_ratio: config.window.width as f32 / config.window.height.max(1) as f32,
            ..Camera::default()
        };
        camera.look_at(Vec3::ZERO, Vec3::Y);

        let visibility = OverlayVisibility {
            show_constellations: config.sky.show_constellations,
        };

        Self {
            window: None,
            gpu: None,
            config,
            scene,
            camera,
            visibility,
            depth_buffer: None,
            star_renderer: None,
            line_renderer: None,
            marker_renderer: None,
            earth_renderer: None,
            camera_yaw: 0.0,
            camera_distance: CAMERA_DISTANCE,
            last_frame: None,
            last_title_second: u32::MAX,
        }
    }

    /// Advance the slow auto-orbit and reposition the camera on its ring.
    fn update_camera(&mut self) {
        let now = Instant::now();
        let dt = self
            .last_frame
            .map(|t| now.duration_since(t).as_secs_f32())
            .unwrap_or(0.0);
        self.last_frame = Some(now);

        self.camera_yaw = (self.camera_yaw + ORBIT_RATE * dt) % std::f32::consts::TAU;
        self.camera.position = Vec3::new(
            self.camera_distance * self.camera_yaw.sin(),
            0.0,
            self.camera_distance * self.camera_yaw.cos(),
        );
        self.camera.look_at(Vec3::ZERO, Vec3::Y);
    }

    fn handle_zoom(&mut self, delta: MouseScrollDelta) {
        let lines = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 40.0,
        };
        // Scrolling up (positive) zooms in.
        self.camera_distance = (self.camera_distance - lines * ZOOM_STEP)
            .clamp(MIN_CAMERA_DISTANCE, MAX_CAMERA_DISTANCE);
    }

    /// Create every GPU resource once the device exists.
    fn initialize_rendering(&mut self, ctx: &RenderContext) {
        let width = ctx.surface_config.width;
        let height = ctx.surface_config.height;
        self.depth_buffer = Some(DepthBuffer::new(&ctx.device, width, height));

        let instances: Vec<StarInstance> = self
            .scene
            .catalog
            .positions
            .iter()
            .zip(self.scene.catalog.colors.iter())
            .map(|(&position, &color)| StarInstance { position, color })
            .collect();
        self.star_renderer = Some(StarRenderer::new(
            &ctx.device,
            ctx.surface_format,
            &instances,
        ));

        let segments = self.scene.all_segments();
        self.line_renderer = Some(LineRenderer::new(
            &ctx.device,
            ctx.surface_format,
            &segments,
        ));

        self.marker_renderer = Some(MarkerRenderer::new(
            &ctx.device,
            ctx.surface_format,
            self.scene.labels.len().max(1) as u32,
        ));

        let mesh = generate_earth_sphere(EARTH_SUBDIVISIONS);
        let texture = load_or_fallback(&self.config.data.earth_texture_path());
        self.earth_renderer = Some(EarthRenderer::new(
            &ctx.device,
            &ctx.queue,
            ctx.surface_format,
            &mesh,
            &texture,
        ));

        info!(
            "Renderers ready: {} stars, {} line vertices, {} labels",
            instances.len(),
            segments.len() * 2,
            self.scene.labels.len()
        );
    }

    fn handle_resize(&mut self, width: u32, height: u32) {
        self.camera.set_aspect_ratio(width as f32, height as f32);
        if let Some(gpu) = &mut self.gpu {
            gpu.resize(width, height);
        }
        if let (Some(depth_buffer), Some(gpu)) = (&mut self.depth_buffer, &self.gpu) {
            depth_buffer.resize(&gpu.device, width, height);
        }
        info!("Window resized to {width}x{height}");
    }

    fn render_frame(&mut self) {
        self.update_camera();

        let Some(gpu) = &self.gpu else {
            return;
        };

        let now = Utc::now();
        let earth_state = EarthState::at(now);
        let view_proj = self.camera.view_projection_matrix();
        let viewport = (gpu.surface_config.width, gpu.surface_config.height);

        if let Some(stars) = &self.star_renderer {
            stars.update(&gpu.queue, view_proj, viewport);
        }
        if let Some(lines) = &self.line_renderer {
            lines.update(&gpu.queue, view_proj);
        }
        if let Some(earth) = &self.earth_renderer {
            earth.update(
                &gpu.queue,
                view_proj,
                earth_state.rotation,
                earth_state.sun_position,
            );
        }

        let placed = place_labels(&self.scene.labels, self.visibility, view_proj, viewport);
        if let Some(markers) = &mut self.marker_renderer {
            let instances: Vec<MarkerInstance> = placed
                .iter()
                .map(|label| MarkerInstance::new(label.x, label.y, label.kind.color()))
                .collect();
            markers.update(&gpu.queue, viewport, &instances);
        }

        // Mirror the status readout into the window title, once per second.
        let second = now.timestamp() as u32;
        if second != self.last_title_second
            && let Some(window) = &self.window
        {
            window.set_title(
                &self
                    .scene
                    .status
                    .format(now, earth_state.rotation_degrees()),
            );
            self.last_title_second = second;
        }

        match gpu.get_current_texture() {
            Ok(surface_texture) => {
                let mut encoder = FrameEncoder::new(
                    &gpu.device,
                    Arc::new(gpu.queue.clone()),
                    surface_texture,
                );

                let depth_view = self
                    .depth_buffer
                    .as_ref()
                    .map(|d| d.view.clone())
                    .expect("depth buffer created with the surface");
                let builder = RenderPassBuilder::new()
                    .label("sky-pass")
                    .depth(depth_view, DepthBuffer::CLEAR_VALUE);

                {
                    let mut pass = encoder.begin_render_pass(&builder);
                    for stage in DRAW_ORDER {
                        match stage {
                            DrawStage::Globe => {
                                if let Some(earth) = &self.earth_renderer {
                                    earth.render(&mut pass);
                                }
                            }
                            DrawStage::Stars => {
                                if let Some(stars) = &self.star_renderer {
                                    stars.render(&mut pass);
                                }
                            }
                            DrawStage::Lines => {
                                if self.visibility.show_constellations
                                    && let Some(lines) = &self.line_renderer
                                {
                                    lines.render(&mut pass);
                                }
                            }
                            DrawStage::Markers => {
                                if let Some(markers) = &self.marker_renderer {
                                    markers.render(&mut pass);
                                }
                            }
                        }
                    }
                }

                encoder.submit();
            }
            Err(SurfaceError::Lost) => {
                warn!("Surface lost, skipping frame");
            }
            Err(SurfaceError::OutOfMemory) => {
                error!("GPU out of memory");
            }
            Err(SurfaceError::Timeout) => {
                warn!("Surface timeout, skipping frame");
            }
        }
    }
}

impl ApplicationHandler for SkyApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let attrs = window_attributes_from_config(&self.config);
            let window = event_loop
                .create_window(attrs)
                .expect("Failed to create window");
            let window = Arc::new(window);

            if let Some(latest) = self.scene.feed.latest() {
                window.set_title(latest);
            }

            match init_render_context_blocking(window.clone()) {
                Ok(ctx) => {
                    self.initialize_rendering(&ctx);
                    self.gpu = Some(ctx);
                }
                Err(e) => {
                    error!("GPU initialization failed: {e}");
                    event_loop.exit();
                    return;
                }
            }

            self.window = Some(window);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                self.handle_resize(new_size.width, new_size.height);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.handle_zoom(delta);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && !event.repeat
                    && event.physical_key == PhysicalKey::Code(KeyCode::KeyC)
                {
                    let shown = self.visibility.toggle_constellations();
                    info!(
                        "Constellation overlay {}",
                        if shown { "shown" } else { "hidden" }
                    );
                }
            }
            WindowEvent::RedrawRequested => {
                self.render_frame();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Creates an event loop and runs the viewer with the given config.
///
/// Blocks until the window is closed.
pub fn run(config: Config) {
    let scene = SceneData::load(&config);
    let event_loop = EventLoop::new().expect("Failed to create event loop");
    let mut app = SkyApp::new(config, scene);
    event_loop.run_app(&mut app).expect("Event loop failed");
}
