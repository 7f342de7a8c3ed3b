//! GPU rendering for the sky viewer: device setup, camera, depth, and the
//! star, constellation line, and label marker pipelines.

pub mod buffer;
pub mod camera;
pub mod depth;
pub mod gpu;
pub mod lines;
pub mod markers;
pub mod pass;
pub mod stars;

pub use buffer::{BufferAllocator, IndexData, MeshBuffer};
pub use camera::{Camera, CameraUniform};
pub use depth::DepthBuffer;
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use lines::LineRenderer;
pub use markers::{MarkerInstance, MarkerRenderer};
pub use pass::{FrameEncoder, RenderPassBuilder, SPACE_BLACK};
pub use stars::{StarInstance, StarRenderer};
