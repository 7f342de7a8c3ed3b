//! The rotating Earth: sphere mesh, day texture with procedural fallback,
//! UTC-driven rotation state, and the textured render pipeline.

pub mod renderer;
pub mod rotation;
pub mod sphere;
pub mod texture;

pub use renderer::{EARTH_RADIUS, EarthRenderer};
pub use rotation::{AXIAL_TILT, EarthState, rotation_angle, sun_position, utc_hours};
pub use sphere::{EarthMesh, generate_earth_sphere};
pub use texture::{EarthTexture, load_or_fallback};
