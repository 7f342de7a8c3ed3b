//! World-to-screen projection for label placement.

use glam::{Mat4, Vec3, Vec4};

/// Project a scene-space point to pixel coordinates.
///
/// Returns `None` for points behind the camera (non-positive clip w), which
/// hides their labels for the frame. Points outside the viewport still
/// return coordinates; callers clip as needed.
pub fn project_to_screen(
    world: Vec3,
    view_proj: Mat4,
    viewport: (u32, u32),
) -> Option<(f32, f32)> {
    let clip = view_proj * Vec4::new(world.x, world.y, world.z, 1.0);
    if clip.w <= 0.0 {
        return None;
    }
    let ndc_x = clip.x / clip.w;
    let ndc_y = clip.y / clip.w;
    let x = (ndc_x * 0.5 + 0.5) * viewport.0 as f32;
    let y = (-ndc_y * 0.5 + 0.5) * viewport.1 as f32;
    Some((x, y))
}
