//! Equirectangular day texture: disk load with a procedural fallback.
//!
//! When the texture file is missing or unreadable, a simple painted globe
//! (ocean blue with two green landmass ellipses) stands in so the viewer
//! still starts.

use std::path::Path;

use tracing::{info, warn};

/// Fallback texture dimensions (longitude × latitude).
const FALLBACK_WIDTH: u32 = 2048;
const FALLBACK_HEIGHT: u32 = 1024;

/// Ocean blue.
const OCEAN: [u8; 4] = [0x1a, 0x5f, 0xb4, 0xff];
/// Landmass green.
const LAND: [u8; 4] = [0x2e, 0x8b, 0x57, 0xff];

/// An RGBA texture in CPU memory, ready for GPU upload.
pub struct EarthTexture {
    pub pixels: Vec<[u8; 4]>,
    pub width: u32,
    pub height: u32,
}

impl EarthTexture {
    /// Decode an image file into RGBA pixels.
    pub fn load(path: &Path) -> Result<Self, image::ImageError> {
        let img = image::open(path)?.into_rgba8();
        let (width, height) = img.dimensions();
        let pixels = img
            .pixels()
            .map(|p| [p.0[0], p.0[1], p.0[2], p.0[3]])
            .collect();
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Paint the procedural fallback globe.
    pub fn fallback() -> Self {
        let mut pixels = vec![OCEAN; (FALLBACK_WIDTH * FALLBACK_HEIGHT) as usize];

        // Two rough continents as filled ellipses, in texture-relative units.
        let continents: [(f32, f32, f32, f32); 2] = [
            (0.5, 0.25, 300.0, 400.0),
            (0.15, 0.3, 250.0, 350.0),
        ];

        for (cx_frac, cy_frac, rx, ry) in continents {
            let cx = cx_frac * FALLBACK_WIDTH as f32;
            let cy = cy_frac * FALLBACK_HEIGHT as f32;
            fill_ellipse(&mut pixels, FALLBACK_WIDTH, FALLBACK_HEIGHT, cx, cy, rx, ry);
        }

        Self {
            pixels,
            width: FALLBACK_WIDTH,
            height: FALLBACK_HEIGHT,
        }
    }
}

fn fill_ellipse(
    pixels: &mut [[u8; 4]],
    width: u32,
    height: u32,
    cx: f32,
    cy: f32,
    rx: f32,
    ry: f32,
) {
    let x_min = ((cx - rx).floor().max(0.0)) as u32;
    let x_max = ((cx + rx).ceil().min(width as f32 - 1.0)) as u32;
    let y_min = ((cy - ry).floor().max(0.0)) as u32;
    let y_max = ((cy + ry).ceil().min(height as f32 - 1.0)) as u32;

    for y in y_min..=y_max {
        for x in x_min..=x_max {
            let dx = (x as f32 - cx) / rx;
            let dy = (y as f32 - cy) / ry;
            if dx * dx + dy * dy <= 1.0 {
                pixels[(y * width + x) as usize] = LAND;
            }
        }
    }
}

/// Load the day texture, falling back to the procedural globe on any error.
pub fn load_or_fallback(path: &Path) -> EarthTexture {
    match EarthTexture::load(path) {
        Ok(texture) => {
            info!(
                "Earth texture {}: {}x{}",
                path.display(),
                texture.width,
                texture.height
            );
            texture
        }
        Err(err) => {
            warn!(
                "Earth texture {} unavailable ({err}), using procedural fallback",
                path.display()
            );
            EarthTexture::fallback()
        }
    }
}
