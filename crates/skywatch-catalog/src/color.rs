//! Spectral class to display color mapping.

/// Fallback for unknown or missing spectral classes.
const WHITE: [f32; 3] = [1.0, 1.0, 1.0];

const fn rgb8(r: u8, g: u8, b: u8) -> [f32; 3] {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0]
}

/// Map a spectral class string to an approximate display color.
///
/// Only the leading letter matters: the classic O-through-M temperature
/// sequence runs blue-white to orange. Anything else renders white.
pub fn spectral_color(spectral: Option<&str>) -> [f32; 3] {
    let Some(class) = spectral.and_then(|s| s.chars().next()) else {
        return WHITE;
    };
    match class.to_ascii_uppercase() {
        'O' => rgb8(0x9b, 0xb0, 0xff),
        'B' => rgb8(0xaa, 0xbf, 0xff),
        'A' => rgb8(0xca, 0xd7, 0xff),
        'F' => rgb8(0xf8, 0xf7, 0xff),
        'G' => rgb8(0xff, 0xf4, 0xea),
        'K' => rgb8(0xff, 0xd2, 0xa1),
        'M' => rgb8(0xff, 0xcc, 0x6f),
        _ => WHITE,
    }
}
