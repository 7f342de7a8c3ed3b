//! Equatorial-to-Cartesian conversion for catalog stars.

use glam::Vec3;

/// Multiplier applied to catalog distances so the star shell sits well
/// outside the Earth sphere at the scene's scale.
pub const DISTANCE_SCALE: f32 = 8.0;

/// Convert right ascension (hours), declination (degrees), and distance into
/// a scene-space position.
///
/// The sky sphere uses Y as the celestial pole axis: right ascension sweeps
/// the XZ plane and declination lifts toward ±Y. The same inputs always give
/// the same output; there is no frame-dependent state.
pub fn position_from_equatorial(ra_hours: f64, dec_deg: f64, distance: f64) -> Vec3 {
    let phi = (ra_hours * std::f64::consts::PI / 12.0) - std::f64::consts::PI;
    let theta = dec_deg.to_radians();
    let d = distance as f32 * DISTANCE_SCALE;

    Vec3::new(
        d * (theta.cos() * phi.cos()) as f32,
        d * theta.sin() as f32,
        d * (theta.cos() * phi.sin()) as f32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_is_deterministic() {
        let a = position_from_equatorial(6.752481, -16.716116, 2.6371);
        let b = position_from_equatorial(6.752481, -16.716116, 2.6371);
        assert_eq!(a, b);
    }

    #[test]
    fn test_radius_equals_scaled_distance() {
        let pos = position_from_equatorial(3.25, 41.0, 10.0);
        let expected = 10.0 * DISTANCE_SCALE;
        assert!(
            (pos.length() - expected).abs() < 1e-3,
            "radius {} != scaled distance {expected}",
            pos.length()
        );
    }

    #[test]
    fn test_north_pole_is_plus_y() {
        let pos = position_from_equatorial(0.0, 90.0, 1.0);
        assert!(pos.x.abs() < 1e-4);
        assert!(pos.z.abs() < 1e-4);
        assert!((pos.y - DISTANCE_SCALE).abs() < 1e-4);
    }

    #[test]
    fn test_ra_zero_on_negative_x() {
        // ra = 0h maps to phi = -PI, i.e. the -X direction on the equator.
        let pos = position_from_equatorial(0.0, 0.0, 1.0);
        assert!((pos.x + DISTANCE_SCALE).abs() < 1e-4);
        assert!(pos.y.abs() < 1e-4);
        assert!(pos.z.abs() < 1e-3);
    }

    #[test]
    fn test_twelve_hours_is_opposite_direction() {
        let a = position_from_equatorial(0.0, 0.0, 1.0);
        let b = position_from_equatorial(12.0, 0.0, 1.0);
        assert!(
            (a + b).length() < 1e-3,
            "0h and 12h should be antipodal: {a:?} vs {b:?}"
        );
    }
}
