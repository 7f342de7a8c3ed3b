//! UTC-clock-driven Earth rotation and sun placement.
//!
//! All per-frame state derives from the wall clock: the globe's yaw tracks
//! the current UTC time of day and the sun sits opposite the facing
//! longitude, so the terminator matches real day and night.

use chrono::{DateTime, Timelike, Utc};
use glam::Vec3;

/// Earth's axial tilt in radians, applied around the X axis.
pub const AXIAL_TILT: f32 = -0.41;

/// Distance of the directional sun from the origin.
pub const SUN_DISTANCE: f32 = 10.0;

/// Fractional hours since UTC midnight, sub-second precision.
pub fn utc_hours(time: DateTime<Utc>) -> f64 {
    f64::from(time.hour())
        + f64::from(time.minute()) / 60.0
        + f64::from(time.second()) / 3600.0
        + f64::from(time.nanosecond()) / 3.6e12
}

/// Yaw angle for the given UTC time of day.
///
/// One full turn per 24 hours, offset so the prime meridian faces the
/// camera at 06:00 UTC.
pub fn rotation_angle(utc_hours: f64) -> f32 {
    (utc_hours * std::f64::consts::PI / 12.0 - std::f64::consts::FRAC_PI_2) as f32
}

/// Sun position for the given yaw: opposite the facing longitude, on the
/// equatorial plane.
pub fn sun_position(rotation: f32) -> Vec3 {
    let angle = rotation + std::f32::consts::PI;
    Vec3::new(SUN_DISTANCE * angle.cos(), 0.0, SUN_DISTANCE * angle.sin())
}

/// Per-frame Earth state derived from a UTC timestamp.
#[derive(Clone, Copy, Debug)]
pub struct EarthState {
    /// Fractional hours since UTC midnight.
    pub utc_hours: f64,
    /// Yaw around the (tilted) Y axis.
    pub rotation: f32,
    /// Sun position in scene space.
    pub sun_position: Vec3,
}

impl EarthState {
    /// Compute the state for a timestamp.
    pub fn at(time: DateTime<Utc>) -> Self {
        let hours = utc_hours(time);
        let rotation = rotation_angle(hours);
        Self {
            utc_hours: hours,
            rotation,
            sun_position: sun_position(rotation),
        }
    }

    /// Rotation in degrees, for the status readout.
    pub fn rotation_degrees(&self) -> f32 {
        self.rotation.to_degrees()
    }
}
