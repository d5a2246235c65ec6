//! Horizontal-plane vector helpers
//!
//! Movement treats the XZ plane and the Y axis with different rules, but the
//! velocity is always stored as a single `Vec3`.

use glam::Vec3;

/// Conversion factor from meters per second to kilometers per hour
pub const MPS_TO_KMH: f32 = 3.6;

/// Project a vector onto the horizontal plane (Y = 0)
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Replace the horizontal components of `v`, keeping its vertical component
pub fn with_horizontal(v: Vec3, horizontal: Vec3) -> Vec3 {
    Vec3::new(horizontal.x, v.y, horizontal.z)
}

/// Length of the horizontal part of a vector
pub fn horizontal_speed(v: Vec3) -> f32 {
    horizontal(v).length()
}

/// Horizontal speed in km/h, as shown by the speed readout
pub fn speed_kmh(v: Vec3) -> f32 {
    horizontal_speed(v) * MPS_TO_KMH
}
