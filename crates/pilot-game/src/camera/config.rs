//! Camera look configuration

use serde::{Deserialize, Serialize};

/// Mouse look configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookConfig {
    /// Mouse sensitivity (degrees per pixel, both axes)
    pub sensitivity_degrees: f32,
    /// Minimum pitch angle in degrees
    pub pitch_min: f32,
    /// Maximum pitch angle in degrees
    pub pitch_max: f32,
}

impl Default for LookConfig {
    fn default() -> Self {
        Self {
            sensitivity_degrees: 0.2,
            pitch_min: -90.0,
            pitch_max: 90.0,
        }
    }
}
