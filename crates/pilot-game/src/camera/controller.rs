//! First-person mouse look

use glam::{Vec2, Vec3};

use super::LookConfig;

/// Horizontal forward/right unit vectors of the camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBasis {
    pub forward: Vec3,
    pub right: Vec3,
}

impl CameraBasis {
    /// Basis for a yaw angle in radians (yaw 0 looks down -Z)
    pub fn from_yaw(yaw: f32) -> Self {
        let (sin, cos) = yaw.sin_cos();
        Self {
            forward: Vec3::new(sin, 0.0, -cos),
            right: Vec3::new(cos, 0.0, sin),
        }
    }
}

impl Default for CameraBasis {
    fn default() -> Self {
        Self::from_yaw(0.0)
    }
}

/// Accumulates yaw and pitch from mouse motion
#[derive(Debug, Clone)]
pub struct LookController {
    /// Configuration
    pub config: LookConfig,
    /// Yaw rotation in radians (horizontal)
    pub yaw: f32,
    /// Pitch rotation in radians (vertical)
    pub pitch: f32,
}

impl LookController {
    /// Create a new look controller
    pub fn new() -> Self {
        Self::with_config(LookConfig::default())
    }

    /// Create a look controller with custom config
    pub fn with_config(config: LookConfig) -> Self {
        Self {
            config,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// Apply a mouse delta in pixels
    pub fn handle_mouse_look(&mut self, mouse_delta: Vec2) {
        let sensitivity = self.config.sensitivity_degrees.to_radians();
        self.yaw += mouse_delta.x * sensitivity;
        self.set_pitch(self.pitch - mouse_delta.y * sensitivity);
    }

    /// Set the camera yaw directly
    pub fn set_yaw(&mut self, yaw: f32) {
        self.yaw = yaw;
    }

    /// Set the camera pitch directly
    pub fn set_pitch(&mut self, pitch: f32) {
        let pitch_min = self.config.pitch_min.to_radians();
        let pitch_max = self.config.pitch_max.to_radians();
        self.pitch = pitch.clamp(pitch_min, pitch_max);
    }

    /// Full view direction including pitch
    pub fn look_direction(&self) -> Vec3 {
        let cos_pitch = self.pitch.cos();
        Vec3::new(
            self.yaw.sin() * cos_pitch,
            self.pitch.sin(),
            -self.yaw.cos() * cos_pitch,
        )
    }

    /// Horizontal basis consumed by the movement intent
    pub fn basis(&self) -> CameraBasis {
        CameraBasis::from_yaw(self.yaw)
    }
}

impl Default for LookController {
    fn default() -> Self {
        Self::new()
    }
}
