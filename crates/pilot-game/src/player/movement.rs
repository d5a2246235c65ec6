//! Movement configuration and constants

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Movement tuning for one character archetype.
///
/// Speeds are in meters per second, accelerations and friction coefficients
/// are per second. Deceleration is usually larger than acceleration so that
/// stopping feels snappier than starting, but nothing enforces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Downward acceleration applied every tick
    pub gravity: f32,
    /// Target speed while walking
    pub max_walk_speed: f32,
    /// Target speed while the sprint latch is set
    pub max_sprint_speed: f32,
    /// Target speed while crouched
    pub max_crouch_speed: f32,
    /// Speed cap along the wish direction for air acceleration
    pub max_air_speed: f32,
    /// Seek rate when keeping or turning toward the current heading
    pub acceleration: f32,
    /// Seek rate when turning away or stopping
    pub deceleration: f32,
    /// Air acceleration with strafe input
    pub air_acceleration: f32,
    /// Air acceleration with forward held alone
    pub air_forward_acceleration: f32,
    /// Vertical velocity set by a jump
    pub jump_speed: f32,
    /// Friction when grounded with no movement key held
    pub ground_friction: f32,
    /// Friction while sliding
    pub slide_friction: f32,
    /// Steepest walkable floor in degrees
    pub max_slope_degrees: f32,
    /// How far below the feet the resolver may snap to a floor
    pub snap_distance: f32,
    /// Collision height when standing
    pub standing_height: f32,
    /// Collision height when crouched or sliding
    pub crouch_height: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            gravity: 20.0,
            max_walk_speed: 5.0,
            max_sprint_speed: 8.5,
            max_crouch_speed: 2.5,
            max_air_speed: 1.0,
            acceleration: 15.0,
            deceleration: 25.0,
            air_acceleration: 40.0,
            air_forward_acceleration: 4.0,
            jump_speed: 7.0,
            ground_friction: 8.0,
            slide_friction: 0.8,
            max_slope_degrees: 45.0,
            snap_distance: 0.25,
            standing_height: 1.8,
            crouch_height: 1.0,
        }
    }
}

impl MovementConfig {
    /// Reject tuning that would produce non-physical motion
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("gravity", self.gravity),
            ("max_walk_speed", self.max_walk_speed),
            ("max_sprint_speed", self.max_sprint_speed),
            ("max_crouch_speed", self.max_crouch_speed),
            ("max_air_speed", self.max_air_speed),
            ("acceleration", self.acceleration),
            ("deceleration", self.deceleration),
            ("air_acceleration", self.air_acceleration),
            ("air_forward_acceleration", self.air_forward_acceleration),
            ("jump_speed", self.jump_speed),
            ("ground_friction", self.ground_friction),
            ("slide_friction", self.slide_friction),
            ("snap_distance", self.snap_distance),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        for (field, value) in [
            ("standing_height", self.standing_height),
            ("crouch_height", self.crouch_height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        if !(self.max_slope_degrees > 0.0 && self.max_slope_degrees < 90.0) {
            return Err(ConfigError::InvalidSlope(self.max_slope_degrees));
        }

        if self.crouch_height > self.standing_height {
            return Err(ConfigError::CrouchTallerThanStanding {
                crouch: self.crouch_height,
                standing: self.standing_height,
            });
        }

        Ok(())
    }

    /// Steepest walkable floor in radians
    pub fn max_slope_angle(&self) -> f32 {
        self.max_slope_degrees.to_radians()
    }

    /// Grounded target speed for the sprint latch
    pub fn ground_speed(&self, sprinting: bool) -> f32 {
        if sprinting {
            self.max_sprint_speed
        } else {
            self.max_walk_speed
        }
    }

    /// Horizontal speed at or above which crouching starts a slide
    pub fn slide_threshold(&self) -> f32 {
        self.max_sprint_speed + super::state::SLIDE_SPEED_MARGIN
    }
}
