//! Fixed timestep clock
//!
//! Converts variable frame deltas into a whole number of physics ticks.
//! Movement is only ever stepped with `TimeConfig::fixed_timestep`.

use serde::{Deserialize, Serialize};

/// Errors in time configuration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimeError {
    #[error("fixed timestep must be positive and finite, got {0}")]
    InvalidTimestep(f32),

    #[error("max delta time must be at least one fixed timestep ({timestep}), got {max_delta}")]
    InvalidMaxDelta { max_delta: f32, timestep: f32 },

    #[error("time scale must be non-negative and finite, got {0}")]
    InvalidTimeScale(f32),
}

/// Configuration for the simulation clock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// How many simulated seconds pass per real second
    pub time_scale: f32,
    /// Fixed timestep for physics (in seconds)
    pub fixed_timestep: f32,
    /// Maximum delta time to prevent spiral of death
    pub max_delta_time: f32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            fixed_timestep: 1.0 / 60.0,
            max_delta_time: 0.25,
        }
    }
}

impl TimeConfig {
    /// Check that the clock can produce positive ticks
    pub fn validate(&self) -> Result<(), TimeError> {
        if !self.fixed_timestep.is_finite() || self.fixed_timestep <= 0.0 {
            return Err(TimeError::InvalidTimestep(self.fixed_timestep));
        }
        if !self.max_delta_time.is_finite() || self.max_delta_time < self.fixed_timestep {
            return Err(TimeError::InvalidMaxDelta {
                max_delta: self.max_delta_time,
                timestep: self.fixed_timestep,
            });
        }
        if !self.time_scale.is_finite() || self.time_scale < 0.0 {
            return Err(TimeError::InvalidTimeScale(self.time_scale));
        }
        Ok(())
    }
}

/// Simulation time tracking
#[derive(Debug, Clone)]
pub struct GameTime {
    /// Configuration
    pub config: TimeConfig,
    /// Simulated time since start in seconds
    pub total_time: f64,
    /// Delta time for this frame (clamped and scaled)
    pub delta_time: f32,
    /// Frame counter
    pub frame_count: u64,
    /// Physics ticks run so far
    pub tick_count: u64,
    /// Whether the simulation is paused
    pub paused: bool,
    /// Accumulated time for fixed timestep
    fixed_accumulator: f32,
}

impl Default for GameTime {
    fn default() -> Self {
        Self {
            config: TimeConfig::default(),
            total_time: 0.0,
            delta_time: 0.0,
            frame_count: 0,
            tick_count: 0,
            paused: false,
            fixed_accumulator: 0.0,
        }
    }
}

impl GameTime {
    /// Create a clock with a validated config
    pub fn new(config: TimeConfig) -> Result<Self, TimeError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Default::default()
        })
    }

    /// The physics tick duration in seconds
    pub fn fixed_timestep(&self) -> f32 {
        self.config.fixed_timestep
    }

    /// Update the clock with the raw delta from the previous frame
    pub fn update(&mut self, raw_delta: f32) {
        let clamped = raw_delta.clamp(0.0, self.config.max_delta_time);
        self.frame_count += 1;

        if self.paused {
            self.delta_time = 0.0;
            return;
        }

        self.delta_time = clamped * self.config.time_scale;
        self.total_time += self.delta_time as f64;
        self.fixed_accumulator += self.delta_time;
    }

    /// Drain the accumulator into a number of fixed ticks to run this frame
    pub fn fixed_steps(&mut self) -> u32 {
        let mut steps = 0;
        while self.fixed_accumulator >= self.config.fixed_timestep {
            self.fixed_accumulator -= self.config.fixed_timestep;
            steps += 1;
        }
        self.tick_count += steps as u64;
        steps
    }

    /// Interpolation factor for rendering between physics ticks
    pub fn fixed_interpolation(&self) -> f32 {
        self.fixed_accumulator / self.config.fixed_timestep
    }

    /// Pause the simulation
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume the simulation
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Set the time scale (0.0 = frozen, 1.0 = normal, 2.0 = double speed)
    pub fn set_time_scale(&mut self, scale: f32) {
        self.config.time_scale = scale.max(0.0);
    }
}
