use thiserror::Error;

/// Rejected movement tuning, reported when a controller is built
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("movement parameter '{field}' must be non-negative and finite, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("movement parameter '{field}' must be positive and finite, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("max slope must be strictly between 0 and 90 degrees, got {0}")]
    InvalidSlope(f32),

    #[error("crouch height ({crouch}) is taller than standing height ({standing})")]
    CrouchTallerThanStanding { crouch: f32, standing: f32 },
}
