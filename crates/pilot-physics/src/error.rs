/// Errors raised when building collision bodies.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PhysicsError {
    #[error("body parameter '{field}' must be positive and finite, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("body parameter '{field}' must be non-negative and finite, got {value}")]
    Negative { field: &'static str, value: f32 },
}
