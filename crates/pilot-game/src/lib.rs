//! Pilot Game - First-person movement logic
//!
//! Provides input intent, camera look, and the player movement core.

pub mod camera;
pub mod error;
pub mod input;
pub mod player;

pub use camera::{CameraBasis, LookConfig, LookController};
pub use error::ConfigError;
pub use input::{InputAction, InputState, MotionIntent, MoveAxes};
pub use player::{
    integrate, select_state, CrouchShape, Integration, MovementConfig, MovementState,
    PlayerController, SprintLatch, StateHooks, StateMachine, TickReport,
};
