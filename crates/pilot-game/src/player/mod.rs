//! Player movement module
//!
//! Movement state machine, per-mode velocity integration and the per-tick
//! driver that hands the result to a collision resolver.

mod controller;
pub mod integrator;
mod movement;
mod sprint;
mod state;

pub use controller::{CrouchShape, PlayerController, TickReport};
pub use integrator::{integrate, Integration};
pub use movement::MovementConfig;
pub use sprint::SprintLatch;
pub use state::{select_state, MovementState, StateHooks, StateMachine, SLIDE_SPEED_MARGIN};
