//! Camera look module
//!
//! Mouse look for a first-person camera. The movement core only reads the
//! horizontal `CameraBasis` produced here.

mod config;
mod controller;

pub use config::LookConfig;
pub use controller::{CameraBasis, LookController};
