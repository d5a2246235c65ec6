//! Pilot Core - Core types and utilities for the Pilot movement controller
//!
//! This crate provides the foundational types used throughout the workspace:
//! - Mathematical primitives (re-exported from glam)
//! - Horizontal-plane helpers shared by the integrator and the collision layer
//! - Fixed timestep clock for driving physics ticks

pub mod math;
pub mod time;

pub use glam::{Vec2, Vec3};
pub use math::{horizontal, horizontal_speed, speed_kmh, with_horizontal};
pub use time::{GameTime, TimeConfig, TimeError};
