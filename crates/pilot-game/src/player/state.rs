//! Movement state machine
//!
//! Four modes, chosen each tick from the grounded flag reported by the
//! collision resolver, the crouch intent and the current horizontal speed.
//! The previous mode never influences the choice; it only decides whether
//! the enter/exit hooks fire.

use glam::Vec3;
use pilot_core::horizontal_speed;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::input::MotionIntent;

use super::MovementConfig;

/// Speed above the sprint cap needed before crouching turns into a slide
pub const SLIDE_SPEED_MARGIN: f32 = 0.1;

/// Movement mode of a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MovementState {
    /// On a walkable floor, walking or sprinting
    Grounded,
    /// Not supported by a floor
    #[default]
    Airborne,
    /// On a floor with crouch held at low speed
    Crouched,
    /// On a floor with crouch held above sprint speed
    Sliding,
}

impl MovementState {
    pub fn is_grounded(self) -> bool {
        !matches!(self, MovementState::Airborne)
    }

    /// Crouched and sliding both use the short collision shape
    pub fn is_crouching(self) -> bool {
        matches!(self, MovementState::Crouched | MovementState::Sliding)
    }
}

/// Pick the mode for this tick
pub fn select_state(
    grounded: bool,
    intent: &MotionIntent,
    velocity: Vec3,
    config: &MovementConfig,
) -> MovementState {
    if !grounded {
        MovementState::Airborne
    } else if intent.crouch && horizontal_speed(velocity) >= config.slide_threshold() {
        MovementState::Sliding
    } else if intent.crouch {
        MovementState::Crouched
    } else {
        MovementState::Grounded
    }
}

/// Side effects tied to entering and leaving a mode
pub trait StateHooks {
    fn on_exit(&mut self, _state: MovementState) {}
    fn on_enter(&mut self, _state: MovementState) {}
}

impl StateHooks for () {}

/// Owns the current mode and runs the hooks around changes
#[derive(Debug, Clone, Default)]
pub struct StateMachine {
    current: MovementState,
}

impl StateMachine {
    /// Start in the given mode without firing any hook
    pub fn new(initial: MovementState) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> MovementState {
        self.current
    }

    /// Run one transition; hooks fire only when the mode actually changes
    pub fn transition(
        &mut self,
        grounded: bool,
        intent: &MotionIntent,
        velocity: Vec3,
        config: &MovementConfig,
        hooks: &mut impl StateHooks,
    ) -> MovementState {
        let next = select_state(grounded, intent, velocity, config);
        self.set_state(next, hooks);
        next
    }

    /// Force a mode, running the hooks if it differs from the current one
    pub fn set_state(&mut self, next: MovementState, hooks: &mut impl StateHooks) {
        if self.current == next {
            return;
        }

        debug!(from = ?self.current, to = ?next, "Movement state changed");
        hooks.on_exit(self.current);
        self.current = next;
        hooks.on_enter(next);
    }
}
