//! Sprint latch

use crate::input::MotionIntent;

use super::MovementState;

/// Sprint stays on after a press until the character stops moving or crouches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SprintLatch {
    active: bool,
}

impl SprintLatch {
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Update from this tick's intent and the mode the state machine picked
    pub fn update(&mut self, intent: &MotionIntent, state: MovementState) -> bool {
        if intent.sprint {
            self.active = true;
        }
        if !intent.axes.any() || state.is_crouching() {
            self.active = false;
        }
        self.active
    }

    pub fn reset(&mut self) {
        self.active = false;
    }
}
