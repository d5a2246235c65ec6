//! Input system with action-based mapping
//!
//! Device polling lives outside this crate: whoever owns the window feeds
//! `press`/`release` calls into an `InputState`. Each physics tick the state
//! is reduced to a `MotionIntent`, the only input the movement core reads.

use std::collections::HashSet;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::camera::CameraBasis;

/// Actions that drive the character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputAction {
    /// Move forward (W by default)
    MoveForward,
    /// Move backward (S by default)
    MoveBackward,
    /// Move left (A by default)
    MoveLeft,
    /// Move right (D by default)
    MoveRight,
    /// Jump (Space by default)
    Jump,
    /// Sprint (Shift by default)
    Sprint,
    /// Crouch (Ctrl by default)
    Crouch,
}

/// Current state of all inputs for a frame
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Actions currently held down
    pub held: HashSet<InputAction>,
    /// Actions that were just pressed this frame
    pub just_pressed: HashSet<InputAction>,
    /// Actions that were just released this frame
    pub just_released: HashSet<InputAction>,
    /// Mouse movement delta for this frame
    pub look_delta: Vec2,
}

impl InputState {
    /// Create a new empty input state
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an action is currently held
    pub fn is_held(&self, action: InputAction) -> bool {
        self.held.contains(&action)
    }

    /// Check if an action was just pressed this frame
    pub fn is_just_pressed(&self, action: InputAction) -> bool {
        self.just_pressed.contains(&action)
    }

    /// Check if an action was just released this frame
    pub fn is_just_released(&self, action: InputAction) -> bool {
        self.just_released.contains(&action)
    }

    /// Record a press; repeats while already held do not count as a new press
    pub fn press(&mut self, action: InputAction) {
        if self.held.insert(action) {
            self.just_pressed.insert(action);
        }
    }

    /// Record a release
    pub fn release(&mut self, action: InputAction) {
        if self.held.remove(&action) {
            self.just_released.insert(action);
        }
    }

    /// Accumulate mouse motion for this frame
    pub fn add_look_delta(&mut self, delta: Vec2) {
        self.look_delta += delta;
    }

    /// Take the accumulated mouse motion, leaving zero behind
    pub fn take_look_delta(&mut self) -> Vec2 {
        std::mem::take(&mut self.look_delta)
    }

    /// Clear frame-specific data (call after the frame's ticks ran)
    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
        self.look_delta = Vec2::ZERO;
    }
}

/// The four level-triggered movement keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveAxes {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveAxes {
    /// Read the held movement keys
    pub fn from_input(input: &InputState) -> Self {
        Self {
            forward: input.is_held(InputAction::MoveForward),
            backward: input.is_held(InputAction::MoveBackward),
            left: input.is_held(InputAction::MoveLeft),
            right: input.is_held(InputAction::MoveRight),
        }
    }

    /// Whether any movement key is held
    pub fn any(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }

    /// Whether forward is the only movement key held
    pub fn forward_only(&self) -> bool {
        self.forward && !self.backward && !self.left && !self.right
    }

    /// Camera-local axis values: x = right, y = forward
    pub fn local(&self) -> Vec2 {
        let axis = |positive: bool, negative: bool| positive as i8 as f32 - negative as i8 as f32;
        Vec2::new(
            axis(self.right, self.left),
            axis(self.forward, self.backward),
        )
    }
}

/// Per-tick movement intent
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionIntent {
    /// Horizontal unit direction, or zero when there is no horizontal target
    pub direction: Vec3,
    /// Movement keys the direction was built from
    pub axes: MoveAxes,
    /// Jump pressed this tick (edge-triggered)
    pub jump: bool,
    /// Crouch held (level-triggered)
    pub crouch: bool,
    /// Sprint pressed this tick (edge-triggered)
    pub sprint: bool,
}

impl MotionIntent {
    /// Build an intent from movement keys projected on the camera basis
    pub fn new(axes: MoveAxes, basis: CameraBasis, jump: bool, crouch: bool, sprint: bool) -> Self {
        let local = axes.local();
        let wish = basis.right * local.x + basis.forward * local.y;
        let direction = Vec3::new(wish.x, 0.0, wish.z).normalize_or_zero();

        Self {
            direction,
            axes,
            jump,
            crouch,
            sprint,
        }
    }

    /// Reduce an input frame to an intent
    pub fn from_input(input: &InputState, basis: CameraBasis) -> Self {
        Self::new(
            MoveAxes::from_input(input),
            basis,
            input.is_just_pressed(InputAction::Jump),
            input.is_held(InputAction::Crouch),
            input.is_just_pressed(InputAction::Sprint),
        )
    }

    /// Whether there is a horizontal target
    pub fn has_direction(&self) -> bool {
        self.direction != Vec3::ZERO
    }
}
