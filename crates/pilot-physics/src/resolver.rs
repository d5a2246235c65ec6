//! Collision resolution contract
//!
//! The movement core decides which velocity it wants; a resolver decides how
//! much of it survives contact with the world. The resolver is authoritative:
//! its position, velocity and grounded flag replace the requested ones.

use glam::Vec3;

/// A single sweep-and-slide request for one physics tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolveRequest {
    /// Feet position at the start of the tick
    pub position: Vec3,
    /// Velocity the movement core wants to travel with
    pub velocity: Vec3,
    /// World up direction
    pub up: Vec3,
    /// Steepest walkable floor, in radians from `up`
    pub max_slope_angle: f32,
    /// Downward snap reach; `None` right after a jump
    pub snap_distance: Option<f32>,
    /// Tick duration in seconds
    pub dt: f32,
}

/// Outcome of a sweep-and-slide
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    /// Feet position at the end of the tick
    pub position: Vec3,
    /// Velocity with blocked components removed
    pub velocity: Vec3,
    /// Whether the body ended the tick on a walkable floor
    pub grounded: bool,
    /// Outward floor normal when grounded
    pub floor_normal: Option<Vec3>,
    /// Whether a non-walkable surface blocked the motion
    pub hit_wall: bool,
    /// Whether a downward-facing surface blocked the motion
    pub hit_ceiling: bool,
}

impl Resolution {
    /// A resolution that lets the requested motion through untouched
    pub fn unobstructed(request: &ResolveRequest) -> Self {
        Self {
            position: request.position + request.velocity * request.dt,
            velocity: request.velocity,
            grounded: false,
            floor_normal: None,
            hit_wall: false,
            hit_ceiling: false,
        }
    }
}

/// Capability to slide a proposed motion along the world's floors and walls
pub trait CollisionResolver {
    /// Move the body for one tick and report what actually happened
    fn resolve(&mut self, request: &ResolveRequest) -> Resolution;

    /// Change the collision shape height, keeping the feet in place
    fn set_body_height(&mut self, height: f32);
}

/// Remove the part of `velocity` that points into a surface with `normal`
pub fn clip_velocity(velocity: Vec3, normal: Vec3) -> Vec3 {
    let into = velocity.dot(normal);
    if into < 0.0 {
        velocity - normal * into
    } else {
        velocity
    }
}
