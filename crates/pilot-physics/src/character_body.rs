//! Capsule character body using rapier3d's kinematic character controller
//!
//! Sweep, slide, auto-step and ground snapping are delegated to rapier.
//! This module turns rapier's corrected translation back into the velocity
//! and grounded flag the movement core reads on the next tick.

use glam::Vec3;
use nalgebra::Unit;
use rapier3d::control::{CharacterAutostep, CharacterLength, KinematicCharacterController};
use rapier3d::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::resolver::clip_velocity;
use crate::{
    to_vec3, to_vector, CollisionResolver, PhysicsError, PhysicsWorld, Resolution,
    ResolveRequest,
};

/// Normals whose dot with `up` falls below this are treated as ceilings
const CEILING_DOT: f32 = -0.1;

/// Blocking normals closer to horizontal than this are clipped as vertical walls
const VERTICAL_WALL_DOT: f32 = 0.05;

/// Character body configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterBodyConfig {
    /// Capsule radius (default: 0.4m)
    pub radius: f32,
    /// Standing capsule height, feet to head (default: 1.8m)
    pub height: f32,
    /// Step height for climbing stairs (default: 0.25m)
    pub step_height: f32,
    /// Minimum free width required on top of a step (default: 0.2m)
    pub step_min_width: f32,
    /// Skin width kept between the capsule and the world (default: 0.02m)
    pub skin_width: f32,
}

impl Default for CharacterBodyConfig {
    fn default() -> Self {
        Self {
            radius: 0.4,
            height: 1.8,
            step_height: 0.25,
            step_min_width: 0.2,
            skin_width: 0.02,
        }
    }
}

impl CharacterBodyConfig {
    /// Reject shapes rapier cannot sweep
    pub fn validate(&self) -> Result<(), PhysicsError> {
        for (field, value) in [("radius", self.radius), ("height", self.height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(PhysicsError::NonPositive { field, value });
            }
        }
        for (field, value) in [
            ("step_height", self.step_height),
            ("step_min_width", self.step_min_width),
            ("skin_width", self.skin_width),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(PhysicsError::Negative { field, value });
            }
        }
        Ok(())
    }

    fn autostep(&self) -> Option<CharacterAutostep> {
        if self.step_height > 0.0 {
            Some(CharacterAutostep {
                max_height: CharacterLength::Absolute(self.step_height),
                min_width: CharacterLength::Absolute(self.step_min_width),
                include_dynamic_bodies: false,
            })
        } else {
            None
        }
    }
}

/// Capsule that sweeps through a `PhysicsWorld`
pub struct CharacterBody {
    /// Configuration
    config: CharacterBodyConfig,
    /// Current capsule height (changes while crouched)
    height: f32,
    /// Swept shape
    capsule: Capsule,
    /// Collider registered in the world, if spawned
    collider_handle: Option<ColliderHandle>,
    /// Rapier's kinematic character controller
    controller: KinematicCharacterController,
}

impl CharacterBody {
    /// Create a body from a validated config
    pub fn new(config: CharacterBodyConfig) -> Result<Self, PhysicsError> {
        config.validate()?;

        let mut controller = KinematicCharacterController::default();
        controller.autostep = config.autostep();
        controller.offset = CharacterLength::Absolute(config.skin_width);

        Ok(Self {
            height: config.height,
            capsule: Self::capsule(config.radius, config.height),
            config,
            collider_handle: None,
            controller,
        })
    }

    fn half_segment(radius: f32, height: f32) -> f32 {
        ((height - 2.0 * radius) / 2.0).max(0.01)
    }

    fn capsule(radius: f32, height: f32) -> Capsule {
        Capsule::new_y(Self::half_segment(radius, height), radius)
    }

    pub fn config(&self) -> &CharacterBodyConfig {
        &self.config
    }

    /// Current capsule height
    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn collider_handle(&self) -> Option<ColliderHandle> {
        self.collider_handle
    }

    fn center(&self, feet: Vec3, up: Vec3) -> Vec3 {
        feet + up * (self.height * 0.5)
    }

    fn filter(&self) -> QueryFilter {
        match self.collider_handle {
            Some(handle) => QueryFilter::default().exclude_collider(handle),
            None => QueryFilter::default(),
        }
    }

    /// Register a collider for this body so other bodies collide with it
    pub fn spawn(&mut self, world: &mut PhysicsWorld, feet: Vec3) -> ColliderHandle {
        if let Some(handle) = self.collider_handle.take() {
            world.remove_collider(handle);
        }

        let center = self.center(feet, Vec3::Y);
        let collider = ColliderBuilder::capsule_y(
            Self::half_segment(self.config.radius, self.height),
            self.config.radius,
        )
        .translation(to_vector(center))
        .friction(0.0)
        .restitution(0.0)
        .build();

        let handle = world.add_static_collider(collider);
        self.collider_handle = Some(handle);
        handle
    }

    /// Remove the body's collider from the world
    pub fn despawn(&mut self, world: &mut PhysicsWorld) {
        if let Some(handle) = self.collider_handle.take() {
            world.remove_collider(handle);
        }
    }

    /// Borrow the body together with the world it moves through
    pub fn resolver<'a>(&'a mut self, world: &'a mut PhysicsWorld) -> WorldResolver<'a> {
        WorldResolver { body: self, world }
    }

    /// Resize the capsule; the feet stay where they are
    pub fn set_height(&mut self, world: &mut PhysicsWorld, height: f32) {
        let height = height.max(f32::EPSILON);
        if (height - self.height).abs() <= f32::EPSILON {
            return;
        }

        debug!(from = self.height, to = height, "resizing character capsule");
        let feet = self.collider_handle.and_then(|handle| {
            world
                .get_collider(handle)
                .map(|collider| to_vec3(*collider.translation()) - Vec3::Y * (self.height * 0.5))
        });

        self.height = height;
        self.capsule = Self::capsule(self.config.radius, height);

        if let (Some(handle), Some(feet)) = (self.collider_handle, feet) {
            let center = self.center(feet, Vec3::Y);
            let shape = SharedShape::capsule_y(
                Self::half_segment(self.config.radius, height),
                self.config.radius,
            );
            if let Some(collider) = world.get_collider_mut(handle) {
                collider.set_shape(shape);
                collider.set_translation(to_vector(center));
            }
        }
    }

    /// Sweep the capsule along `request.velocity * dt` and slide along contacts
    pub fn move_and_slide(
        &mut self,
        world: &mut PhysicsWorld,
        request: &ResolveRequest,
    ) -> Resolution {
        let up = request.up.try_normalize().unwrap_or(Vec3::Y);
        let walkable_cos = request.max_slope_angle.cos();
        let snapping = request.snap_distance.filter(|distance| *distance > 0.0);

        self.controller.up = Unit::new_normalize(to_vector(up));
        self.controller.max_slope_climb_angle = request.max_slope_angle;
        self.controller.min_slope_slide_angle = request.max_slope_angle;
        self.controller.snap_to_ground = snapping.map(CharacterLength::Absolute);
        // No stepping while rising from a jump.
        self.controller.autostep = if snapping.is_some() {
            self.config.autostep()
        } else {
            None
        };

        let center = self.center(request.position, up);
        let character_pos = Isometry::translation(center.x, center.y, center.z);
        let desired_translation = request.velocity * request.dt;

        let mut floor_normal: Option<Vec3> = None;
        let mut best_floor_dot = -1.0;
        let mut blocking_normals: Vec<Vec3> = Vec::new();
        let mut hit_wall = false;
        let mut hit_ceiling = false;

        let movement = self.controller.move_shape(
            request.dt,
            world.bodies(),
            world.colliders(),
            world.query_pipeline(),
            &self.capsule,
            &character_pos,
            to_vector(desired_translation),
            self.filter(),
            |collision| {
                let normal = to_vec3(collision.hit.normal1.into_inner());
                let up_dot = normal.dot(up);
                if up_dot >= walkable_cos {
                    if up_dot > best_floor_dot {
                        best_floor_dot = up_dot;
                        floor_normal = Some(normal);
                    }
                } else {
                    if up_dot < CEILING_DOT {
                        hit_ceiling = true;
                    } else {
                        hit_wall = true;
                    }
                    // Rapier's wall normals carry a little vertical noise.
                    let normal = if up_dot.abs() < VERTICAL_WALL_DOT {
                        (normal - up * up_dot).try_normalize().unwrap_or(normal)
                    } else {
                        normal
                    };
                    blocking_normals.push(normal);
                }
            },
        );

        let translation = to_vec3(movement.translation);
        let position = request.position + translation;

        let mut velocity = request.velocity;
        for normal in &blocking_normals {
            velocity = clip_velocity(velocity, *normal);
        }

        let rising_unsnapped = snapping.is_none() && velocity.dot(up) > 0.0;
        // Only a walkable surface counts as ground; steeper slopes keep falling.
        let floor_normal = if movement.grounded && !rising_unsnapped {
            let reach = snapping.unwrap_or(0.0) + self.config.skin_width * 2.0;
            floor_normal.or_else(|| self.probe_floor(world, position, up, reach, walkable_cos))
        } else {
            None
        };
        let grounded = floor_normal.is_some();

        if grounded {
            // Floor is static: nothing may keep pushing into it.
            let into_floor = velocity.dot(up);
            if into_floor < 0.0 {
                velocity -= up * into_floor;
            }
        }

        if let Some(handle) = self.collider_handle {
            let center = self.center(position, up);
            if let Some(collider) = world.get_collider_mut(handle) {
                collider.set_translation(to_vector(center));
            }
        }

        trace!(
            ?position,
            ?velocity,
            grounded,
            hit_wall,
            hit_ceiling,
            sliding_down_slope = movement.is_sliding_down_slope,
            "character move resolved"
        );

        Resolution {
            position,
            velocity,
            grounded,
            floor_normal,
            hit_wall,
            hit_ceiling,
        }
    }

    /// Cast a short ray down from the bottom sphere to find a walkable floor normal
    fn probe_floor(
        &self,
        world: &PhysicsWorld,
        feet: Vec3,
        up: Vec3,
        reach: f32,
        walkable_cos: f32,
    ) -> Option<Vec3> {
        let origin = feet + up * self.config.radius;
        let max_distance = self.config.radius + reach + 1.0e-3;
        let hit = world.raycast(origin, -up, max_distance, self.filter())?;
        if hit.normal.dot(up) >= walkable_cos {
            Some(hit.normal)
        } else {
            None
        }
    }
}

/// A character body borrowed together with its world
pub struct WorldResolver<'a> {
    body: &'a mut CharacterBody,
    world: &'a mut PhysicsWorld,
}

impl CollisionResolver for WorldResolver<'_> {
    fn resolve(&mut self, request: &ResolveRequest) -> Resolution {
        self.body.move_and_slide(self.world, request)
    }

    fn set_body_height(&mut self, height: f32) {
        self.body.set_height(self.world, height);
    }
}
