//! Player controller driving one character per physics tick

use glam::Vec3;
use pilot_core::speed_kmh;
use pilot_physics::{CollisionResolver, ResolveRequest};
use tracing::{debug, trace};

use crate::camera::CameraBasis;
use crate::error::ConfigError;
use crate::input::{InputState, MotionIntent};

use super::integrator::integrate;
use super::{MovementConfig, MovementState, SprintLatch, StateHooks, StateMachine};

/// Collision height bookkeeping driven by the state hooks.
///
/// Hooks only record the height the body should have; the controller hands
/// it to the resolver once the tick's motion is resolved.
#[derive(Debug, Clone)]
pub struct CrouchShape {
    standing_height: f32,
    crouch_height: f32,
    current: f32,
    pending: Option<f32>,
}

impl CrouchShape {
    pub fn new(standing_height: f32, crouch_height: f32) -> Self {
        Self {
            standing_height,
            crouch_height,
            current: standing_height,
            pending: None,
        }
    }

    /// Height the body has after the last applied resize
    pub fn height(&self) -> f32 {
        self.current
    }

    fn request(&mut self, height: f32) {
        self.pending = if height == self.current {
            None
        } else {
            Some(height)
        };
    }

    /// Take the resize to apply, if the height changed this tick
    pub fn take_pending(&mut self) -> Option<f32> {
        let height = self.pending.take()?;
        self.current = height;
        Some(height)
    }
}

impl StateHooks for CrouchShape {
    fn on_exit(&mut self, state: MovementState) {
        if state.is_crouching() {
            self.request(self.standing_height);
        }
    }

    fn on_enter(&mut self, state: MovementState) {
        if state.is_crouching() {
            self.request(self.crouch_height);
        }
    }
}

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub state: MovementState,
    pub velocity: Vec3,
    pub grounded: bool,
    pub jumped: bool,
    /// Horizontal speed for the HUD readout
    pub speed_kmh: f32,
}

/// Player controller owning the movement state of one character
pub struct PlayerController {
    /// Movement configuration
    config: MovementConfig,
    /// Feet position
    position: Vec3,
    velocity: Vec3,
    machine: StateMachine,
    sprint: SprintLatch,
    shape: CrouchShape,
    /// Grounded flag from the last resolution
    grounded: bool,
    floor_normal: Option<Vec3>,
    /// Floor snapping is off from a jump until the body lands again
    snap_armed: bool,
}

impl PlayerController {
    /// Create a controller, rejecting invalid tuning up front
    pub fn new(config: MovementConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let shape = CrouchShape::new(config.standing_height, config.crouch_height);
        Ok(Self {
            config,
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            machine: StateMachine::new(MovementState::Airborne),
            sprint: SprintLatch::default(),
            shape,
            grounded: false,
            floor_normal: None,
            snap_armed: true,
        })
    }

    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    /// Get the player's feet position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn state(&self) -> MovementState {
        self.machine.current()
    }

    /// Check if the last resolution left the player on a floor
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn floor_normal(&self) -> Option<Vec3> {
        self.floor_normal
    }

    pub fn is_sprinting(&self) -> bool {
        self.sprint.is_active()
    }

    /// Current collision height
    pub fn body_height(&self) -> f32 {
        self.shape.height()
    }

    pub fn speed_kmh(&self) -> f32 {
        speed_kmh(self.velocity)
    }

    /// Build the intent from raw input and run one tick
    pub fn fixed_update(
        &mut self,
        resolver: &mut impl CollisionResolver,
        input: &InputState,
        basis: CameraBasis,
        dt: f32,
    ) -> TickReport {
        let intent = MotionIntent::from_input(input, basis);
        self.tick(resolver, &intent, dt)
    }

    /// Advance the character by one physics tick
    pub fn tick(
        &mut self,
        resolver: &mut impl CollisionResolver,
        intent: &MotionIntent,
        dt: f32,
    ) -> TickReport {
        debug_assert!(dt > 0.0, "physics tick must have a positive duration");

        let state = self.machine.transition(
            self.grounded,
            intent,
            self.velocity,
            &self.config,
            &mut self.shape,
        );
        let sprinting = self.sprint.update(intent, state);

        let step = integrate(self.velocity, state, intent, sprinting, &self.config, dt);
        if step.jumped {
            self.snap_armed = false;
        }

        let request = ResolveRequest {
            position: self.position,
            velocity: step.velocity,
            up: Vec3::Y,
            max_slope_angle: self.config.max_slope_angle(),
            snap_distance: self.snap_armed.then_some(self.config.snap_distance),
            dt,
        };
        let resolution = resolver.resolve(&request);

        self.position = resolution.position;
        self.velocity = resolution.velocity;
        self.grounded = resolution.grounded;
        self.floor_normal = resolution.floor_normal;
        if resolution.grounded && !step.jumped {
            self.snap_armed = true;
        }

        if let Some(height) = self.shape.take_pending() {
            debug!(height, ?state, "applying crouch resize");
            resolver.set_body_height(height);
        }

        trace!(
            ?state,
            position = ?self.position,
            velocity = ?self.velocity,
            grounded = self.grounded,
            sprinting,
            "player tick"
        );

        TickReport {
            state,
            velocity: self.velocity,
            grounded: self.grounded,
            jumped: step.jumped,
            speed_kmh: speed_kmh(self.velocity),
        }
    }

    /// Teleport the player to a position
    pub fn teleport(&mut self, position: Vec3) {
        self.position = position;
        self.velocity = Vec3::ZERO;
        self.grounded = false;
        self.floor_normal = None;
        self.snap_armed = true;
        self.sprint.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputAction, MoveAxes};
    use pilot_core::horizontal_speed;
    use pilot_physics::{CharacterBody, CharacterBodyConfig, PhysicsWorld, Resolution};

    /// Resolver with a flat floor at a fixed grounded flag
    struct FixedGround {
        grounded: bool,
        requests: Vec<ResolveRequest>,
        heights: Vec<f32>,
    }

    impl FixedGround {
        fn new(grounded: bool) -> Self {
            Self {
                grounded,
                requests: Vec::new(),
                heights: Vec::new(),
            }
        }

        fn last_snap(&self) -> Option<f32> {
            self.requests.last().and_then(|request| request.snap_distance)
        }
    }

    impl CollisionResolver for FixedGround {
        fn resolve(&mut self, request: &ResolveRequest) -> Resolution {
            self.requests.push(*request);
            let mut resolution = Resolution::unobstructed(request);
            if self.grounded {
                resolution.grounded = true;
                resolution.floor_normal = Some(Vec3::Y);
                resolution.velocity.y = resolution.velocity.y.max(0.0);
            }
            resolution
        }

        fn set_body_height(&mut self, height: f32) {
            self.heights.push(height);
        }
    }

    fn forward() -> MoveAxes {
        MoveAxes {
            forward: true,
            ..Default::default()
        }
    }

    fn intent(axes: MoveAxes) -> MotionIntent {
        MotionIntent::new(axes, CameraBasis::default(), false, false, false)
    }

    /// A controller that already knows it stands on the floor
    fn landed(resolver: &mut FixedGround) -> PlayerController {
        let mut player = PlayerController::new(MovementConfig::default()).unwrap();
        player.tick(resolver, &MotionIntent::default(), 1.0 / 60.0);
        player
    }

    #[test]
    fn test_invalid_config_fails_at_construction() {
        let config = MovementConfig {
            acceleration: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            PlayerController::new(config),
            Err(ConfigError::Negative {
                field: "acceleration",
                ..
            })
        ));
    }

    #[test]
    fn test_starts_airborne_and_lands_after_first_resolution() {
        let mut resolver = FixedGround::new(true);
        let mut player = PlayerController::new(MovementConfig::default()).unwrap();
        assert_eq!(player.state(), MovementState::Airborne);

        let first = player.tick(&mut resolver, &MotionIntent::default(), 1.0 / 60.0);
        assert_eq!(first.state, MovementState::Airborne);
        assert!(first.grounded);

        let second = player.tick(&mut resolver, &MotionIntent::default(), 1.0 / 60.0);
        assert_eq!(second.state, MovementState::Grounded);
    }

    #[test]
    fn test_free_fall_accumulates_gravity_until_grounded() {
        let config = MovementConfig {
            gravity: 20.0,
            ..Default::default()
        };
        let mut player = PlayerController::new(config).unwrap();
        let mut air = FixedGround::new(false);

        for n in 1..=30 {
            let report = player.tick(&mut air, &MotionIntent::default(), 1.0 / 60.0);
            assert_eq!(report.state, MovementState::Airborne);
            assert!((report.velocity.y - (-20.0 * n as f32 / 60.0)).abs() < 1e-4);
        }

        let mut floor = FixedGround::new(true);
        let report = player.tick(&mut floor, &MotionIntent::default(), 1.0 / 60.0);
        assert!(report.grounded);
        assert_eq!(report.velocity.y, 0.0);
        let report = player.tick(&mut floor, &MotionIntent::default(), 1.0 / 60.0);
        assert_eq!(report.state, MovementState::Grounded);
    }

    #[test]
    fn test_walk_reaches_walk_speed() {
        let mut resolver = FixedGround::new(true);
        let mut player = landed(&mut resolver);
        let forward = intent(forward());

        let mut report = None;
        for _ in 0..50 {
            let tick = player.tick(&mut resolver, &forward, 0.1);
            assert!(horizontal_speed(tick.velocity) <= 5.0 + 1e-4);
            report = Some(tick);
        }

        let report = report.unwrap();
        assert!((horizontal_speed(report.velocity) - 5.0).abs() < 0.01);
        assert!((report.speed_kmh - 18.0).abs() < 0.05);
        assert!(player.position().z < 0.0);
    }

    #[test]
    fn test_idle_on_ground_never_speeds_up() {
        let mut resolver = FixedGround::new(true);
        let mut player = landed(&mut resolver);
        player.velocity = Vec3::new(4.0, 0.0, 4.0);

        let mut previous = horizontal_speed(player.velocity());
        for _ in 0..120 {
            let report = player.tick(&mut resolver, &MotionIntent::default(), 1.0 / 60.0);
            let speed = horizontal_speed(report.velocity);
            assert!(speed <= previous);
            previous = speed;
        }
    }

    #[test]
    fn test_jump_sets_exact_speed_and_drops_snap() {
        let mut resolver = FixedGround::new(true);
        let mut player = landed(&mut resolver);
        player.velocity = Vec3::new(0.0, -3.0, 0.0);
        assert!(resolver.last_snap().is_some());

        let jump = MotionIntent {
            jump: true,
            ..Default::default()
        };
        let report = player.tick(&mut resolver, &jump, 1.0 / 60.0);
        assert!(report.jumped);
        assert_eq!(report.velocity.y, player.config().jump_speed);
        assert_eq!(resolver.last_snap(), None);

        let mut air = FixedGround::new(false);
        player.tick(&mut air, &MotionIntent::default(), 1.0 / 60.0);
        assert_eq!(air.last_snap(), None);

        player.tick(&mut resolver, &MotionIntent::default(), 1.0 / 60.0);
        player.tick(&mut resolver, &MotionIntent::default(), 1.0 / 60.0);
        assert_eq!(resolver.last_snap(), Some(player.config().snap_distance));
    }

    #[test]
    fn test_held_jump_does_not_rejump() {
        let mut resolver = FixedGround::new(true);
        let mut player = landed(&mut resolver);
        let mut input = InputState::new();

        input.press(InputAction::Jump);
        let first = player.fixed_update(&mut resolver, &input, CameraBasis::default(), 1.0 / 60.0);
        input.end_frame();
        input.press(InputAction::Jump);
        let second = player.fixed_update(&mut resolver, &input, CameraBasis::default(), 1.0 / 60.0);

        assert!(first.jumped);
        assert!(!second.jumped);
    }

    #[test]
    fn test_sprint_press_switches_target_and_clears_when_idle() {
        let mut resolver = FixedGround::new(true);
        let mut player = landed(&mut resolver);
        let walk = intent(forward());

        for _ in 0..10 {
            player.tick(&mut resolver, &walk, 0.1);
        }
        assert!((horizontal_speed(player.velocity()) - 5.0).abs() < 0.01);

        let sprint = MotionIntent::new(forward(), CameraBasis::default(), false, false, true);
        let report = player.tick(&mut resolver, &sprint, 0.1);
        assert!(player.is_sprinting());
        assert!((horizontal_speed(report.velocity) - 8.5).abs() < 0.01);

        player.tick(&mut resolver, &walk, 0.1);
        assert!(player.is_sprinting());

        player.tick(&mut resolver, &MotionIntent::default(), 0.1);
        assert!(!player.is_sprinting());
    }

    #[test]
    fn test_crouch_resizes_once_and_stands_back_up() {
        let mut resolver = FixedGround::new(true);
        let mut player = landed(&mut resolver);
        let crouch = MotionIntent {
            crouch: true,
            ..Default::default()
        };

        for _ in 0..5 {
            let report = player.tick(&mut resolver, &crouch, 1.0 / 60.0);
            assert_eq!(report.state, MovementState::Crouched);
        }
        assert_eq!(resolver.heights, vec![1.0]);
        assert_eq!(player.body_height(), 1.0);

        player.tick(&mut resolver, &MotionIntent::default(), 1.0 / 60.0);
        assert_eq!(resolver.heights, vec![1.0, 1.8]);
        assert_eq!(player.body_height(), 1.8);
    }

    #[test]
    fn test_fast_crouch_slides_then_settles_into_crouch() {
        let mut resolver = FixedGround::new(true);
        let mut player = landed(&mut resolver);
        player.velocity = Vec3::new(12.0, 0.0, 0.0);
        let crouch = MotionIntent {
            crouch: true,
            axes: forward(),
            direction: Vec3::NEG_Z,
            ..Default::default()
        };

        let report = player.tick(&mut resolver, &crouch, 1.0 / 60.0);
        assert_eq!(report.state, MovementState::Sliding);
        assert!(report.velocity.x < 12.0);
        assert!(report.velocity.z.abs() < 1e-6);

        let mut states = vec![report.state];
        for _ in 0..600 {
            states.push(player.tick(&mut resolver, &crouch, 1.0 / 60.0).state);
        }
        assert_eq!(states.last(), Some(&MovementState::Crouched));
        // Sliding and crouching share the short shape.
        assert_eq!(resolver.heights, vec![1.0]);
    }

    #[test]
    fn test_teleport_resets_motion() {
        let mut resolver = FixedGround::new(true);
        let mut player = landed(&mut resolver);
        player.tick(&mut resolver, &intent(forward()), 0.1);

        player.teleport(Vec3::new(3.0, 10.0, 0.0));
        assert_eq!(player.position(), Vec3::new(3.0, 10.0, 0.0));
        assert_eq!(player.velocity(), Vec3::ZERO);
        assert!(!player.is_grounded());

        let report = player.tick(&mut FixedGround::new(false), &MotionIntent::default(), 0.1);
        assert_eq!(report.state, MovementState::Airborne);
    }

    #[test]
    fn test_walks_and_jumps_on_rapier_floor() {
        let mut world = PhysicsWorld::new();
        world.create_static_box(Vec3::new(50.0, 0.1, 50.0), Vec3::new(0.0, -0.1, 0.0));
        world.refresh_queries();

        let mut body = CharacterBody::new(CharacterBodyConfig::default()).unwrap();
        let mut player = PlayerController::new(MovementConfig::default()).unwrap();
        player.teleport(Vec3::new(0.0, 0.5, 0.0));
        body.spawn(&mut world, player.position());
        world.refresh_queries();

        let dt = 1.0 / 60.0;
        for _ in 0..60 {
            player.tick(&mut body.resolver(&mut world), &MotionIntent::default(), dt);
            world.refresh_queries();
        }
        assert_eq!(player.state(), MovementState::Grounded);
        assert!(player.position().y.abs() < 0.1);

        let forward = intent(forward());
        for _ in 0..60 {
            player.tick(&mut body.resolver(&mut world), &forward, dt);
            world.refresh_queries();
        }
        assert!(player.position().z < -3.0);
        assert!(player.is_grounded());

        let jump = MotionIntent {
            jump: true,
            ..forward
        };
        let report = player.tick(&mut body.resolver(&mut world), &jump, dt);
        world.refresh_queries();
        assert!(report.jumped);
        assert!(!report.grounded);

        let mut peak: f32 = 0.0;
        let mut landed_again = false;
        for _ in 0..120 {
            let report = player.tick(&mut body.resolver(&mut world), &forward, dt);
            world.refresh_queries();
            peak = peak.max(player.position().y);
            if report.grounded {
                landed_again = true;
                break;
            }
        }
        assert!(peak > 0.5);
        assert!(landed_again);
    }
}
