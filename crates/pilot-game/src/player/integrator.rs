//! Per-mode velocity rules
//!
//! Gravity is integrated every tick before the mode rule runs, and a jump
//! overwrites the vertical component afterwards. Horizontal and vertical
//! parts are split only for the duration of the update; the result is one
//! 3D velocity because the collision resolver works on the combined value.

use glam::Vec3;
use pilot_core::{horizontal, with_horizontal};

use crate::input::MotionIntent;

use super::{MovementConfig, MovementState};

/// Result of one integration step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Integration {
    pub velocity: Vec3,
    /// A jump impulse was applied this tick
    pub jumped: bool,
}

/// Advance `velocity` by one tick under `mode`
pub fn integrate(
    velocity: Vec3,
    mode: MovementState,
    intent: &MotionIntent,
    sprinting: bool,
    config: &MovementConfig,
    dt: f32,
) -> Integration {
    let mut velocity = apply_gravity(velocity, config.gravity, dt);

    velocity = match mode {
        MovementState::Grounded => {
            let planar = horizontal(velocity);
            let planar = if intent.has_direction() {
                let target = intent.direction * config.ground_speed(sprinting);
                seek(planar, target, intent.direction, config, dt)
            } else {
                apply_friction(planar, config.ground_friction, dt)
            };
            with_horizontal(velocity, planar)
        }
        MovementState::Crouched => {
            let target = intent.direction * config.max_crouch_speed;
            let planar = seek(horizontal(velocity), target, intent.direction, config, dt);
            with_horizontal(velocity, planar)
        }
        MovementState::Sliding => {
            let planar = apply_friction(horizontal(velocity), config.slide_friction, dt);
            with_horizontal(velocity, planar)
        }
        MovementState::Airborne => {
            let accel = if intent.axes.forward_only() {
                config.air_forward_acceleration
            } else {
                config.air_acceleration
            };
            air_accelerate(velocity, intent.direction, config.max_air_speed, accel, dt)
        }
    };

    let jumped = intent.jump && mode.is_grounded();
    if jumped {
        velocity.y = config.jump_speed;
    }

    Integration { velocity, jumped }
}

/// Subtract `gravity * dt` from the vertical component
pub fn apply_gravity(velocity: Vec3, gravity: f32, dt: f32) -> Vec3 {
    Vec3::new(velocity.x, velocity.y - gravity * dt, velocity.z)
}

/// Move horizontal velocity toward `target` by a clamped linear blend.
///
/// Uses `acceleration` while the wish direction agrees with the current
/// heading, `deceleration` otherwise (including when there is no direction).
pub fn seek(
    planar: Vec3,
    target: Vec3,
    direction: Vec3,
    config: &MovementConfig,
    dt: f32,
) -> Vec3 {
    let rate = if direction.dot(planar) > 0.0 {
        config.acceleration
    } else {
        config.deceleration
    };
    planar.lerp(target, (rate * dt).clamp(0.0, 1.0))
}

/// Quake air acceleration: only adds speed along `direction`, up to `max_speed`
pub fn air_accelerate(
    velocity: Vec3,
    direction: Vec3,
    max_speed: f32,
    acceleration: f32,
    dt: f32,
) -> Vec3 {
    let current_speed = velocity.dot(direction);
    let added_speed = (max_speed - current_speed).clamp(0.0, acceleration * dt);
    velocity + direction * added_speed
}

/// Scale horizontal speed down by `speed * coefficient * dt`, never below zero
pub fn apply_friction(planar: Vec3, coefficient: f32, dt: f32) -> Vec3 {
    let speed = planar.length();
    if speed <= 0.0 {
        return planar;
    }
    let new_speed = (speed - speed * coefficient * dt).max(0.0);
    planar * (new_speed / speed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraBasis;
    use crate::input::MoveAxes;
    use pilot_core::horizontal_speed;

    fn forward() -> MoveAxes {
        MoveAxes {
            forward: true,
            ..Default::default()
        }
    }

    fn intent(axes: MoveAxes) -> MotionIntent {
        MotionIntent::new(axes, CameraBasis::default(), false, false, false)
    }

    #[test]
    fn test_walk_converges_without_overshoot() {
        let config = MovementConfig {
            max_walk_speed: 5.0,
            acceleration: 15.0,
            ..Default::default()
        };
        let intent = intent(forward());
        let mut velocity = Vec3::ZERO;

        for _ in 0..50 {
            velocity = integrate(velocity, MovementState::Grounded, &intent, false, &config, 0.1)
                .velocity;
            assert!(horizontal_speed(velocity) <= 5.0 + 1e-4);
            velocity.y = 0.0;
        }
        assert!((horizontal_speed(velocity) - 5.0).abs() < 0.01);
    }

    #[test]
    fn test_walk_converges_gradually_at_small_dt() {
        let config = MovementConfig::default();
        let intent = intent(forward());
        let mut velocity = Vec3::ZERO;
        let mut previous = 0.0;

        for _ in 0..120 {
            velocity = integrate(
                velocity,
                MovementState::Grounded,
                &intent,
                false,
                &config,
                1.0 / 60.0,
            )
            .velocity;
            velocity.y = 0.0;
            let speed = horizontal_speed(velocity);
            assert!(speed >= previous - 1e-5);
            assert!(speed <= config.max_walk_speed + 1e-4);
            previous = speed;
        }
        assert!((previous - config.max_walk_speed).abs() < 0.01);
    }

    #[test]
    fn test_no_input_grounded_only_slows_down() {
        let config = MovementConfig::default();
        let idle = MotionIntent::default();
        let mut velocity = Vec3::new(6.0, 0.0, -3.0);
        let mut previous = horizontal_speed(velocity);

        for _ in 0..200 {
            velocity = integrate(
                velocity,
                MovementState::Grounded,
                &idle,
                false,
                &config,
                1.0 / 60.0,
            )
            .velocity;
            let speed = horizontal_speed(velocity);
            assert!(speed <= previous);
            previous = speed;
        }
        assert!(previous < 0.01);
    }

    #[test]
    fn test_friction_clamps_at_zero() {
        let result = apply_friction(Vec3::new(3.0, 0.0, 0.0), 8.0, 0.5);
        assert_eq!(result, Vec3::ZERO);
    }

    #[test]
    fn test_turning_away_uses_deceleration() {
        let config = MovementConfig {
            acceleration: 1.0,
            deceleration: 10.0,
            ..Default::default()
        };
        let planar = Vec3::new(0.0, 0.0, -5.0);

        let toward = seek(planar, Vec3::new(0.0, 0.0, -5.0), Vec3::NEG_Z, &config, 0.05);
        assert_eq!(toward, planar);

        let away = seek(planar, Vec3::new(0.0, 0.0, 5.0), Vec3::Z, &config, 0.05);
        assert!((away.z - 0.0).abs() < 1e-5);
    }

    #[test]
    fn test_jump_overwrites_vertical_velocity() {
        let config = MovementConfig::default();
        let jump = MotionIntent {
            jump: true,
            ..Default::default()
        };

        for vy in [-12.0, 0.0, 3.0] {
            for mode in [
                MovementState::Grounded,
                MovementState::Crouched,
                MovementState::Sliding,
            ] {
                let result = integrate(Vec3::new(1.0, vy, 0.0), mode, &jump, false, &config, 0.1);
                assert!(result.jumped);
                assert_eq!(result.velocity.y, config.jump_speed);
            }
        }
    }

    #[test]
    fn test_no_jump_while_airborne() {
        let config = MovementConfig::default();
        let jump = MotionIntent {
            jump: true,
            ..Default::default()
        };
        let result = integrate(Vec3::ZERO, MovementState::Airborne, &jump, false, &config, 0.1);
        assert!(!result.jumped);
        assert!(result.velocity.y < 0.0);
    }

    #[test]
    fn test_gravity_accumulates_while_airborne() {
        let config = MovementConfig {
            gravity: 20.0,
            ..Default::default()
        };
        let idle = MotionIntent::default();
        let mut velocity = Vec3::ZERO;

        for n in 1..=30 {
            velocity = integrate(
                velocity,
                MovementState::Airborne,
                &idle,
                false,
                &config,
                1.0 / 60.0,
            )
            .velocity;
            let expected = -20.0 * n as f32 / 60.0;
            assert!((velocity.y - expected).abs() < 1e-4);
        }
    }

    #[test]
    fn test_air_accelerate_never_exceeds_cap_along_wish() {
        let max_speed = 1.0;
        let directions = [
            Vec3::X,
            Vec3::NEG_Z,
            Vec3::new(1.0, 0.0, 1.0).normalize(),
            Vec3::new(-0.3, 0.0, 0.9).normalize(),
        ];
        let velocities = [
            Vec3::ZERO,
            Vec3::new(0.5, -2.0, 0.0),
            Vec3::new(8.0, 1.0, -8.0),
            Vec3::new(-4.0, 0.0, 0.2),
        ];

        for direction in directions {
            for velocity in velocities {
                for dt in [1.0 / 120.0, 1.0 / 60.0, 0.05, 0.1] {
                    let before = velocity.dot(direction);
                    let after = air_accelerate(velocity, direction, max_speed, 40.0, dt).dot(direction);
                    assert!(after <= max_speed.max(before) + 1e-5);
                    assert!(after >= before - 1e-5);
                }
            }
        }
    }

    #[test]
    fn test_air_strafe_gains_speed() {
        let config = MovementConfig::default();
        let strafe = intent(MoveAxes {
            right: true,
            ..Default::default()
        });
        let start = Vec3::new(0.0, 0.0, -8.0);
        let result = integrate(start, MovementState::Airborne, &strafe, false, &config, 0.1);
        assert!(horizontal_speed(result.velocity) > horizontal_speed(start));
    }

    #[test]
    fn test_forward_only_air_input_uses_reduced_acceleration() {
        let config = MovementConfig::default();
        let dt = 1.0 / 60.0;

        let forward_only = integrate(
            Vec3::ZERO,
            MovementState::Airborne,
            &intent(forward()),
            false,
            &config,
            dt,
        );
        let diagonal = integrate(
            Vec3::ZERO,
            MovementState::Airborne,
            &intent(MoveAxes {
                forward: true,
                right: true,
                ..Default::default()
            }),
            false,
            &config,
            dt,
        );

        let forward_gain = horizontal_speed(forward_only.velocity);
        assert!((forward_gain - config.air_forward_acceleration * dt).abs() < 1e-5);
        assert!(horizontal_speed(diagonal.velocity) > forward_gain);
    }

    #[test]
    fn test_sliding_ignores_input() {
        let config = MovementConfig::default();
        let start = Vec3::new(10.0, 0.0, 0.0);
        let steer = intent(MoveAxes {
            left: true,
            ..Default::default()
        });

        let steered = integrate(start, MovementState::Sliding, &steer, false, &config, 0.1);
        let idle = integrate(start, MovementState::Sliding, &MotionIntent::default(), false, &config, 0.1);

        assert_eq!(steered.velocity, idle.velocity);
        let expected = 10.0 * (1.0 - config.slide_friction * 0.1);
        assert!((steered.velocity.x - expected).abs() < 1e-4);
    }

    #[test]
    fn test_crouched_targets_crouch_speed() {
        let config = MovementConfig::default();
        let mut velocity = Vec3::new(0.0, 0.0, -6.0);
        let forward = intent(forward());

        for _ in 0..120 {
            velocity = integrate(
                velocity,
                MovementState::Crouched,
                &forward,
                true,
                &config,
                1.0 / 60.0,
            )
            .velocity;
            velocity.y = 0.0;
        }
        assert!((horizontal_speed(velocity) - config.max_crouch_speed).abs() < 0.01);
    }

    #[test]
    fn test_sprint_raises_target() {
        let config = MovementConfig::default();
        let forward = intent(forward());
        let walking = Vec3::new(0.0, 0.0, -config.max_walk_speed);

        let walk = integrate(walking, MovementState::Grounded, &forward, false, &config, 0.1);
        let sprint = integrate(walking, MovementState::Grounded, &forward, true, &config, 0.1);

        assert!((horizontal_speed(walk.velocity) - config.max_walk_speed).abs() < 1e-4);
        assert!(horizontal_speed(sprint.velocity) > config.max_walk_speed + 0.1);
    }
}
