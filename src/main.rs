//! Pilot - First-person movement controller demo
//!
//! Runs a scripted session against a small rapier test level and logs the
//! movement state and speed readout as the player walks, sprints, slides,
//! crouches and jumps.

mod settings;

use anyhow::{Context, Result};
use glam::{Vec2, Vec3};
use rapier3d::prelude::{vector, ColliderBuilder, RigidBodyBuilder};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use pilot_core::GameTime;
use pilot_game::{
    InputAction, InputState, LookController, MovementState, PlayerController, TickReport,
};
use pilot_physics::{CharacterBody, PhysicsConfig, PhysicsWorld};

use settings::GameSettings;

/// Simulated render frame length
const FRAME_DELTA: f32 = 1.0 / 144.0;

/// One stretch of scripted input
struct Phase {
    name: &'static str,
    seconds: f32,
    press: &'static [InputAction],
    release: &'static [InputAction],
    /// Mouse motion spread over the phase, in pixels
    look: Vec2,
}

const SCRIPT: &[Phase] = &[
    Phase {
        name: "settle",
        seconds: 1.0,
        press: &[],
        release: &[],
        look: Vec2::ZERO,
    },
    Phase {
        name: "walk",
        seconds: 1.5,
        press: &[InputAction::MoveForward],
        release: &[],
        look: Vec2::ZERO,
    },
    Phase {
        name: "sprint",
        seconds: 1.5,
        press: &[InputAction::Sprint],
        release: &[],
        look: Vec2::ZERO,
    },
    Phase {
        name: "jump",
        seconds: 1.0,
        press: &[InputAction::Jump],
        release: &[InputAction::Sprint],
        look: Vec2::ZERO,
    },
    Phase {
        name: "air strafe",
        seconds: 0.6,
        press: &[InputAction::Jump, InputAction::MoveRight],
        release: &[InputAction::MoveForward, InputAction::Jump],
        look: Vec2::new(300.0, 0.0),
    },
    Phase {
        name: "crouch slide",
        seconds: 1.0,
        press: &[InputAction::Crouch],
        release: &[InputAction::MoveRight],
        look: Vec2::ZERO,
    },
    Phase {
        name: "crouch walk",
        seconds: 1.0,
        press: &[InputAction::MoveForward],
        release: &[],
        look: Vec2::new(-150.0, 40.0),
    },
    Phase {
        name: "stand and stop",
        seconds: 1.5,
        press: &[],
        release: &[InputAction::Crouch, InputAction::MoveForward],
        look: Vec2::ZERO,
    },
];

/// Build a level with a floor, a step, a ramp, a wall and a loose crate
fn build_level() -> PhysicsWorld {
    let mut world = PhysicsWorld::with_config(PhysicsConfig {
        gravity: Vec3::new(0.0, -20.0, 0.0),
        ..Default::default()
    });

    world.create_ground(0.0);
    world.create_static_box(Vec3::new(2.0, 0.1, 2.0), Vec3::new(0.0, 0.1, -12.0));
    world.create_ramp(Vec3::new(2.0, 0.1, 4.0), Vec3::new(6.0, 1.0, -8.0), 15.0);
    world.create_static_box(Vec3::new(10.0, 2.0, 0.2), Vec3::new(0.0, 2.0, -30.0));

    let crate_body = RigidBodyBuilder::dynamic()
        .translation(vector![-3.0, 2.0, -6.0])
        .build();
    let crate_collider = ColliderBuilder::cuboid(0.5, 0.5, 0.5).build();
    world.add_dynamic_body(crate_body, crate_collider);

    world.refresh_queries();
    world
}

fn log_report(phase: &str, player: &PlayerController, report: &TickReport) {
    let position = player.position();
    info!(
        "[{}] {:?} speed {:.1} km/h, position ({:.2}, {:.2}, {:.2}), height {:.2}{}",
        phase,
        report.state,
        report.speed_kmh,
        position.x,
        position.y,
        position.z,
        player.body_height(),
        if player.is_sprinting() { ", sprinting" } else { "" },
    );
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("Starting Pilot movement demo...");

    let settings = GameSettings::load();
    if GameSettings::settings_path().is_some_and(|path| !path.exists()) {
        if let Err(e) = settings.save() {
            warn!("Could not write default settings: {:#}", e);
        }
    }

    let mut world = build_level();
    let mut body =
        CharacterBody::new(settings.body.clone()).context("Invalid character body settings")?;
    let mut player = PlayerController::new(settings.movement.clone())
        .context("Invalid movement settings")?;
    let mut look = LookController::with_config(settings.look.clone());
    let mut time = GameTime::new(settings.time.clone()).context("Invalid time settings")?;

    let spawn = Vec3::new(0.0, 1.0, 0.0);
    player.teleport(spawn);
    body.spawn(&mut world, spawn);
    world.refresh_queries();

    let mut input = InputState::new();
    let mut top_speed: f32 = 0.0;
    let mut jumps = 0;

    for phase in SCRIPT {
        for &action in phase.release {
            input.release(action);
        }
        for &action in phase.press {
            input.press(action);
        }

        let frames = (phase.seconds / FRAME_DELTA).round().max(1.0) as u32;
        let look_per_frame = phase.look / frames as f32;
        let mut last_report = None;
        let mut last_state = player.state();

        for _ in 0..frames {
            input.add_look_delta(look_per_frame);
            look.handle_mouse_look(input.take_look_delta());
            time.update(FRAME_DELTA);

            let steps = time.fixed_steps();
            let dt = time.fixed_timestep();
            for _ in 0..steps {
                let report =
                    player.fixed_update(&mut body.resolver(&mut world), &input, look.basis(), dt);
                world.step();

                if report.jumped {
                    jumps += 1;
                }
                if report.state != last_state {
                    log_report(phase.name, &player, &report);
                    last_state = report.state;
                }
                top_speed = top_speed.max(report.speed_kmh);
                last_report = Some(report);
            }

            // Presses stay visible until a tick has consumed them.
            if steps > 0 {
                input.end_frame();
            }
        }

        if let Some(report) = last_report {
            log_report(phase.name, &player, &report);
        }
    }

    if player.state() == MovementState::Airborne {
        warn!("Demo ended with the player still in the air");
    }

    info!(
        "Demo finished after {} ticks: {} jumps, top speed {:.1} km/h",
        time.tick_count, jumps, top_speed
    );

    Ok(())
}
