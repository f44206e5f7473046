//! Movement decision and application.
//!
//! Each fixed step one [`MoveCommand`] is decided per entity by a pure
//! function of the classified surface, the sampled input, and the current
//! velocity. Accelerated movement and kinematic velocity overrides are
//! distinct variants so the backend knows whether it is adding a force or
//! bypassing the integrator.

use bevy::prelude::*;

use crate::backend::LocomotionPhysicsBackend;
use crate::config::LocomotionConfig;
use crate::controller::LocomotionState;
use crate::surface::Surface;

/// Input magnitudes below this count as released for drag purposes.
pub const INPUT_DEADZONE: f32 = 0.4;

/// The single drive decision for one fixed step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveCommand {
    /// Grounded flat: add a horizontal force, then clamp to the cap.
    Accelerate { force: Vec2, speed_cap: f32 },
    /// Kinematic override: write the velocity directly, bypassing the
    /// integrator's force model.
    SetVelocity { velocity: Vec2, speed_cap: f32 },
    /// No drive this step (grounded on an unwalkable slope).
    Coast,
}

/// Decide the drive for one fixed step.
///
/// Exactly one branch fires per step:
/// - grounded off slopes: accelerate toward the run cap;
/// - grounded on a walkable slope: project the walk cap along the slope
///   tangent (negated input matches the counter-clockwise tangent
///   convention, so rightward input moves rightward along the surface);
/// - airborne: horizontal velocity snaps to `run_speed * direction` with the
///   vertical component preserved;
/// - grounded on an unwalkable slope: coast.
pub fn decide_move(
    grounded: bool,
    surface: &Surface,
    can_walk_on_slope: bool,
    direction: f32,
    velocity: Vec2,
    config: &LocomotionConfig,
) -> MoveCommand {
    if !grounded {
        return MoveCommand::SetVelocity {
            velocity: Vec2::new(config.run_speed * direction, velocity.y),
            speed_cap: config.run_speed,
        };
    }

    match surface.tangent() {
        None => MoveCommand::Accelerate {
            force: Vec2::new(direction * config.acceleration, 0.0),
            speed_cap: config.run_speed,
        },
        Some(tangent) if can_walk_on_slope => {
            let walk = config.walk_speed();
            MoveCommand::SetVelocity {
                velocity: tangent * (walk * -direction),
                speed_cap: walk,
            }
        }
        Some(_) => MoveCommand::Coast,
    }
}

/// Sign-preserving clamp of the horizontal velocity component.
pub fn clamp_horizontal_speed(velocity: Vec2, cap: f32) -> Vec2 {
    if velocity.x.abs() > cap {
        Vec2::new(velocity.x.signum() * cap, velocity.y)
    } else {
        velocity
    }
}

/// Decide the linear damping for one fixed step.
///
/// Ground drag engages when the input is released (below the deadzone) or
/// reverses against the current horizontal velocity; while actively moving
/// the drag drops to zero so the character can coast at speed.
pub fn decide_drag(direction: f32, velocity_x: f32, config: &LocomotionConfig) -> f32 {
    let changing_direction =
        (velocity_x > 0.0 && direction < 0.0) || (velocity_x < 0.0 && direction > 0.0);
    if direction.abs() < INPUT_DEADZONE || changing_direction {
        config.ground_drag
    } else {
        0.0
    }
}

/// Decide the friction coefficient for one fixed step.
///
/// Full friction pins the character to a walkable slope while idle; in every
/// other situation the zero-friction preset keeps the solver from fighting
/// the movement branches.
pub fn decide_friction(
    surface: &Surface,
    can_walk_on_slope: bool,
    direction: f32,
    config: &LocomotionConfig,
) -> f32 {
    if surface.is_slope() && direction == 0.0 && can_walk_on_slope {
        config.full_friction
    } else {
        config.no_friction
    }
}

/// Apply each entity's [`MoveCommand`] through the backend.
///
/// Forces are mass-scaled so the configured acceleration is the actual
/// acceleration regardless of body mass.
pub(crate) fn apply_movement<B: LocomotionPhysicsBackend>(world: &mut World) {
    let mut q = world.query::<(Entity, &LocomotionState, &LocomotionConfig)>();
    let planned: Vec<(Entity, MoveCommand)> = q
        .iter(world)
        .map(|(entity, state, config)| {
            let velocity = B::get_velocity(world, entity);
            let command = decide_move(
                state.grounded,
                &state.surface,
                state.can_walk_on_slope,
                state.direction,
                velocity,
                config,
            );
            (entity, command)
        })
        .collect();

    for (entity, command) in planned {
        match command {
            MoveCommand::Accelerate { force, speed_cap } => {
                let mass = B::get_mass(world, entity);
                B::apply_force(world, entity, force * mass);
                let velocity = B::get_velocity(world, entity);
                let clamped = clamp_horizontal_speed(velocity, speed_cap);
                if clamped != velocity {
                    B::set_velocity(world, entity, clamped);
                }
                if let Some(mut state) = world.get_mut::<LocomotionState>(entity) {
                    state.speed_cap = speed_cap;
                }
            }
            MoveCommand::SetVelocity { velocity, speed_cap } => {
                B::set_velocity(world, entity, velocity);
                if let Some(mut state) = world.get_mut::<LocomotionState>(entity) {
                    state.speed_cap = speed_cap;
                }
            }
            MoveCommand::Coast => {}
        }
    }
}

/// Select the linear damping for each entity through the backend.
pub(crate) fn apply_ground_drag<B: LocomotionPhysicsBackend>(world: &mut World) {
    let mut q = world.query::<(Entity, &LocomotionState, &LocomotionConfig)>();
    let planned: Vec<(Entity, f32)> = q
        .iter(world)
        .map(|(entity, state, config)| {
            let velocity_x = B::get_velocity(world, entity).x;
            (entity, decide_drag(state.direction, velocity_x, config))
        })
        .collect();

    for (entity, damping) in planned {
        B::set_linear_damping(world, entity, damping);
    }
}

/// Select the friction preset for each entity through the backend.
pub(crate) fn select_friction<B: LocomotionPhysicsBackend>(world: &mut World) {
    let mut q = world.query::<(Entity, &LocomotionState, &LocomotionConfig)>();
    let planned: Vec<(Entity, f32)> = q
        .iter(world)
        .map(|(entity, state, config)| {
            let coefficient = decide_friction(
                &state.surface,
                state.can_walk_on_slope,
                state.direction,
                config,
            );
            (entity, coefficient)
        })
        .collect();

    for (entity, coefficient) in planned {
        B::set_friction(world, entity, coefficient);
    }
}
