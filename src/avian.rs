//! Avian2D physics backend implementation.
//!
//! This module provides the physics backend for Avian2D (`avian2d`).
//! Enable with the `avian2d` feature.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::backend::LocomotionPhysicsBackend;
use crate::config::LocomotionConfig;
use crate::controller::LocomotionState;
use crate::detection::RayHit;
use crate::LocomotionSet;

/// Avian2D physics backend for the locomotion controller.
///
/// Uses `avian2d` for velocity manipulation, drive forces, linear damping,
/// and friction. Raycast sensing is handled by a dedicated system that takes
/// `SpatialQuery` as a system parameter.
pub struct Avian2dBackend;

impl LocomotionPhysicsBackend for Avian2dBackend {
    type VelocityComponent = LinearVelocity;

    fn plugin() -> impl Plugin {
        Avian2dBackendPlugin
    }

    fn get_velocity(world: &World, entity: Entity) -> Vec2 {
        world
            .get::<LinearVelocity>(entity)
            .map(|v| v.0)
            .unwrap_or(Vec2::ZERO)
    }

    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec2) {
        if let Some(mut vel) = world.get_mut::<LinearVelocity>(entity) {
            vel.0 = velocity;
        }
    }

    fn apply_force(world: &mut World, entity: Entity, force: Vec2) {
        // Accumulate into LocomotionState instead of directly modifying forces.
        // Forces are handed to Avian at the end of the step by
        // apply_drive_forces.
        if let Some(mut state) = world.get_mut::<LocomotionState>(entity) {
            state.add_force(force);
        }
    }

    fn set_linear_damping(world: &mut World, entity: Entity, damping: f32) {
        if let Some(mut linear_damping) = world.get_mut::<LinearDamping>(entity) {
            linear_damping.0 = damping;
        }
    }

    fn set_friction(world: &mut World, entity: Entity, coefficient: f32) {
        if let Some(mut friction) = world.get_mut::<Friction>(entity) {
            friction.dynamic_coefficient = coefficient;
            friction.static_coefficient = coefficient;
        }
    }

    fn get_position(world: &World, entity: Entity) -> Vec2 {
        // Try Avian's Position component first, then fall back to Transform
        world
            .get::<Position>(entity)
            .map(|p| p.0)
            .or_else(|| world.get::<Transform>(entity).map(|t| t.translation.xy()))
            .or_else(|| {
                world
                    .get::<GlobalTransform>(entity)
                    .map(|t| t.translation().xy())
            })
            .unwrap_or(Vec2::ZERO)
    }

    fn get_fixed_timestep(world: &World) -> f32 {
        world
            .get_resource::<Time<Fixed>>()
            .map(|t| t.delta_secs())
            .filter(|&d| d > 0.0)
            .unwrap_or(1.0 / 60.0)
    }

    fn get_mass(world: &World, entity: Entity) -> f32 {
        let Some(computed_mass) = world.get::<ComputedMass>(entity) else {
            return 0.0;
        };
        let mass = computed_mass.value();
        if mass <= 0.0 || !mass.is_finite() {
            return 0.0;
        }
        mass
    }

    fn get_collider_bottom_offset(world: &World, entity: Entity) -> f32 {
        world
            .get::<Collider>(entity)
            .map(collider_bottom_offset)
            .unwrap_or(0.0)
    }
}

/// Plugin that sets up Avian2D-specific systems for the locomotion controller.
pub struct Avian2dBackendPlugin;

impl Plugin for Avian2dBackendPlugin {
    fn build(&self, app: &mut App) {
        // Phase 1: Preparation - clear drive forces from the previous step
        app.add_systems(
            FixedUpdate,
            clear_drive_forces.in_set(LocomotionSet::Preparation),
        );

        // Phase 2: Sensors - ground ray plus the three slope rays
        app.add_systems(
            FixedUpdate,
            avian_surface_sensors.in_set(LocomotionSet::Sensors),
        );

        // Final phase: hand accumulated drive forces to Avian
        app.add_systems(
            FixedUpdate,
            apply_drive_forces.in_set(LocomotionSet::FinalApplication),
        );
    }
}

/// Get the distance from collider center to bottom for a given collider.
/// For capsules, this is half_height + radius.
pub fn collider_bottom_offset(collider: &Collider) -> f32 {
    if let Some(capsule) = collider.shape_scaled().as_capsule() {
        let segment = capsule.segment;
        let half_height = (segment.a.y - segment.b.y).abs() / 2.0;
        half_height + capsule.radius
    } else if let Some(ball) = collider.shape_scaled().as_ball() {
        ball.radius
    } else if let Some(cuboid) = collider.shape_scaled().as_cuboid() {
        cuboid.half_extents.y
    } else {
        // Unknown shape: measure rays from the entity position.
        0.0
    }
}

/// Perform a raycast using SpatialQuery, filtered to the ground layers.
fn avian_raycast(
    spatial_query: &SpatialQuery,
    origin: Vec2,
    direction: Dir2,
    max_distance: f32,
    filter: &SpatialQueryFilter,
) -> Option<RayHit> {
    spatial_query
        .cast_ray(origin, direction, max_distance, true, filter)
        .map(|hit| {
            let point = origin + *direction * hit.distance;
            RayHit::new(hit.distance, hit.normal, point, Some(hit.entity))
        })
}

/// Ground and slope detection for every controller.
///
/// One downward ray from the configured offset sets the grounded flag; three
/// rays from the collider bottom point (forward, backward, downward) feed the
/// surface classification. All rays respect the entity's `CollisionLayers`
/// filters, which is how the ground layer is expressed.
fn avian_surface_sensors(
    spatial_query: SpatialQuery,
    mut q_controllers: Query<(
        Entity,
        &GlobalTransform,
        &LocomotionConfig,
        &mut LocomotionState,
        Option<&CollisionLayers>,
        Option<&Collider>,
    )>,
) {
    for (entity, transform, config, mut state, collision_layers, collider) in &mut q_controllers {
        let position = transform.translation().xy();

        // Update collider_bottom_offset from actual collider dimensions
        state.collider_bottom_offset = collider.map(collider_bottom_offset).unwrap_or(0.0);

        // Use the character's filters as the mask - the rays hit whatever the
        // character is allowed to collide with.
        let filter = match collision_layers {
            Some(layers) => SpatialQueryFilter::from_mask(layers.filters)
                .with_excluded_entities([entity]),
            None => SpatialQueryFilter::default().with_excluded_entities([entity]),
        };

        state.reset_detection();

        // Ground check: downward ray from position + offset.
        let ground_origin = position + config.ground_ray_offset;
        state.grounded = avian_raycast(
            &spatial_query,
            ground_origin,
            Dir2::NEG_Y,
            config.ground_ray_length,
            &filter,
        )
        .is_some();

        // Slope rays from the bottom of the collider.
        let bottom = position - Vec2::new(0.0, state.collider_bottom_offset);
        let distance = config.slope_check_distance;

        state.front_hit = avian_raycast(&spatial_query, bottom, Dir2::X, distance, &filter);
        state.back_hit = avian_raycast(&spatial_query, bottom, Dir2::NEG_X, distance, &filter);
        state.down_hit = avian_raycast(&spatial_query, bottom, Dir2::NEG_Y, distance, &filter);
    }
}

/// Clear drive forces at the start of each step.
///
/// Subtracts the force applied last step from `ConstantForce` and clears the
/// accumulators, so external user forces are preserved while the controller's
/// forces stay isolated between steps.
pub fn clear_drive_forces(mut q: Query<(&mut LocomotionState, Option<&mut ConstantForce>)>) {
    for (mut state, constant_force) in &mut q {
        let force_to_subtract = state.prepare_new_frame();
        if let Some(mut force) = constant_force {
            force.0 -= force_to_subtract;
        }
    }
}

/// Apply accumulated drive forces at the end of each step.
///
/// Adds the step's accumulated force to `ConstantForce` so Avian integrates
/// it, and records it for next step's subtraction.
pub fn apply_drive_forces(mut q: Query<(&mut LocomotionState, Option<&mut ConstantForce>)>) {
    for (mut state, constant_force) in &mut q {
        let force_to_apply = state.finalize_frame();
        if let Some(mut force) = constant_force {
            force.0 += force_to_apply;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(bevy::transform::TransformPlugin);
        // Insert SceneSpawner resource required by Avian's ColliderHierarchyPlugin
        app.insert_resource(bevy::scene::SceneSpawner::default());
        app.add_plugins(PhysicsPlugins::default());
        app.insert_resource(Time::<Fixed>::from_hz(60.0));
        app.finish();
        app.cleanup();
        app
    }

    #[test]
    fn avian_backend_get_position() {
        let mut app = create_test_app();

        let entity = app
            .world_mut()
            .spawn((Transform::from_xyz(100.0, 200.0, 0.0), RigidBody::Dynamic))
            .id();

        app.update();

        let pos = Avian2dBackend::get_position(app.world(), entity);
        assert!((pos.x - 100.0).abs() < 0.01);
        assert!((pos.y - 200.0).abs() < 0.01);
    }

    #[test]
    fn avian_backend_velocity() {
        let mut app = create_test_app();

        let entity = app
            .world_mut()
            .spawn((
                Transform::default(),
                RigidBody::Dynamic,
                LinearVelocity(Vec2::new(50.0, 30.0)),
            ))
            .id();

        app.update();

        let vel = Avian2dBackend::get_velocity(app.world(), entity);
        assert!((vel.x - 50.0).abs() < 0.01);
        assert!((vel.y - 30.0).abs() < 0.01);

        Avian2dBackend::set_velocity(app.world_mut(), entity, Vec2::new(100.0, 0.0));

        let vel = Avian2dBackend::get_velocity(app.world(), entity);
        assert!((vel.x - 100.0).abs() < 0.01);
        assert!(vel.y.abs() < 0.01);
    }

    #[test]
    fn avian_backend_damping_and_friction() {
        let mut app = create_test_app();

        let entity = app
            .world_mut()
            .spawn((
                Transform::default(),
                RigidBody::Dynamic,
                LinearDamping(0.0),
                Friction::new(0.5),
            ))
            .id();

        app.update();

        Avian2dBackend::set_linear_damping(app.world_mut(), entity, 7.0);
        assert_eq!(app.world().get::<LinearDamping>(entity).unwrap().0, 7.0);

        Avian2dBackend::set_friction(app.world_mut(), entity, 1.0);
        let friction = app.world().get::<Friction>(entity).unwrap();
        assert_eq!(friction.dynamic_coefficient, 1.0);
        assert_eq!(friction.static_coefficient, 1.0);
    }

    #[test]
    fn capsule_bottom_offset() {
        let collider = Collider::capsule(4.0, 8.0);
        // half_height + radius
        assert!((collider_bottom_offset(&collider) - 8.0).abs() < 0.01);
    }
}
