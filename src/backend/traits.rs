//! Physics backend abstraction.
//!
//! This module defines the trait that physics backends must implement to
//! work with the locomotion controller, allowing easy swapping between
//! physics engines.

use bevy::prelude::*;

/// Trait for physics backend implementations.
///
/// The backend covers exactly the operations the controller needs: velocity
/// read/write, drive-force application, linear damping, the friction
/// material coefficient, and a handful of queries (position, mass, fixed
/// timestep, collider bottom offset). Raycast sensors are backend-specific
/// systems registered by the backend's [`plugin`](Self::plugin).
pub trait LocomotionPhysicsBackend: 'static + Send + Sync {
    /// The velocity component type used by this backend.
    type VelocityComponent: Component;

    /// Returns the plugin that sets up this backend.
    fn plugin() -> impl Plugin;

    /// Get the current velocity of an entity.
    fn get_velocity(world: &World, entity: Entity) -> Vec2;

    /// Set the velocity of an entity (kinematic override).
    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec2);

    /// Apply a drive force to an entity over the physics timestep.
    fn apply_force(world: &mut World, entity: Entity, force: Vec2);

    /// Set the linear damping coefficient of an entity.
    fn set_linear_damping(world: &mut World, entity: Entity, damping: f32);

    /// Set the friction coefficient of an entity's physics material.
    fn set_friction(world: &mut World, entity: Entity, coefficient: f32);

    /// Get the current position of an entity.
    fn get_position(world: &World, entity: Entity) -> Vec2;

    /// Get the fixed timestep delta time.
    fn get_fixed_timestep(world: &World) -> f32;

    /// Get the mass of an entity.
    ///
    /// Used to scale forces so that config parameters produce consistent
    /// acceleration regardless of actual body mass. Returns 0.0 when the
    /// entity has no valid mass properties.
    fn get_mass(world: &World, entity: Entity) -> f32;

    /// Get the collider bottom offset for an entity.
    /// This is the distance from the collider center to its bottom.
    fn get_collider_bottom_offset(_world: &World, _entity: Entity) -> f32 {
        0.0
    }
}
