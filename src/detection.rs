//! Raycast result structures.
//!
//! These hold the results of the physics queries used for ground detection
//! and slope classification. A missing hit is represented by `Option::None`
//! at the call sites, not by a sentinel value.

use bevy::prelude::*;

/// Information about a single raycast hit.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct RayHit {
    /// Distance from the ray origin to the hit point.
    pub distance: f32,
    /// Surface normal at the hit point (unit length, points away from surface).
    pub normal: Vec2,
    /// World position of the hit point.
    pub point: Vec2,
    /// Entity that was hit, when the backend reports one.
    pub entity: Option<Entity>,
}

impl RayHit {
    /// Create a hit result.
    pub fn new(distance: f32, normal: Vec2, point: Vec2, entity: Option<Entity>) -> Self {
        Self {
            distance,
            normal,
            point,
            entity,
        }
    }
}
