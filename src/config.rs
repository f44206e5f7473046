//! Locomotion configuration component.
//!
//! All tunables live in one flat [`LocomotionConfig`] component with builder
//! methods. The controller never mutates it at runtime.

use bevy::log::warn;
use bevy::prelude::*;
use thiserror::Error;

/// Ratio between the run cap and the walk cap used on slopes.
///
/// The walk cap is derived as `run_speed / WALK_SPEED_RATIO`.
pub const WALK_SPEED_RATIO: f32 = 1.7;

/// Tunable parameters for a locomotion-controlled entity.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocomotionConfig {
    // === Movement ===
    /// Horizontal acceleration while grounded on flat terrain (units/second^2).
    pub acceleration: f32,

    /// Maximum horizontal speed on flat ground and in the air (units/second).
    pub run_speed: f32,

    /// Linear damping applied when input is released or reversed.
    pub ground_drag: f32,

    // === Sensors ===
    /// Offset from the entity position for the ground ray origin.
    pub ground_ray_offset: Vec2,

    /// Length of the downward ground-detection ray.
    pub ground_ray_length: f32,

    /// Length of the three slope rays cast from the collider bottom.
    pub slope_check_distance: f32,

    // === Slope ===
    /// Maximum walkable slope angle (radians from vertical normal).
    pub max_slope_angle: f32,

    // === Friction presets ===
    /// Friction coefficient while moving or airborne.
    pub no_friction: f32,

    /// Friction coefficient while idle on a walkable slope.
    pub full_friction: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            acceleration: 700.0,
            run_speed: 120.0,
            ground_drag: 7.0,
            ground_ray_offset: Vec2::ZERO,
            ground_ray_length: 14.0,
            slope_check_distance: 10.0,
            max_slope_angle: std::f32::consts::FRAC_PI_3,
            no_friction: 0.0,
            full_friction: 1.0,
        }
    }
}

impl LocomotionConfig {
    /// Walk cap used while projecting movement along a slope.
    ///
    /// Derived from the run cap so the two stay in proportion when tuned.
    #[inline]
    pub fn walk_speed(&self) -> f32 {
        self.run_speed / WALK_SPEED_RATIO
    }

    /// Create a config tuned for a responsive player character.
    pub fn player() -> Self {
        Self {
            acceleration: 900.0,
            run_speed: 150.0,
            ..default()
        }
    }

    /// Builder: set the run speed cap.
    pub fn with_run_speed(mut self, speed: f32) -> Self {
        self.run_speed = speed;
        self
    }

    /// Builder: set the horizontal acceleration.
    pub fn with_acceleration(mut self, acceleration: f32) -> Self {
        self.acceleration = acceleration;
        self
    }

    /// Builder: set the ground drag coefficient.
    pub fn with_ground_drag(mut self, drag: f32) -> Self {
        self.ground_drag = drag;
        self
    }

    /// Builder: set the ground ray origin offset and length.
    pub fn with_ground_ray(mut self, offset: Vec2, length: f32) -> Self {
        self.ground_ray_offset = offset;
        self.ground_ray_length = length;
        self
    }

    /// Builder: set the slope ray length.
    pub fn with_slope_check_distance(mut self, distance: f32) -> Self {
        self.slope_check_distance = distance;
        self
    }

    /// Builder: set the maximum walkable slope angle (radians).
    pub fn with_max_slope_angle(mut self, angle: f32) -> Self {
        self.max_slope_angle = angle;
        self
    }

    /// Check the config for values the controller cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.run_speed <= 0.0 || !self.run_speed.is_finite() {
            return Err(ConfigError::NonPositiveRunSpeed(self.run_speed));
        }
        if self.acceleration <= 0.0 || !self.acceleration.is_finite() {
            return Err(ConfigError::NonPositiveAcceleration(self.acceleration));
        }
        if self.ground_drag < 0.0 {
            return Err(ConfigError::NegativeGroundDrag(self.ground_drag));
        }
        if self.max_slope_angle <= 0.0 || self.max_slope_angle > std::f32::consts::FRAC_PI_2 {
            return Err(ConfigError::SlopeAngleOutOfRange(self.max_slope_angle));
        }
        if self.ground_ray_length <= 0.0 || self.slope_check_distance <= 0.0 {
            return Err(ConfigError::NonPositiveRayLength);
        }
        Ok(())
    }
}

/// Rejected [`LocomotionConfig`] values.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("run speed must be positive and finite, got {0}")]
    NonPositiveRunSpeed(f32),
    #[error("acceleration must be positive and finite, got {0}")]
    NonPositiveAcceleration(f32),
    #[error("ground drag must be non-negative, got {0}")]
    NegativeGroundDrag(f32),
    #[error("max slope angle must be in (0, pi/2], got {0}")]
    SlopeAngleOutOfRange(f32),
    #[error("ray lengths must be positive")]
    NonPositiveRayLength,
}

/// Log a warning for configs that fail validation when they are first added.
///
/// The controller still runs with a bad config; the warning points at the
/// entity so the tuning mistake is visible.
pub(crate) fn warn_invalid_configs(q: Query<(Entity, &LocomotionConfig), Added<LocomotionConfig>>) {
    for (entity, config) in &q {
        if let Err(err) = config.validate() {
            warn!("locomotion config on {entity:?} rejected: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walk_speed_derived_from_run_speed() {
        let config = LocomotionConfig::default().with_run_speed(170.0);
        assert!((config.walk_speed() - 100.0).abs() < 1e-4);
    }

    #[test]
    fn default_config_is_valid() {
        assert_eq!(LocomotionConfig::default().validate(), Ok(()));
    }

    #[test]
    fn player_preset_is_faster() {
        let player = LocomotionConfig::player();
        let default = LocomotionConfig::default();
        assert!(player.run_speed >= default.run_speed);
        assert!(player.acceleration >= default.acceleration);
    }

    #[test]
    fn rejects_non_positive_run_speed() {
        let config = LocomotionConfig::default().with_run_speed(0.0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositiveRunSpeed(0.0))
        );
    }

    #[test]
    fn rejects_negative_drag() {
        let config = LocomotionConfig::default().with_ground_drag(-1.0);
        assert_eq!(config.validate(), Err(ConfigError::NegativeGroundDrag(-1.0)));
    }

    #[test]
    fn rejects_vertical_slope_limit() {
        let config = LocomotionConfig::default().with_max_slope_angle(2.0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::SlopeAngleOutOfRange(2.0))
        );
    }
}
