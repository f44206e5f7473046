//! Core locomotion state component.
//!
//! [`LocomotionState`] is the central hub for per-entity controller state:
//! sensor results, the classified surface, the sampled input direction, and
//! the drive-force accumulators the backend drains at the end of each step.

use bevy::prelude::*;

use crate::animation::AnimationParams;
use crate::detection::RayHit;
use crate::intent::MovementIntent;
use crate::surface::Surface;

/// Per-entity locomotion state, mutated every tick by the controller systems.
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
#[require(MovementIntent, AnimationParams)]
pub struct LocomotionState {
    /// Horizontal input direction sampled on the last render frame ([-1, 1]).
    pub direction: f32,

    /// Whether the ground ray hit this step.
    pub grounded: bool,

    /// Classified terrain under the character this step.
    pub surface: Surface,

    /// Whether the classified surface is within the walkable slope limit.
    pub can_walk_on_slope: bool,

    /// Speed cap selected by the last movement decision (walk or run cap).
    pub speed_cap: f32,

    /// Distance from the entity position to the collider bottom.
    /// Updated from the actual collider by the backend's sensor system.
    pub collider_bottom_offset: f32,

    // === Raw sensor results (filled by the backend, read by classification) ===
    /// Downward slope ray hit.
    pub down_hit: Option<RayHit>,
    /// Forward (+X) slope ray hit.
    pub front_hit: Option<RayHit>,
    /// Backward (-X) slope ray hit.
    pub back_hit: Option<RayHit>,

    // === Drive-force accumulation (backend force isolation) ===
    /// Force accumulated during the current step.
    pending_force: Vec2,
    /// Force handed to the physics engine last step, to be subtracted.
    applied_force: Vec2,
}

impl Default for LocomotionState {
    fn default() -> Self {
        Self {
            direction: 0.0,
            grounded: false,
            surface: Surface::None,
            can_walk_on_slope: true,
            speed_cap: 0.0,
            collider_bottom_offset: 0.0,
            down_hit: None,
            front_hit: None,
            back_hit: None,
            pending_force: Vec2::ZERO,
            applied_force: Vec2::ZERO,
        }
    }
}

impl LocomotionState {
    /// Create a fresh state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the character is grounded this step.
    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Whether the character stands on a slope this step.
    #[inline]
    pub fn is_on_slope(&self) -> bool {
        self.surface.is_slope()
    }

    /// Down-slope angle in radians; zero off slopes.
    pub fn down_slope_angle(&self) -> f32 {
        self.surface.down_angle()
    }

    /// Side-slope angle in radians; zero off slopes.
    pub fn side_slope_angle(&self) -> f32 {
        self.surface.side_angle()
    }

    /// Surface tangent when on a slope.
    pub fn slope_tangent(&self) -> Option<Vec2> {
        self.surface.tangent()
    }

    /// Clear sensor results at the start of a sensor pass.
    pub(crate) fn reset_detection(&mut self) {
        self.grounded = false;
        self.down_hit = None;
        self.front_hit = None;
        self.back_hit = None;
    }

    /// Accumulate a drive force for this step.
    pub(crate) fn add_force(&mut self, force: Vec2) {
        self.pending_force += force;
    }

    /// Start a new step: return the force applied last step so the backend
    /// can subtract it, and clear the accumulators.
    pub(crate) fn prepare_new_frame(&mut self) -> Vec2 {
        let to_subtract = self.applied_force;
        self.applied_force = Vec2::ZERO;
        self.pending_force = Vec2::ZERO;
        to_subtract
    }

    /// End of step: return the accumulated force for the backend to apply and
    /// remember it for next step's subtraction.
    pub(crate) fn finalize_frame(&mut self) -> Vec2 {
        self.applied_force = self.pending_force;
        self.pending_force = Vec2::ZERO;
        self.applied_force
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_idle() {
        let state = LocomotionState::new();
        assert_eq!(state.direction, 0.0);
        assert!(!state.is_grounded());
        assert!(!state.is_on_slope());
        assert_eq!(state.surface, Surface::None);
    }

    #[test]
    fn reset_detection_clears_sensor_results() {
        let mut state = LocomotionState::new();
        state.grounded = true;
        state.down_hit = Some(RayHit::new(1.0, Vec2::Y, Vec2::ZERO, None));
        state.front_hit = Some(RayHit::new(1.0, Vec2::X, Vec2::ZERO, None));

        state.reset_detection();
        assert!(!state.grounded);
        assert!(state.down_hit.is_none());
        assert!(state.front_hit.is_none());
        assert!(state.back_hit.is_none());
    }

    #[test]
    fn force_accumulation_cycle() {
        let mut state = LocomotionState::new();

        state.add_force(Vec2::new(100.0, 0.0));
        state.add_force(Vec2::new(50.0, 0.0));

        let applied = state.finalize_frame();
        assert_eq!(applied, Vec2::new(150.0, 0.0));

        // Next step subtracts exactly what was applied.
        let to_subtract = state.prepare_new_frame();
        assert_eq!(to_subtract, Vec2::new(150.0, 0.0));

        // Nothing left after the cycle.
        assert_eq!(state.finalize_frame(), Vec2::ZERO);
    }

    #[test]
    fn slope_accessors_follow_surface() {
        let mut state = LocomotionState::new();
        assert_eq!(state.down_slope_angle(), 0.0);
        assert!(state.slope_tangent().is_none());

        state.surface = Surface::Slope {
            down_angle: 0.5,
            side_angle: 0.2,
            tangent: Vec2::new(-1.0, 0.0),
        };
        assert!(state.is_on_slope());
        assert_eq!(state.down_slope_angle(), 0.5);
        assert_eq!(state.side_slope_angle(), 0.2);
        assert_eq!(state.slope_tangent(), Some(Vec2::new(-1.0, 0.0)));
    }
}
