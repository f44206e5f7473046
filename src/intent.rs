//! Movement intent component.
//!
//! The intent is the input seam: player-input or AI code writes the raw
//! horizontal axis here, and the controller polls it once per render frame.

use bevy::prelude::*;

/// Horizontal movement intent from player input or AI.
///
/// # Example
///
/// ```rust
/// use platformer_locomotion::prelude::*;
///
/// let mut intent = MovementIntent::new();
/// intent.set_walk(1.0);
/// assert!(intent.is_walking());
///
/// intent.clear();
/// assert!(!intent.is_walking());
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct MovementIntent {
    /// Raw horizontal axis (-1.0 = left, 1.0 = right).
    pub walk: f32,
}

impl MovementIntent {
    /// Create a new empty intent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the horizontal axis, clamped to [-1, 1].
    pub fn set_walk(&mut self, direction: f32) {
        self.walk = direction.clamp(-1.0, 1.0);
    }

    /// Clear the intent.
    pub fn clear(&mut self) {
        self.walk = 0.0;
    }

    /// Whether there is active horizontal input.
    pub fn is_walking(&self) -> bool {
        self.walk.abs() > 0.001
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_new() {
        let intent = MovementIntent::new();
        assert_eq!(intent.walk, 0.0);
        assert!(!intent.is_walking());
    }

    #[test]
    fn set_walk_clamps_to_axis_range() {
        let mut intent = MovementIntent::new();
        intent.set_walk(0.5);
        assert_eq!(intent.walk, 0.5);

        intent.set_walk(5.0);
        assert_eq!(intent.walk, 1.0);

        intent.set_walk(-5.0);
        assert_eq!(intent.walk, -1.0);
    }

    #[test]
    fn is_walking_threshold() {
        let mut intent = MovementIntent::new();
        intent.set_walk(0.0001);
        assert!(!intent.is_walking());

        intent.set_walk(0.5);
        assert!(intent.is_walking());
    }

    #[test]
    fn clear_resets_axis() {
        let mut intent = MovementIntent::new();
        intent.set_walk(1.0);
        intent.clear();
        assert!(!intent.is_walking());
    }
}
