//! Animation parameters and the dialogue gate.
//!
//! The controller does not drive sprites itself; it publishes named
//! parameters to [`AnimationParams`] once per render frame, and the game's
//! animation layer reads them. While a dialogue overlay is open the
//! publication step forces `moving` off and touches nothing else.

use bevy::prelude::*;

use crate::controller::LocomotionState;
use crate::intent::MovementIntent;

/// Named animation parameters published by the controller each render frame.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct AnimationParams {
    /// Whether the character has active horizontal input.
    pub moving: bool,
    /// Grounded flag from the last fixed step.
    pub grounded: bool,
    /// On-slope flag from the last fixed step.
    pub on_slope: bool,
    /// Last non-idle horizontal input direction.
    pub horizontal_direction: f32,
}

/// Whether a dialogue overlay currently covers the screen.
///
/// While open, the per-frame locomotion work yields: the character animates
/// as idle and no input is sampled. Fixed-step physics keeps running with the
/// last sampled direction, which is zeroed the frame before a well-behaved
/// overlay opens.
#[derive(Resource, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Resource)]
pub struct DialogueOverlay {
    /// True while the overlay is shown.
    pub visible: bool,
}

impl DialogueOverlay {
    /// Whether the overlay is currently shown.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.visible
    }
}

/// Per render frame: publish animation flags and sample the input axis.
///
/// With the dialogue overlay open this only forces `moving` off; every other
/// field, including the sampled direction, is left untouched.
pub(crate) fn publish_animation(
    overlay: Res<DialogueOverlay>,
    mut q: Query<(&MovementIntent, &mut LocomotionState, &mut AnimationParams)>,
) {
    for (intent, mut state, mut anim) in &mut q {
        if overlay.is_open() {
            anim.moving = false;
            continue;
        }

        anim.grounded = state.grounded;
        anim.on_slope = state.is_on_slope();

        let input = intent.walk;
        if input != 0.0 {
            anim.moving = true;
            anim.horizontal_direction = input;
        } else {
            anim.moving = false;
        }

        state.direction = input;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Surface;

    fn test_app() -> App {
        let mut app = App::new();
        app.init_resource::<DialogueOverlay>();
        app.add_systems(Update, publish_animation);
        app
    }

    fn spawn(app: &mut App) -> Entity {
        app.world_mut()
            .spawn((
                LocomotionState::new(),
                MovementIntent::new(),
                AnimationParams::default(),
            ))
            .id()
    }

    #[test]
    fn publishes_flags_and_samples_input() {
        let mut app = test_app();
        let entity = spawn(&mut app);

        {
            let mut state = app.world_mut().get_mut::<LocomotionState>(entity).unwrap();
            state.grounded = true;
            state.surface = Surface::Slope {
                down_angle: 0.3,
                side_angle: 0.0,
                tangent: Vec2::new(-1.0, 0.0),
            };
        }
        app.world_mut()
            .get_mut::<MovementIntent>(entity)
            .unwrap()
            .set_walk(-1.0);

        app.update();

        let anim = app.world().get::<AnimationParams>(entity).unwrap();
        assert!(anim.moving);
        assert!(anim.grounded);
        assert!(anim.on_slope);
        assert_eq!(anim.horizontal_direction, -1.0);

        let state = app.world().get::<LocomotionState>(entity).unwrap();
        assert_eq!(state.direction, -1.0);
    }

    #[test]
    fn idle_input_clears_moving_but_keeps_last_direction() {
        let mut app = test_app();
        let entity = spawn(&mut app);

        app.world_mut()
            .get_mut::<MovementIntent>(entity)
            .unwrap()
            .set_walk(1.0);
        app.update();

        app.world_mut()
            .get_mut::<MovementIntent>(entity)
            .unwrap()
            .clear();
        app.update();

        let anim = app.world().get::<AnimationParams>(entity).unwrap();
        assert!(!anim.moving);
        // The direction parameter keeps its last non-idle value so the sprite
        // stays facing the way it was moving.
        assert_eq!(anim.horizontal_direction, 1.0);
    }

    #[test]
    fn dialogue_overlay_forces_idle_and_skips_sampling() {
        let mut app = test_app();
        let entity = spawn(&mut app);

        app.world_mut().resource_mut::<DialogueOverlay>().visible = true;
        app.world_mut()
            .get_mut::<MovementIntent>(entity)
            .unwrap()
            .set_walk(1.0);

        app.update();

        let anim = app.world().get::<AnimationParams>(entity).unwrap();
        assert!(!anim.moving);
        assert!(!anim.grounded);
        assert_eq!(anim.horizontal_direction, 0.0);

        // Input was not sampled while the overlay was open.
        let state = app.world().get::<LocomotionState>(entity).unwrap();
        assert_eq!(state.direction, 0.0);
    }

    #[test]
    fn closing_overlay_resumes_publication() {
        let mut app = test_app();
        let entity = spawn(&mut app);

        app.world_mut().resource_mut::<DialogueOverlay>().visible = true;
        app.world_mut()
            .get_mut::<MovementIntent>(entity)
            .unwrap()
            .set_walk(1.0);
        app.update();

        app.world_mut().resource_mut::<DialogueOverlay>().visible = false;
        app.update();

        let anim = app.world().get::<AnimationParams>(entity).unwrap();
        assert!(anim.moving);
        let state = app.world().get::<LocomotionState>(entity).unwrap();
        assert_eq!(state.direction, 1.0);
    }
}
