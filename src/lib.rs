//! Slope-aware 2D platformer locomotion for Bevy.
//!
//! This crate drives a sidescroller character: acceleration-based ground
//! movement with a speed cap, raycast ground and slope detection, velocity
//! projection along walkable slopes, direction-aware ground drag, and
//! animation-parameter publication gated by a dialogue overlay.
//!
//! Physics is abstracted behind [`LocomotionPhysicsBackend`] so the controller
//! can run on different engines. An Avian2D backend ships behind the `avian2d`
//! feature (enabled by default).
//!
//! # Fixed-step pipeline
//!
//! Each `FixedUpdate` the controller runs through [`LocomotionSet`] phases in
//! strict order: sensors (raycasts) fill raw hit data, classification collapses
//! them into a [`Surface`](surface::Surface), movement picks and applies one
//! [`MoveCommand`](movement::MoveCommand), and drag selects the linear damping
//! for the step. Per render frame, [`animation`] publishes state flags and
//! samples input.
//!
//! # Example
//!
//! ```rust,no_run
//! use bevy::prelude::*;
//! use platformer_locomotion::prelude::*;
//!
//! # #[cfg(feature = "avian2d")]
//! fn setup(app: &mut App) {
//!     app.add_plugins(LocomotionPlugin::<Avian2dBackend>::default());
//! }
//!
//! fn spawn_player(mut commands: Commands) {
//!     commands.spawn((
//!         Transform::default(),
//!         LocomotionState::new(),
//!         LocomotionConfig::default(),
//!     ));
//! }
//! ```

use std::marker::PhantomData;

use bevy::prelude::*;

pub mod animation;
pub mod backend;
pub mod config;
pub mod controller;
pub mod detection;
pub mod intent;
pub mod movement;
pub mod surface;

#[cfg(feature = "avian2d")]
pub mod avian;

pub use backend::LocomotionPhysicsBackend;

/// Commonly used types.
pub mod prelude {
    pub use crate::animation::{AnimationParams, DialogueOverlay};
    pub use crate::backend::LocomotionPhysicsBackend;
    pub use crate::config::{ConfigError, LocomotionConfig};
    pub use crate::controller::LocomotionState;
    pub use crate::detection::RayHit;
    pub use crate::intent::MovementIntent;
    pub use crate::movement::{MoveCommand, INPUT_DEADZONE};
    pub use crate::surface::Surface;
    pub use crate::{LocomotionPlugin, LocomotionSet};

    #[cfg(feature = "avian2d")]
    pub use crate::avian::Avian2dBackend;
}

/// System sets for the fixed-step locomotion pipeline, executed in order.
///
/// Backend plugins hook their sensor and force-application systems into
/// `Sensors`, `Preparation` and `FinalApplication`; the generic systems fill
/// the phases in between.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocomotionSet {
    /// Clear per-frame force state left over from the previous step.
    Preparation,
    /// Raycast queries: ground ray plus the three slope rays.
    Sensors,
    /// Surface classification and friction material selection.
    Classify,
    /// Movement decision and application (force or velocity override).
    Movement,
    /// Direction-aware ground drag selection.
    Drag,
    /// Hand accumulated drive forces to the physics engine.
    FinalApplication,
}

/// Plugin that registers the locomotion systems for a physics backend `B`.
pub struct LocomotionPlugin<B: LocomotionPhysicsBackend> {
    _marker: PhantomData<B>,
}

impl<B: LocomotionPhysicsBackend> Default for LocomotionPlugin<B> {
    fn default() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<B: LocomotionPhysicsBackend> Plugin for LocomotionPlugin<B> {
    fn build(&self, app: &mut App) {
        app.register_type::<controller::LocomotionState>();
        app.register_type::<config::LocomotionConfig>();
        app.register_type::<intent::MovementIntent>();
        app.register_type::<animation::AnimationParams>();
        app.register_type::<animation::DialogueOverlay>();

        app.init_resource::<animation::DialogueOverlay>();

        app.configure_sets(
            FixedUpdate,
            (
                LocomotionSet::Preparation,
                LocomotionSet::Sensors,
                LocomotionSet::Classify,
                LocomotionSet::Movement,
                LocomotionSet::Drag,
                LocomotionSet::FinalApplication,
            )
                .chain(),
        );

        app.add_systems(
            FixedUpdate,
            (
                surface::classify_surfaces,
                movement::select_friction::<B>.after(surface::classify_surfaces),
            )
                .in_set(LocomotionSet::Classify),
        );
        app.add_systems(
            FixedUpdate,
            movement::apply_movement::<B>.in_set(LocomotionSet::Movement),
        );
        app.add_systems(
            FixedUpdate,
            movement::apply_ground_drag::<B>.in_set(LocomotionSet::Drag),
        );

        app.add_systems(
            Update,
            (animation::publish_animation, config::warn_invalid_configs),
        );

        app.add_plugins(B::plugin());
    }
}
