//! Surface classification.
//!
//! The three slope rays (down, front, back) collapse into a single tagged
//! [`Surface`] value per fixed step. Classification is a pure function of the
//! ray hits, so a transient miss simply yields [`Surface::None`] for that step
//! and self-corrects on the next one.

use bevy::prelude::*;

use crate::config::LocomotionConfig;
use crate::controller::LocomotionState;
use crate::detection::RayHit;

/// Normals within this angle of vertical count as flat ground (radians).
const FLAT_ANGLE_TOLERANCE: f32 = 1e-3;

/// Classified terrain under the character for one fixed step.
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub enum Surface {
    /// No slope ray hit anything.
    #[default]
    None,
    /// Level ground under the collider bottom.
    Flat,
    /// Inclined ground.
    Slope {
        /// Angle between the downward ray's hit normal and vertical (radians).
        down_angle: f32,
        /// Angle between the horizontal rays' hit normal and vertical (radians).
        /// Zero when neither horizontal ray hit.
        side_angle: f32,
        /// Unit vector along the slope surface (perpendicular of the normal).
        tangent: Vec2,
    },
}

impl Surface {
    /// Whether this surface is classified as a slope.
    #[inline]
    pub fn is_slope(&self) -> bool {
        matches!(self, Surface::Slope { .. })
    }

    /// Down-slope angle in radians; zero off slopes.
    pub fn down_angle(&self) -> f32 {
        match self {
            Surface::Slope { down_angle, .. } => *down_angle,
            _ => 0.0,
        }
    }

    /// Side-slope angle in radians; zero off slopes.
    pub fn side_angle(&self) -> f32 {
        match self {
            Surface::Slope { side_angle, .. } => *side_angle,
            _ => 0.0,
        }
    }

    /// Surface tangent when on a slope.
    pub fn tangent(&self) -> Option<Vec2> {
        match self {
            Surface::Slope { tangent, .. } => Some(*tangent),
            _ => None,
        }
    }

    /// Whether the character can walk on this surface.
    ///
    /// Flat ground and empty space are trivially walkable; a slope is walkable
    /// when both of its angles stay within `max_slope_angle`.
    pub fn walkable(&self, max_slope_angle: f32) -> bool {
        match self {
            Surface::Slope {
                down_angle,
                side_angle,
                ..
            } => *down_angle <= max_slope_angle && *side_angle <= max_slope_angle,
            _ => true,
        }
    }
}

/// Angle between a surface normal and vertical, in radians.
#[inline]
pub fn angle_from_up(normal: Vec2) -> f32 {
    normal.dot(Vec2::Y).clamp(-1.0, 1.0).acos()
}

/// Counter-clockwise perpendicular of a surface normal.
///
/// For an up-facing normal this points left, which is why the slope movement
/// branch negates the input direction when projecting along it.
#[inline]
pub fn perpendicular(normal: Vec2) -> Vec2 {
    Vec2::new(-normal.y, normal.x).normalize_or_zero()
}

/// Collapse the three slope rays into one [`Surface`] value.
///
/// The downward ray dominates: its normal gives the down angle and tangent.
/// The horizontal rays contribute the side angle and can promote flat ground
/// to a slope when the character is standing against an incline. A hit is a
/// slope whenever it exists and deviates from vertical; there is no
/// frame-to-frame angle comparison.
pub fn classify_surface(
    down: Option<&RayHit>,
    front: Option<&RayHit>,
    back: Option<&RayHit>,
) -> Surface {
    let side_hit = front.or(back);
    let side_angle = side_hit.map(|h| angle_from_up(h.normal)).unwrap_or(0.0);

    match down {
        Some(hit) => {
            let down_angle = angle_from_up(hit.normal);
            if down_angle <= FLAT_ANGLE_TOLERANCE && side_angle <= FLAT_ANGLE_TOLERANCE {
                Surface::Flat
            } else {
                Surface::Slope {
                    down_angle,
                    side_angle,
                    tangent: perpendicular(hit.normal),
                }
            }
        }
        None => match side_hit {
            Some(hit) if side_angle > FLAT_ANGLE_TOLERANCE => Surface::Slope {
                down_angle: 0.0,
                side_angle,
                tangent: perpendicular(hit.normal),
            },
            _ => Surface::None,
        },
    }
}

/// Classify each controller's surface from its freshest sensor data.
pub(crate) fn classify_surfaces(mut q: Query<(&LocomotionConfig, &mut LocomotionState)>) {
    for (config, mut state) in &mut q {
        state.surface = classify_surface(
            state.down_hit.as_ref(),
            state.front_hit.as_ref(),
            state.back_hit.as_ref(),
        );
        state.can_walk_on_slope = state.surface.walkable(config.max_slope_angle);
    }
}
