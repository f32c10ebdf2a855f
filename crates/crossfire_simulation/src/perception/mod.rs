//! Perception: line of sight, distance, hiding-spot search
//!
//! Pure functions over world geometry. The obstruction world is reached only
//! through the `LineOfSight` trait, so every query is testable with a stub.
//!
//! Architecture:
//! - `ObstructionMask`: rapier cuboid colliders snapshotted from `Obstacle` entities
//! - `can_see`: eye-height segment test against a `LineOfSight`
//! - `closest_hidden_spot`: greedy search over candidates the target cannot see
//! - `sense_opponents` system → fills `Senses` every tick (nothing cached)

use bevy::prelude::*;
use bevy_rapier3d::prelude::Collider;

pub mod senses;

pub use senses::{sense_opponents, Senses};

/// World-query seam: is the straight segment `from → to` unobstructed?
pub trait LineOfSight {
    fn is_clear(&self, from: Vec3, to: Vec3) -> bool;
}

/// Set of static obstructions (collider + pose)
#[derive(Debug, Clone, Default)]
pub struct ObstructionMask {
    obstacles: Vec<(Collider, Vec3, Quat)>,
}

impl ObstructionMask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_obstacle(mut self, collider: Collider, translation: Vec3, rotation: Quat) -> Self {
        self.obstacles.push((collider, translation, rotation));
        self
    }

    /// Axis-aligned box
    pub fn with_box(self, center: Vec3, half_extents: Vec3) -> Self {
        self.with_obstacle(
            Collider::cuboid(half_extents.x, half_extents.y, half_extents.z),
            center,
            Quat::IDENTITY,
        )
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}

impl FromIterator<(Collider, Vec3, Quat)> for ObstructionMask {
    fn from_iter<I: IntoIterator<Item = (Collider, Vec3, Quat)>>(iter: I) -> Self {
        Self {
            obstacles: iter.into_iter().collect(),
        }
    }
}

impl LineOfSight for ObstructionMask {
    fn is_clear(&self, from: Vec3, to: Vec3) -> bool {
        let offset = to - from;
        let length = offset.length();
        if length <= f32::EPSILON {
            return true;
        }
        let dir = offset / length;

        // blocked iff something is hit strictly before the far end
        !self.obstacles.iter().any(|(collider, translation, rotation)| {
            collider
                .cast_ray(*translation, *rotation, from, dir, length, true)
                .is_some_and(|toi| toi < length)
        })
    }
}

/// Euclidean distance
pub fn distance(a: Vec3, b: Vec3) -> f32 {
    a.distance(b)
}

/// Visibility between two feet positions, both raised to eye height
pub fn can_see(los: &impl LineOfSight, observer: Vec3, target: Vec3, eye_height: f32) -> bool {
    let eye = Vec3::Y * eye_height;
    los.is_clear(observer + eye, target + eye)
}

/// Nearest candidate (to `self_position`) that the target cannot see.
///
/// Greedy incumbent scan in iteration order: a hidden spot replaces the
/// incumbent when it is at least as close, so equal distances go to the later
/// candidate. `None` when every spot is visible from the target.
pub fn closest_hidden_spot(
    los: &impl LineOfSight,
    self_position: Vec3,
    target_position: Vec3,
    spots: impl IntoIterator<Item = Vec3>,
    eye_height: f32,
) -> Option<Vec3> {
    let mut best: Option<Vec3> = None;
    for spot in spots {
        if can_see(los, target_position, spot, eye_height) {
            continue;
        }
        match best {
            Some(incumbent)
                if distance(self_position, incumbent) < distance(self_position, spot) => {}
            _ => best = Some(spot),
        }
    }
    best
}
