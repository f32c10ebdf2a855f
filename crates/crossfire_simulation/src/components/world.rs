//! Static arena markers: obstructions and hiding spots

use bevy::prelude::*;

/// Line-of-sight blocker. Spawned with a rapier `Collider` and a `Transform`.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(Transform)]
pub struct Obstacle;

/// Candidate cover position (its `Transform` translation)
///
/// Whether the opponent can see it is queried live every tick.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(Transform)]
pub struct HidingSpot;
