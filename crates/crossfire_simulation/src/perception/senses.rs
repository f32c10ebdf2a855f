//! Per-tick sensed values and the system that fills them.

use bevy::prelude::*;
use bevy_rapier3d::prelude::Collider;

use crate::components::{Agent, Health, HidingSpot, Obstacle, Opponent};
use crate::config::DuelConfig;

use super::{can_see, closest_hidden_spot, distance, ObstructionMask};

/// What an agent knows about its opponent this tick
///
/// Rewritten every tick by `sense_opponents`; never carried across ticks.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct Senses {
    pub distance: f32,
    pub can_see_target: bool,
    pub target_position: Vec3,
    pub target_health: u32,
    pub target_max_health: u32,
    /// Nearest spot the target cannot see, if any
    pub hiding_spot: Option<Vec3>,
}

impl Senses {
    /// The one "in range" predicate both controllers use (inclusive)
    pub fn in_shooting_range(&self, threshold: f32) -> bool {
        self.distance <= threshold
    }

    pub fn target_alive(&self) -> bool {
        self.target_health > 0
    }

    pub fn target_health_percent(&self) -> f32 {
        if self.target_max_health == 0 {
            return 0.0;
        }
        self.target_health as f32 * 100.0 / self.target_max_health as f32
    }
}

/// System: perception pass
///
/// For every agent: distance to opponent, line of sight (eye height from
/// config), opponent health, closest hiding spot hidden from the opponent.
/// Spots are scanned in entity order so the greedy search is deterministic.
pub fn sense_opponents(
    mut agents: Query<(&Transform, &Opponent, &mut Senses), With<Agent>>,
    targets: Query<(&Transform, &Health), With<Agent>>,
    obstacles: Query<(&Collider, &Transform), With<Obstacle>>,
    spots: Query<(Entity, &Transform), With<HidingSpot>>,
    config: Res<DuelConfig>,
) {
    let mask: ObstructionMask = obstacles
        .iter()
        .map(|(collider, transform)| (collider.clone(), transform.translation, transform.rotation))
        .collect();

    let mut spot_positions: Vec<(Entity, Vec3)> = spots
        .iter()
        .map(|(entity, transform)| (entity, transform.translation))
        .collect();
    spot_positions.sort_by_key(|(entity, _)| *entity);

    let eye_height = config.arena.eye_height;

    for (transform, opponent, mut senses) in agents.iter_mut() {
        let Ok((target_transform, target_health)) = targets.get(opponent.0) else {
            // opponent despawned: nothing to see, treat as down
            *senses = Senses::default();
            continue;
        };

        let own = transform.translation;
        let target = target_transform.translation;

        *senses = Senses {
            distance: distance(own, target),
            can_see_target: can_see(&mask, own, target, eye_height),
            target_position: target,
            target_health: target_health.current,
            target_max_health: target_health.max,
            hiding_spot: closest_hidden_spot(
                &mask,
                own,
                target,
                spot_positions.iter().map(|(_, position)| *position),
                eye_height,
            ),
        };
    }
}
