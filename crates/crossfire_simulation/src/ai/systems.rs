//! Controller system: decide → transition → act, once per fixed tick.

use bevy::prelude::*;
use tracing::debug;

use crate::ai::actions::{apply_transition, perform_state_action, AgentBody};
use crate::ai::{AgentState, Brain, ResourceSnapshot, StateChangeCounts};
use crate::combat::{ShotHit, ShotStats, Weapon};
use crate::components::{Agent, Health, Navigation, Opponent};
use crate::perception::Senses;
use crate::DeterministicRng;

/// System: run every agent's controller
///
/// Per agent (entity order, so RNG draws are reproducible):
/// 1. snapshot own resources
/// 2. `Brain::decide` (crisp table or fuzzy inference + vital overrides)
/// 3. on change → `apply_transition`
/// 4. `perform_state_action` for the resulting state; hits → `ShotHit`
///
/// Only the agent's own components are mutated here. Damage to the opponent
/// travels through `ShotHit` to `apply_shot_hits`.
#[allow(clippy::type_complexity)]
pub fn run_controllers(
    mut agents: Query<(
        Entity,
        &Agent,
        &mut Brain,
        &mut AgentState,
        &mut StateChangeCounts,
        &Senses,
        &Health,
        &Opponent,
        &mut Weapon,
        &mut Navigation,
        &mut ShotStats,
        &mut Transform,
    )>,
    mut hits: EventWriter<ShotHit>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time<Fixed>>,
) {
    let dt = time.timestep();

    let mut order: Vec<Entity> = agents.iter().map(|(entity, ..)| entity).collect();
    order.sort();

    for entity in order {
        let Ok((
            entity,
            agent,
            mut brain,
            mut state,
            mut counts,
            senses,
            health,
            opponent,
            mut weapon,
            mut navigation,
            mut stats,
            mut transform,
        )) = agents.get_mut(entity)
        else {
            continue;
        };

        let resources = ResourceSnapshot::capture(health, &weapon, &navigation);
        let previous = *state;
        let next = brain.decide(previous, senses, &resources);

        let mut body = AgentBody {
            transform: &mut *transform,
            weapon: &mut *weapon,
            navigation: &mut *navigation,
            stats: &mut *stats,
        };

        if apply_transition(next, &mut state, &mut counts, &mut body, &mut brain) {
            debug!(
                "🔄 {:?} ({}) {} → {}",
                entity, agent.controller, previous, next
            );
        }

        let shot = perform_state_action(
            *state,
            senses,
            &mut body,
            brain.shooting_range(),
            dt,
            &mut rng.rng,
        );

        if let Some(shot) = shot {
            debug!(
                "🔫 {:?} ({}) fired: {} ({} left)",
                entity,
                agent.controller,
                if shot.hit { "hit" } else { "miss" },
                body.weapon.ammo
            );
            if shot.hit {
                hits.write(ShotHit {
                    shooter: entity,
                    target: opponent.0,
                    damage: shot.damage,
                });
            }
        }
    }
}
