//! Arena composition: obstructions, hiding spots, the two agents
//!
//! Explicit wiring step. Every collaborator an agent needs (opponent,
//! controller, resource model, spawn point) is attached here with typed
//! references, then checked by `validate_agents` before the first tick.

use std::sync::Arc;

use bevy::prelude::*;
use bevy_rapier3d::prelude::Collider;
use tracing::info;

use crate::ai::{Brain, CrispController, FuzzyController, FuzzyModel};
use crate::combat::Weapon;
use crate::components::{Agent, ControllerKind, Health, HidingSpot, Navigation, Obstacle, Opponent, SpawnPoint};
use crate::config::{AgentProfile, DuelConfig};
use crate::error::SimulationError;
use crate::perception::Senses;

/// The two duelists
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuelAgents {
    pub crisp: Entity,
    pub fuzzy: Entity,
}

/// Spawn the arena described by `config` into `world`
pub fn spawn_arena(world: &mut World, config: &DuelConfig) -> Result<DuelAgents, SimulationError> {
    let arena = &config.arena;

    for obstacle in &arena.obstacles {
        let [hx, hy, hz] = obstacle.half_extents;
        world.spawn((
            Obstacle,
            Collider::cuboid(hx, hy, hz),
            Transform::from_translation(Vec3::from_array(obstacle.center)),
        ));
    }

    for spot in &arena.hiding_spots {
        world.spawn((HidingSpot, Transform::from_translation(Vec3::from_array(*spot))));
    }

    let crisp_brain = Brain::Crisp(CrispController::new(config.crisp_thresholds.clone()));

    let model = FuzzyModel::combat(config.fuzzy.ammo_per_clip, config.fuzzy_engine.resolution)?;
    let fuzzy_brain = Brain::Fuzzy(FuzzyController::new(
        Arc::new(model),
        config.fuzzy_engine.shooting_range,
    ));

    let crisp = spawn_agent(world, config, ControllerKind::Crisp, &config.crisp, arena.crisp_spawn, crisp_brain);
    let fuzzy = spawn_agent(world, config, ControllerKind::Fuzzy, &config.fuzzy, arena.fuzzy_spawn, fuzzy_brain);

    world.entity_mut(crisp).insert(Opponent(fuzzy));
    world.entity_mut(fuzzy).insert(Opponent(crisp));

    info!(
        "🏟 arena ready: {} obstacles, {} hiding spots, crisp {:?} vs fuzzy {:?}",
        arena.obstacles.len(),
        arena.hiding_spots.len(),
        crisp,
        fuzzy
    );

    Ok(DuelAgents { crisp, fuzzy })
}

fn spawn_agent(
    world: &mut World,
    config: &DuelConfig,
    controller: ControllerKind,
    profile: &AgentProfile,
    spawn: [f32; 3],
    brain: Brain,
) -> Entity {
    let position = Vec3::from_array(spawn);
    world
        .spawn((
            Agent { controller },
            brain,
            Health::new(profile.max_health),
            Weapon::from_profile(profile),
            Navigation::new(position, config.arena.move_speed, config.arena.arrival_radius),
            SpawnPoint(position),
            Transform::from_translation(position),
        ))
        .id()
}

/// Fail fast: every agent must have a controller, a spawn point and a live
/// opponent that is itself an agent.
pub fn validate_agents(world: &mut World) -> Result<(), SimulationError> {
    let mut query = world.query_filtered::<
        (Entity, Option<&Brain>, Option<&SpawnPoint>, Option<&Opponent>, Has<Senses>),
        With<Agent>,
    >();
    let agents: Vec<_> = query
        .iter(world)
        .map(|(entity, brain, spawn, opponent, senses)| {
            (entity, brain.is_some(), spawn.is_some(), opponent.copied(), senses)
        })
        .collect();

    if agents.is_empty() {
        return Err(SimulationError::MissingDependency {
            agent: "arena".to_string(),
            dependency: "agents",
        });
    }

    for (entity, has_brain, has_spawn, opponent, has_senses) in agents {
        let missing = |dependency: &'static str| SimulationError::MissingDependency {
            agent: format!("{entity:?}"),
            dependency,
        };

        if !has_brain {
            return Err(missing("Brain"));
        }
        if !has_spawn {
            return Err(missing("SpawnPoint"));
        }
        if !has_senses {
            return Err(missing("Senses"));
        }
        let Some(Opponent(target)) = opponent else {
            return Err(missing("Opponent"));
        };
        if target == entity || world.get::<Agent>(target).is_none() {
            return Err(missing("Opponent"));
        }
        if world.get::<Health>(target).is_none() {
            return Err(missing("Opponent health"));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::AgentState;

    #[test]
    fn test_spawn_wires_opponents_and_profiles() {
        let mut world = World::new();
        let mut config = DuelConfig::default();
        config.fuzzy.max_health = 80;

        let agents = spawn_arena(&mut world, &config).unwrap();

        assert_eq!(world.get::<Opponent>(agents.crisp), Some(&Opponent(agents.fuzzy)));
        assert_eq!(world.get::<Opponent>(agents.fuzzy), Some(&Opponent(agents.crisp)));
        assert_eq!(world.get::<Health>(agents.fuzzy).unwrap().max, 80);
        assert_eq!(world.get::<AgentState>(agents.crisp), Some(&AgentState::Idle));
        assert_eq!(world.get::<Brain>(agents.fuzzy).map(Brain::kind), Some(ControllerKind::Fuzzy));
        assert_eq!(
            world.get::<Weapon>(agents.fuzzy).unwrap().reload_time,
            std::time::Duration::from_secs(2)
        );

        let obstacles = world.query_filtered::<(), With<Obstacle>>().iter(&world).count();
        let spots = world.query_filtered::<(), With<HidingSpot>>().iter(&world).count();
        assert_eq!(obstacles, config.arena.obstacles.len());
        assert_eq!(spots, config.arena.hiding_spots.len());

        assert!(validate_agents(&mut world).is_ok());
    }

    #[test]
    fn test_validate_rejects_agent_without_opponent() {
        let mut world = World::new();
        world.spawn((
            Agent::default(),
            Brain::Crisp(CrispController::default()),
            SpawnPoint(Vec3::ZERO),
        ));

        assert!(matches!(
            validate_agents(&mut world),
            Err(SimulationError::MissingDependency { dependency: "Opponent", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_empty_world() {
        let mut world = World::new();
        assert!(validate_agents(&mut world).is_err());
    }
}
