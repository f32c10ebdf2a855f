//! Round harness: outcome scoring, per-round reports, reset between rounds
//!
//! Thin layer over the core. It only reads the harness surface
//! (Health, ShotStats, StateChangeCounts) and calls `reset_agent`.
//!
//! Flow:
//! - `RoundDecided` (kill) or tick limit → `conclude_rounds` (DuelSet::Bookkeeping)
//! - report appended to `RoundLog`, `Scoreboard` updated
//! - `ResetRound` requested → `handle_reset_requests` next tick (DuelSet::Reset)
//! - after `rounds` rounds → `MatchStatus::Finished`, every duel set stops running

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::ai::{AgentState, Brain, StateChangeCounts};
use crate::combat::{RoundDecided, ShotStats, Weapon};
use crate::components::{Agent, ControllerKind, Health, Navigation, SpawnPoint};
use crate::config::DuelConfig;
use crate::error::SimulationError;
use crate::perception::Senses;
use crate::DuelSet;

/// Wins per controller
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub crisp_wins: u32,
    pub fuzzy_wins: u32,
    pub draws: u32,
}

impl Scoreboard {
    pub fn record(&mut self, winner: Option<ControllerKind>) {
        match winner {
            Some(ControllerKind::Crisp) => self.crisp_wins += 1,
            Some(ControllerKind::Fuzzy) => self.fuzzy_wins += 1,
            None => self.draws += 1,
        }
    }

    pub fn rounds_played(&self) -> u32 {
        self.crisp_wins + self.fuzzy_wins + self.draws
    }
}

/// Whether duel systems still run
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchStatus {
    #[default]
    InProgress,
    Finished,
}

/// Current round (1-based) and fixed ticks elapsed in it
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundClock {
    pub round: u32,
    pub ticks: u64,
}

impl Default for RoundClock {
    fn default() -> Self {
        Self { round: 1, ticks: 0 }
    }
}

/// Harness snapshot of one agent at round end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentReport {
    pub controller: ControllerKind,
    pub health_remaining: u32,
    pub bullets_fired: u32,
    pub bullets_hit: u32,
    /// Transitions into each state, indexed by `AgentState::index`
    pub state_changes: [u32; AgentState::COUNT],
}

/// One finished round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundReport {
    pub round: u32,
    /// `None` = draw (double kill or tick limit)
    pub winner: Option<ControllerKind>,
    pub ticks: u64,
    pub agents: Vec<AgentReport>,
}

/// All finished rounds in order
#[derive(Resource, Debug, Clone, Default)]
pub struct RoundLog {
    pub reports: Vec<RoundReport>,
}

/// Request: put every agent back to round-start condition
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ResetRound;

/// Reset: full health and clip, timers cleared, back at the spawn point in
/// Idle, navigation stopped, counters zeroed, Idle rules reinstalled.
///
/// The only way out of Dead.
pub fn reset_agent(world: &mut World, entity: Entity) -> Result<(), SimulationError> {
    let missing = |dependency: &'static str| SimulationError::MissingDependency {
        agent: format!("{entity:?}"),
        dependency,
    };

    let mut agent = world.get_entity_mut(entity).map_err(|_| missing("entity"))?;
    let spawn = agent.get::<SpawnPoint>().ok_or_else(|| missing("SpawnPoint"))?.0;

    agent.get_mut::<Health>().ok_or_else(|| missing("Health"))?.restore();
    agent.get_mut::<Weapon>().ok_or_else(|| missing("Weapon"))?.restock();

    {
        let mut transform = agent.get_mut::<Transform>().ok_or_else(|| missing("Transform"))?;
        transform.translation = spawn;
        transform.rotation = Quat::IDENTITY;
    }
    {
        let mut navigation = agent.get_mut::<Navigation>().ok_or_else(|| missing("Navigation"))?;
        navigation.hold(spawn);
        navigation.at_hiding_spot = false;
    }

    *agent.get_mut::<AgentState>().ok_or_else(|| missing("AgentState"))? = AgentState::Idle;
    agent.get_mut::<StateChangeCounts>().ok_or_else(|| missing("StateChangeCounts"))?.clear();
    agent.get_mut::<ShotStats>().ok_or_else(|| missing("ShotStats"))?.clear();
    *agent.get_mut::<Senses>().ok_or_else(|| missing("Senses"))? = Senses::default();
    agent.get_mut::<Brain>().ok_or_else(|| missing("Brain"))?.on_enter(AgentState::Idle);

    Ok(())
}

/// Exclusive system: apply pending `ResetRound` requests to every agent
pub fn handle_reset_requests(world: &mut World) {
    let requested = world
        .get_resource_mut::<Events<ResetRound>>()
        .map(|mut events| events.drain().count())
        .unwrap_or(0);
    if requested == 0 {
        return;
    }

    let mut query = world.query_filtered::<Entity, With<Agent>>();
    let mut agents: Vec<Entity> = query.iter(world).collect();
    agents.sort();

    for entity in agents {
        if let Err(err) = reset_agent(world, entity) {
            error!("reset failed: {}", err);
        }
    }

    if let Some(clock) = world.get_resource::<RoundClock>() {
        info!("🔁 round {} start", clock.round);
    }
}

/// System: end the round on a kill or on the tick limit
///
/// Winner is the agent still alive; both down in the same tick is a draw.
#[allow(clippy::too_many_arguments)]
pub fn conclude_rounds(
    mut decided: EventReader<RoundDecided>,
    agents: Query<(Entity, &Agent, &Health, &ShotStats, &StateChangeCounts)>,
    config: Res<DuelConfig>,
    mut clock: ResMut<RoundClock>,
    mut scoreboard: ResMut<Scoreboard>,
    mut log: ResMut<RoundLog>,
    mut status: ResMut<MatchStatus>,
    mut resets: EventWriter<ResetRound>,
) {
    clock.ticks += 1;

    let killed = decided.read().count() > 0;
    let timed_out = clock.ticks >= config.simulation.max_ticks_per_round;
    if !killed && !timed_out {
        return;
    }

    let mut snapshot: Vec<_> = agents.iter().collect();
    snapshot.sort_by_key(|(entity, ..)| *entity);

    let winner = if killed {
        let mut alive = snapshot.iter().filter(|(_, _, health, ..)| health.is_alive());
        match (alive.next(), alive.next()) {
            (Some((_, agent, ..)), None) => Some(agent.controller),
            _ => None,
        }
    } else {
        info!("⏱ round {} hit the tick limit ({})", clock.round, clock.ticks);
        None
    };

    let report = RoundReport {
        round: clock.round,
        winner,
        ticks: clock.ticks,
        agents: snapshot
            .iter()
            .map(|(_, agent, health, stats, counts)| AgentReport {
                controller: agent.controller,
                health_remaining: health.current,
                bullets_fired: stats.fired,
                bullets_hit: stats.hit,
                state_changes: counts.as_array(),
            })
            .collect(),
    };

    scoreboard.record(winner);
    match winner {
        Some(kind) => info!("🏆 round {} won by {} in {} ticks", clock.round, kind, clock.ticks),
        None => info!("🤝 round {} drawn after {} ticks", clock.round, clock.ticks),
    }
    log.reports.push(report);

    if log.reports.len() as u32 >= config.simulation.rounds {
        *status = MatchStatus::Finished;
        info!(
            "match finished: crisp {} / fuzzy {} / draws {}",
            scoreboard.crisp_wins, scoreboard.fuzzy_wins, scoreboard.draws
        );
        return;
    }

    clock.round += 1;
    clock.ticks = 0;
    resets.write(ResetRound);
}

/// Round Plugin
///
/// Scoreboard, round log, reset handling. Reset runs first in the tick,
/// bookkeeping last.
pub struct RoundPlugin;

impl Plugin for RoundPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Scoreboard>()
            .init_resource::<RoundLog>()
            .init_resource::<RoundClock>()
            .init_resource::<MatchStatus>()
            .add_event::<ResetRound>()
            .add_systems(FixedUpdate, handle_reset_requests.in_set(DuelSet::Reset))
            .add_systems(FixedUpdate, conclude_rounds.in_set(DuelSet::Bookkeeping));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::CrispController;
    use crate::combat::Shot;
    use std::time::Duration;

    #[test]
    fn test_scoreboard_counts() {
        let mut board = Scoreboard::default();
        board.record(Some(ControllerKind::Crisp));
        board.record(Some(ControllerKind::Fuzzy));
        board.record(Some(ControllerKind::Fuzzy));
        board.record(None);

        assert_eq!(board, Scoreboard { crisp_wins: 1, fuzzy_wins: 2, draws: 1 });
        assert_eq!(board.rounds_played(), 4);
    }

    #[test]
    fn test_reset_leaves_dead() {
        let mut world = World::new();
        let spawn = Vec3::new(-12.0, 0.0, 0.0);
        let entity = world
            .spawn((
                Agent::default(),
                Brain::Crisp(CrispController::default()),
                SpawnPoint(spawn),
                Transform::from_xyz(3.0, 0.0, 4.0),
            ))
            .id();

        {
            let mut agent = world.entity_mut(entity);
            agent.get_mut::<Health>().unwrap().take_damage(500);
            *agent.get_mut::<AgentState>().unwrap() = AgentState::Dead;
            agent.get_mut::<StateChangeCounts>().unwrap().record(AgentState::Dead);
            agent.get_mut::<ShotStats>().unwrap().record(&Shot { hit: true, damage: 10 });
            let mut weapon = agent.get_mut::<Weapon>().unwrap();
            weapon.ammo = 0;
            weapon.begin_reload();
        }

        reset_agent(&mut world, entity).unwrap();

        let agent = world.entity(entity);
        assert_eq!(agent.get::<Health>().unwrap().current, 100);
        assert_eq!(*agent.get::<AgentState>().unwrap(), AgentState::Idle);
        assert_eq!(agent.get::<StateChangeCounts>().unwrap().total(), 0);
        assert_eq!(agent.get::<ShotStats>().unwrap().fired, 0);
        assert_eq!(agent.get::<Transform>().unwrap().translation, spawn);
        assert_eq!(agent.get::<Navigation>().unwrap().destination, spawn);

        let weapon = agent.get::<Weapon>().unwrap();
        assert_eq!(weapon.ammo, 10);
        assert!(weapon.finished_reloading());
        assert_eq!(weapon.cooldown(), Duration::ZERO);
    }

    #[test]
    fn test_reset_without_spawn_point_fails() {
        let mut world = World::new();
        let entity = world
            .spawn((Agent::default(), Brain::Crisp(CrispController::default())))
            .id();

        assert!(matches!(
            reset_agent(&mut world, entity),
            Err(SimulationError::MissingDependency { dependency: "SpawnPoint", .. })
        ));
    }
}
