//! Crossfire Simulation Core
//!
//! Headless one-on-one duel on Bevy 0.16 ECS: a crisp state machine versus a
//! fuzzy-logic controller under identical combat rules.
//!
//! Per fixed tick (`DuelSet`, chained):
//! 1. Reset: pending `ResetRound` requests
//! 2. Perception: distance, line of sight, hiding spot → `Senses`
//! 3. Weapons: shot cooldowns
//! 4. Decide: controllers pick a state and act (fire → `ShotHit`)
//! 5. Resolve: damage, death, round outcome
//! 6. Navigate: agents step toward their destination
//! 7. Bookkeeping: scoring, reports, reset requests

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::warn;

pub mod ai;
pub mod arena;
pub mod combat;
pub mod components;
pub mod config;
pub mod error;
pub mod logger;
pub mod movement;
pub mod perception;
pub mod round;

pub use ai::{AIPlugin, AgentState, Brain, InvalidStateIndex, StateChangeCounts};
pub use arena::{spawn_arena, validate_agents, DuelAgents};
pub use combat::{apply_damage, AgentDied, CombatPlugin, DamageDealt, RoundDecided, ShotHit, ShotStats, Weapon};
pub use components::{Agent, ControllerKind, Health, HidingSpot, Navigation, Obstacle, Opponent, SpawnPoint};
pub use config::DuelConfig;
pub use error::SimulationError;
pub use logger::init_logger;
pub use movement::advance_navigation;
pub use perception::{sense_opponents, Senses};
pub use round::{reset_agent, MatchStatus, ResetRound, RoundClock, RoundLog, RoundPlugin, RoundReport, Scoreboard};

/// Fixed-tick phases, in execution order
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DuelSet {
    Reset,
    Perception,
    Weapons,
    Decide,
    Resolve,
    Navigate,
    Bookkeeping,
}

/// Duel systems stop once the match is over
fn match_in_progress(status: Option<Res<MatchStatus>>) -> bool {
    status.map_or(true, |status| *status == MatchStatus::InProgress)
}

/// Main simulation plugin (all duel subsystems)
///
/// Expects the arena to be spawned (see `build_duel_app`). Keeps an existing
/// `DuelConfig` / `DeterministicRng`; otherwise falls back to defaults.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DuelConfig>();

        if !app.world().contains_resource::<DeterministicRng>() {
            let seed = app.world().resource::<DuelConfig>().simulation.seed;
            app.insert_resource(DeterministicRng::new(seed));
        }

        app.configure_sets(
            FixedUpdate,
            (
                DuelSet::Reset,
                DuelSet::Perception,
                DuelSet::Weapons,
                DuelSet::Decide,
                DuelSet::Resolve,
                DuelSet::Navigate,
                DuelSet::Bookkeeping,
            )
                .chain()
                .run_if(match_in_progress),
        )
        .add_plugins((CombatPlugin, AIPlugin, RoundPlugin))
        .add_systems(
            FixedUpdate,
            (
                sense_opponents.in_set(DuelSet::Perception),
                advance_navigation.in_set(DuelSet::Navigate),
            ),
        );
    }
}

/// Seeded RNG resource. Hit rolls only.
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Minimal headless App: one `update()` = one 60 Hz fixed tick
///
/// The very first `update()` only initialises time and runs no fixed tick.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    let tick = Duration::from_secs_f64(1.0 / 60.0);
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_duration(tick))
        .insert_resource(TimeUpdateStrategy::ManualDuration(tick));

    app
}

/// Validated config → headless app with the arena spawned and wired
///
/// Composition errors (bad config, fuzzy model, missing collaborators) are
/// returned here; an app that fails to build never ticks.
pub fn build_duel_app(config: DuelConfig) -> Result<App, SimulationError> {
    config.validate()?;

    let mut app = create_headless_app(config.simulation.seed);
    let tick = config.simulation.tick();
    app.insert_resource(Time::<Fixed>::from_duration(tick))
        .insert_resource(TimeUpdateStrategy::ManualDuration(tick));

    let agents = spawn_arena(app.world_mut(), &config)?;
    validate_agents(app.world_mut())?;

    app.insert_resource(agents)
        .insert_resource(config)
        .add_plugins(SimulationPlugin);

    Ok(app)
}

/// Tick until `MatchStatus::Finished`. Returns the number of updates run.
///
/// Bounded by the configured round count and tick limit, so a stuck match
/// cannot spin forever.
pub fn run_match(app: &mut App) -> u64 {
    let limit = app
        .world()
        .get_resource::<DuelConfig>()
        .map(|config| {
            let per_round = config.simulation.max_ticks_per_round.saturating_add(1);
            u64::from(config.simulation.rounds)
                .saturating_mul(per_round)
                .saturating_add(1)
        })
        .unwrap_or(0);

    let mut updates = 0;
    while updates <= limit {
        let finished = app
            .world()
            .get_resource::<MatchStatus>()
            .is_some_and(|status| *status == MatchStatus::Finished);
        if finished {
            return updates;
        }
        app.update();
        updates += 1;
    }

    warn!("match did not finish within {} updates", limit);
    updates
}

/// World snapshot for determinism comparisons
///
/// Debug-formatted components in entity order.
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
