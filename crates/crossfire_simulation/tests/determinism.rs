//! Determinism tests
//!
//! Same seed + same config → identical rounds, identical final world.

use bevy::prelude::*;
use crossfire_simulation::{
    build_duel_app, create_headless_app, run_match, world_snapshot, AgentState, DuelConfig, Health, RoundLog,
    RoundReport, StateChangeCounts,
};

fn match_config(seed: u64) -> DuelConfig {
    let mut config = DuelConfig::default();
    config.simulation.seed = seed;
    config.simulation.rounds = 2;
    config.simulation.max_ticks_per_round = 2_400;
    config
}

/// Play a match and return the round log plus snapshots of the final world
fn run_simulation(seed: u64) -> (Vec<RoundReport>, Vec<u8>) {
    let mut app = build_duel_app(match_config(seed)).unwrap();
    run_match(&mut app);

    let reports = app.world().resource::<RoundLog>().reports.clone();

    let world = app.world_mut();
    let mut snapshot = world_snapshot::<Health>(world);
    snapshot.extend(world_snapshot::<AgentState>(world));
    snapshot.extend(world_snapshot::<StateChangeCounts>(world));
    snapshot.extend(world_snapshot::<Transform>(world));

    (reports, snapshot)
}

#[test]
fn test_determinism_same_seed() {
    const SEED: u64 = 12345;

    let first = run_simulation(SEED);
    let second = run_simulation(SEED);

    assert_eq!(first, second, "same seed ({}) gave different matches", SEED);
}

#[test]
fn test_determinism_multiple_runs() {
    const SEED: u64 = 42;

    let runs: Vec<_> = (0..3).map(|_| run_simulation(SEED)).collect();

    for (i, run) in runs.iter().enumerate().skip(1) {
        assert_eq!(runs[0], *run, "run {} differs from run 0", i);
    }
}

#[derive(Resource, Default)]
struct FixedTicks(u32);

fn count_fixed_ticks(mut ticks: ResMut<FixedTicks>) {
    ticks.0 += 1;
}

#[test]
fn test_one_update_is_one_fixed_tick() {
    let mut app = create_headless_app(7);
    app.init_resource::<FixedTicks>()
        .add_systems(FixedUpdate, count_fixed_ticks);

    // first update only starts the clock
    app.update();
    for _ in 0..100 {
        app.update();
    }

    assert_eq!(app.world().resource::<FixedTicks>().0, 100);
}
