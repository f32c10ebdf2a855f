//! Headless duel runner
//!
//! `crossfire_simulation [config.toml]`: plays the configured number of
//! rounds, prints every round report as a JSON line on stdout, then the
//! final score.

use std::process::ExitCode;

use crossfire_simulation::{
    build_duel_app, init_logger, run_match, DuelConfig, RoundLog, Scoreboard, SimulationError,
};
use tracing::error;

fn main() -> ExitCode {
    // before config loading, so load errors reach the log
    init_logger();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), SimulationError> {
    let config = match std::env::args().nth(1) {
        Some(path) => DuelConfig::load(path)?,
        None => DuelConfig::default(),
    };
    let seed = config.simulation.seed;
    let rounds = config.simulation.rounds;

    let mut app = build_duel_app(config)?;
    tracing::info!("Starting crossfire duel (seed: {}, rounds: {})", seed, rounds);

    let updates = run_match(&mut app);

    let world = app.world();
    if let Some(log) = world.get_resource::<RoundLog>() {
        for report in &log.reports {
            match serde_json::to_string(report) {
                Ok(line) => println!("{}", line),
                Err(err) => error!("failed to serialize round {}: {}", report.round, err),
            }
        }
    }

    if let Some(score) = world.get_resource::<Scoreboard>() {
        println!(
            "crisp {} / fuzzy {} / draws {} ({} ticks)",
            score.crisp_wins, score.fuzzy_wins, score.draws, updates
        );
    }

    Ok(())
}
