//! Duel configuration (TOML)
//!
//! Defaults reproduce the reference arena: 100 HP, 10-round clips,
//! 50% hit chance, 0.2s between shots, crisp agent reloads in 3s and
//! fuzzy agent in 2s.
//!
//! ```toml
//! [simulation]
//! seed = 7
//! rounds = 20
//!
//! [crisp_thresholds]
//! dist_to_start_shooting = 7.0
//! ```

use std::path::Path;
use std::time::Duration;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ai::crisp::CrispThresholds;
use crate::error::SimulationError;

/// Root config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Resource)]
#[serde(default)]
pub struct DuelConfig {
    pub simulation: SimulationSettings,
    pub arena: ArenaSettings,
    pub crisp: AgentProfile,
    pub fuzzy: AgentProfile,
    pub crisp_thresholds: CrispThresholds,
    pub fuzzy_engine: FuzzyEngineSettings,
}

/// Tick rate, RNG seed, match length
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    pub tick_hz: f64,
    pub seed: u64,
    pub rounds: u32,
    /// Round is recorded as a draw after this many ticks
    pub max_ticks_per_round: u64,
}

/// Upper bound for `max_ticks_per_round` (about 19 days at 60 Hz)
pub const MAX_TICKS_PER_ROUND: u64 = 100_000_000;

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            tick_hz: 60.0,
            seed: 42,
            rounds: 10,
            max_ticks_per_round: 36_000, // 10 min @ 60Hz
        }
    }
}

impl SimulationSettings {
    pub fn tick(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_hz)
    }
}

/// Axis-aligned box obstruction (rapier cuboid)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSpec {
    pub center: [f32; 3],
    pub half_extents: [f32; 3],
}

/// World geometry: spawns, obstructions, hiding spots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaSettings {
    pub crisp_spawn: [f32; 3],
    pub fuzzy_spawn: [f32; 3],
    /// Line-of-sight rays start this far above the agent's feet
    pub eye_height: f32,
    pub obstacles: Vec<ObstacleSpec>,
    pub hiding_spots: Vec<[f32; 3]>,
    /// Distance at which a navigation destination counts as reached
    pub arrival_radius: f32,
    /// Navigation speed (m/s)
    pub move_speed: f32,
}

impl Default for ArenaSettings {
    fn default() -> Self {
        Self {
            crisp_spawn: [-12.0, 0.0, 0.0],
            fuzzy_spawn: [12.0, 0.0, 0.0],
            eye_height: 1.0,
            // cover sits off the spawn line: agents start in sight of each other
            obstacles: vec![
                ObstacleSpec {
                    center: [0.0, 1.0, 5.0],
                    half_extents: [1.5, 1.5, 1.5],
                },
                ObstacleSpec {
                    center: [0.0, 1.0, -5.0],
                    half_extents: [1.5, 1.5, 1.5],
                },
                ObstacleSpec {
                    center: [-8.0, 1.0, 4.0],
                    half_extents: [1.5, 1.5, 0.5],
                },
                ObstacleSpec {
                    center: [8.0, 1.0, -4.0],
                    half_extents: [1.5, 1.5, 0.5],
                },
            ],
            hiding_spots: vec![
                [0.0, 0.0, 7.5],
                [0.0, 0.0, -7.5],
                [-8.0, 0.0, 5.5],
                [8.0, 0.0, -5.5],
            ],
            arrival_radius: 0.5,
            move_speed: 3.5,
        }
    }
}

/// Combat resource model parameters for one agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentProfile {
    pub max_health: u32,
    pub ammo_per_clip: u32,
    pub bullet_damage: u32,
    /// Chance in [0, 1] that a fired round hits
    pub hit_chance: f64,
    pub shot_interval_secs: f32,
    pub reload_time_secs: f32,
}

impl Default for AgentProfile {
    fn default() -> Self {
        Self {
            max_health: 100,
            ammo_per_clip: 10,
            bullet_damage: 10,
            hit_chance: 0.5,
            shot_interval_secs: 0.2,
            reload_time_secs: 3.0,
        }
    }
}

impl AgentProfile {
    pub fn shot_interval(&self) -> Duration {
        secs_to_duration(self.shot_interval_secs)
    }

    pub fn reload_time(&self) -> Duration {
        secs_to_duration(self.reload_time_secs)
    }

    fn validate(&self, section: &'static str) -> Result<(), SimulationError> {
        if self.max_health == 0 {
            return Err(invalid(section, "max_health must be > 0"));
        }
        if self.ammo_per_clip == 0 {
            return Err(invalid(section, "ammo_per_clip must be > 0"));
        }
        if !(0.0..=1.0).contains(&self.hit_chance) {
            return Err(invalid(section, "hit_chance must be within [0, 1]"));
        }
        if !non_negative(self.shot_interval_secs) || !non_negative(self.reload_time_secs) {
            return Err(invalid(section, "timers must be finite and >= 0"));
        }
        Ok(())
    }
}

/// Fuzzy inference engine parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuzzyEngineSettings {
    /// Number of samples over the output domain used for the centroid
    pub resolution: usize,
    /// Maximum firing distance while in Shoot (where `distance is far` starts)
    pub shooting_range: f32,
}

impl Default for FuzzyEngineSettings {
    fn default() -> Self {
        Self {
            resolution: 400,
            shooting_range: 12.0,
        }
    }
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationSettings::default(),
            arena: ArenaSettings::default(),
            crisp: AgentProfile::default(),
            fuzzy: AgentProfile {
                reload_time_secs: 2.0,
                ..AgentProfile::default()
            },
            crisp_thresholds: CrispThresholds::default(),
            fuzzy_engine: FuzzyEngineSettings::default(),
        }
    }
}

impl DuelConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, SimulationError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimulationError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| SimulationError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SimulationError> {
        if !(self.simulation.tick_hz.is_finite() && self.simulation.tick_hz > 0.0) {
            return Err(invalid("simulation.tick_hz", "must be finite and > 0"));
        }
        if self.simulation.rounds == 0 {
            return Err(invalid("simulation.rounds", "must be > 0"));
        }
        if !(1..=MAX_TICKS_PER_ROUND).contains(&self.simulation.max_ticks_per_round) {
            return Err(invalid("simulation.max_ticks_per_round", "must be within 1..=100000000"));
        }

        let arena = &self.arena;
        if !non_negative(arena.eye_height)
            || !non_negative(arena.arrival_radius)
            || !non_negative(arena.move_speed)
        {
            return Err(invalid("arena", "eye_height, arrival_radius and move_speed must be finite and >= 0"));
        }
        for obstacle in &arena.obstacles {
            if obstacle.half_extents.iter().any(|&e| !(e.is_finite() && e > 0.0)) {
                return Err(invalid("arena.obstacles", "half_extents must be finite and > 0"));
            }
        }

        self.crisp.validate("crisp")?;
        self.fuzzy.validate("fuzzy")?;

        let t = &self.crisp_thresholds;
        if !non_negative(t.dist_to_start_shooting) || !non_negative(t.dist_to_hide) {
            return Err(invalid("crisp_thresholds", "distances must be finite and >= 0"));
        }

        if self.fuzzy_engine.resolution == 0 {
            return Err(invalid("fuzzy_engine.resolution", "must be > 0"));
        }
        if !non_negative(self.fuzzy_engine.shooting_range) {
            return Err(invalid("fuzzy_engine.shooting_range", "must be finite and >= 0"));
        }
        Ok(())
    }
}

/// Whole microseconds, so 0.2 is exactly 200ms and not 200.000003ms
fn secs_to_duration(secs: f32) -> Duration {
    Duration::from_micros((secs as f64 * 1_000_000.0).round() as u64)
}

fn non_negative(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}

fn invalid(field: &'static str, reason: &str) -> SimulationError {
    SimulationError::InvalidConfig {
        field,
        reason: reason.to_string(),
    }
}
