//! Combat resource model
//!
//! ECS responsibility:
//! - Game state: Health, Weapon (clip, cooldown, reload), ShotStats
//! - Combat rules: fire permission, hit roll, damage clamping, death
//! - Events: ShotHit, DamageDealt, AgentDied, RoundDecided
//!
//! Firing itself is an action of the Shoot state (see `ai::actions`);
//! this module owns everything after the trigger is pulled.

use bevy::prelude::*;

pub mod damage;
pub mod weapon;


pub use damage::{apply_damage, apply_shot_hits, AgentDied, DamageDealt, DamageReport, RoundDecided, ShotHit};
pub use weapon::{tick_weapon_cooldowns, Shot, ShotStats, Weapon};

use crate::DuelSet;

/// Combat Plugin
///
/// Registers combat systems in FixedUpdate.
///
/// Order of execution (via `DuelSet`):
/// 1. tick_weapon_cooldowns: shot cooldown countdown (DuelSet::Weapons)
/// 2. (controllers fire → ShotHit)
/// 3. apply_shot_hits: damage, death, round outcome (DuelSet::Resolve)
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ShotHit>()
            .add_event::<DamageDealt>()
            .add_event::<AgentDied>()
            .add_event::<RoundDecided>()
            .add_systems(FixedUpdate, tick_weapon_cooldowns.in_set(DuelSet::Weapons))
            .add_systems(FixedUpdate, apply_shot_hits.in_set(DuelSet::Resolve));
    }
}
