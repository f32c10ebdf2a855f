//! Agent components: Agent, ControllerKind, Health, Opponent, SpawnPoint

use std::fmt;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ai::{AgentState, StateChangeCounts};
use crate::combat::{ShotStats, Weapon};
use crate::components::Navigation;
use crate::perception::Senses;

/// Which decision paradigm drives an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerKind {
    #[default]
    Crisp,
    Fuzzy,
}

impl fmt::Display for ControllerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerKind::Crisp => f.write_str("crisp"),
            ControllerKind::Fuzzy => f.write_str("fuzzy"),
        }
    }
}

/// Combat agent
///
/// Required Components bring the whole resource model with it: Health,
/// Weapon, AgentState, StateChangeCounts, ShotStats, Senses, Navigation.
/// The controller itself (`Brain`) and `Opponent` are wired by the arena.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(
    Health,
    Weapon,
    AgentState,
    StateChangeCounts,
    ShotStats,
    Senses,
    Navigation,
    Transform
)]
pub struct Agent {
    pub controller: ControllerKind,
}

/// Health
///
/// Invariant: 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    /// Saturates at 0
    pub fn take_damage(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }

    pub fn restore(&mut self) {
        self.current = self.max;
    }
}

/// The opposing agent (read-only, except through damage events)
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opponent(pub Entity);

/// Round-start position restored on reset
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub struct SpawnPoint(pub Vec3);
