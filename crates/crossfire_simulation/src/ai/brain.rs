//! Decision makers and the per-agent `Brain` component.
//!
//! Both controllers sit behind `DecisionMaker`; `Brain` is the tagged union
//! stored on the agent and dispatched once per tick by `run_controllers`.

use bevy::prelude::*;

use crate::ai::crisp::CrispController;
use crate::ai::fuzzy::FuzzyController;
use crate::ai::AgentState;
use crate::combat::Weapon;
use crate::components::{ControllerKind, Health, Navigation};
use crate::perception::Senses;

/// Own resource state as seen by a controller this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceSnapshot {
    pub health: u32,
    pub max_health: u32,
    pub ammo: u32,
    pub ammo_per_clip: u32,
    pub finished_reloading: bool,
    pub at_hiding_spot: bool,
}

impl ResourceSnapshot {
    pub fn capture(health: &Health, weapon: &Weapon, navigation: &Navigation) -> Self {
        Self {
            health: health.current,
            max_health: health.max,
            ammo: weapon.ammo,
            ammo_per_clip: weapon.ammo_per_clip,
            finished_reloading: weapon.finished_reloading(),
            at_hiding_spot: navigation.at_hiding_spot,
        }
    }

    /// Own health as percent of max (fuzzy input scale)
    pub fn health_percent(&self) -> f32 {
        if self.max_health == 0 {
            return 0.0;
        }
        self.health as f32 * 100.0 / self.max_health as f32
    }
}

/// A controller paradigm
pub trait DecisionMaker {
    /// Next state proposed from the current one. Returning `state` means "stay".
    fn propose(
        &mut self,
        state: AgentState,
        senses: &Senses,
        resources: &ResourceSnapshot,
    ) -> AgentState;

    /// Called after a transition into `state`
    fn on_enter(&mut self, _state: AgentState) {}

    /// Maximum distance at which Shoot may fire
    fn shooting_range(&self) -> f32;
}

/// Overrides applied after every proposal, in order:
/// 1. target down → Idle
/// 2. own health down → Dead (wins)
pub fn apply_vital_overrides(proposed: AgentState, own_health: u32, target_health: u32) -> AgentState {
    let mut next = proposed;
    if target_health == 0 {
        next = AgentState::Idle;
    }
    if own_health == 0 {
        next = AgentState::Dead;
    }
    next
}

/// Controller attached to an agent
#[derive(Component, Debug)]
pub enum Brain {
    Crisp(CrispController),
    Fuzzy(FuzzyController),
}

impl Brain {
    pub fn kind(&self) -> ControllerKind {
        match self {
            Brain::Crisp(_) => ControllerKind::Crisp,
            Brain::Fuzzy(_) => ControllerKind::Fuzzy,
        }
    }

    fn maker(&mut self) -> &mut dyn DecisionMaker {
        match self {
            Brain::Crisp(crisp) => crisp,
            Brain::Fuzzy(fuzzy) => fuzzy,
        }
    }

    /// Full decision for one tick: Dead short-circuits, otherwise the
    /// controller proposes and the vital overrides get the last word.
    pub fn decide(
        &mut self,
        state: AgentState,
        senses: &Senses,
        resources: &ResourceSnapshot,
    ) -> AgentState {
        if state.is_dead() {
            return AgentState::Dead;
        }
        let proposed = self.maker().propose(state, senses, resources);
        apply_vital_overrides(proposed, resources.health, senses.target_health)
    }

    pub fn on_enter(&mut self, state: AgentState) {
        self.maker().on_enter(state);
    }

    pub fn shooting_range(&self) -> f32 {
        match self {
            Brain::Crisp(crisp) => crisp.shooting_range(),
            Brain::Fuzzy(fuzzy) => fuzzy.shooting_range(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dead_wins_over_target_down() {
        assert_eq!(apply_vital_overrides(AgentState::Shoot, 0, 0), AgentState::Dead);
        assert_eq!(apply_vital_overrides(AgentState::Shoot, 40, 0), AgentState::Idle);
        assert_eq!(apply_vital_overrides(AgentState::Hide, 40, 10), AgentState::Hide);
    }

    #[test]
    fn test_health_percent() {
        let snapshot = ResourceSnapshot {
            health: 44,
            max_health: 80,
            ammo: 0,
            ammo_per_clip: 10,
            finished_reloading: true,
            at_hiding_spot: false,
        };
        assert_eq!(snapshot.health_percent(), 55.0);
    }
}
