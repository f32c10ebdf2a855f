//! Crisp (threshold) state machine
//!
//! Each state maps to a pure transition function
//! `(sensed values, resource snapshot) -> next state`.
//!
//! Transitions are written as ordered priority lists: every entry is checked
//! and the LAST satisfied entry wins, so a later row overrides an earlier one
//! evaluated on the same tick. No satisfied entry keeps the current state.
//!
//! Predicates:
//! - in range     → `distance <= dist_to_start_shooting` (shared `Senses` predicate)
//! - target close → `distance < dist_to_hide`
//! - low health   → `health <= low_health` (raw hit points)

use serde::{Deserialize, Serialize};

use crate::ai::brain::{DecisionMaker, ResourceSnapshot};
use crate::ai::AgentState;
use crate::perception::Senses;

/// Thresholds for the crisp controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrispThresholds {
    /// Distance at (or below) which the agent starts shooting
    pub dist_to_start_shooting: f32,
    /// Target closer than this is "close" (hiding is pointless)
    pub dist_to_hide: f32,
    pub low_health: u32,
    pub low_ammo: u32,
}

impl Default for CrispThresholds {
    fn default() -> Self {
        Self {
            dist_to_start_shooting: 7.0,
            dist_to_hide: 10.0,
            low_health: 30,
            low_ammo: 3,
        }
    }
}

/// Boolean view of one tick, derived once and shared by every row
#[derive(Debug, Clone, Copy)]
struct Situation {
    see: bool,
    in_range: bool,
    target_close: bool,
    own_low: bool,
    target_low: bool,
    has_ammo: bool,
    ammo_low: bool,
    finished_reloading: bool,
    at_spot: bool,
    target_alive: bool,
}

impl Situation {
    fn new(senses: &Senses, resources: &ResourceSnapshot, t: &CrispThresholds) -> Self {
        Self {
            see: senses.can_see_target,
            in_range: senses.in_shooting_range(t.dist_to_start_shooting),
            target_close: senses.distance < t.dist_to_hide,
            own_low: resources.health <= t.low_health,
            target_low: senses.target_health <= t.low_health,
            has_ammo: resources.ammo > 0,
            ammo_low: resources.ammo <= t.low_ammo,
            finished_reloading: resources.finished_reloading,
            at_spot: resources.at_hiding_spot,
            target_alive: senses.target_alive(),
        }
    }
}

/// Last satisfied `(condition, next)` entry, or `current`
fn last_satisfied(current: AgentState, rows: &[(bool, AgentState)]) -> AgentState {
    rows.iter()
        .rev()
        .find(|(holds, _)| *holds)
        .map(|(_, next)| *next)
        .unwrap_or(current)
}

fn from_idle(s: &Situation) -> AgentState {
    if !s.target_alive {
        return AgentState::Idle;
    }
    last_satisfied(
        AgentState::Idle,
        &[
            (!s.see || !s.in_range, AgentState::MoveToTarget),
            (s.see && s.in_range && s.has_ammo, AgentState::Shoot),
            (s.own_low && !s.target_close, AgentState::Hide),
        ],
    )
}

fn from_shoot(s: &Situation) -> AgentState {
    let lost_target = !s.see || !s.in_range;
    last_satisfied(
        AgentState::Shoot,
        &[
            (lost_target, AgentState::MoveToTarget),
            (lost_target && s.ammo_low, AgentState::Reload),
            (
                (s.own_low && !s.target_close && !s.target_low) || !s.has_ammo,
                AgentState::Hide,
            ),
        ],
    )
}

fn from_move(s: &Situation) -> AgentState {
    last_satisfied(
        AgentState::MoveToTarget,
        &[
            (s.in_range && s.see && s.has_ammo, AgentState::Shoot),
            (s.own_low && !s.target_close && !s.target_low, AgentState::Hide),
        ],
    )
}

fn from_hide(s: &Situation) -> AgentState {
    last_satisfied(
        AgentState::Hide,
        &[
            (s.has_ammo && (!s.see || !s.target_low), AgentState::MoveToTarget),
            (s.has_ammo && s.see && s.target_low && s.in_range, AgentState::Shoot),
            (!s.has_ammo && s.at_spot, AgentState::Reload),
        ],
    )
}

fn from_reload(s: &Situation) -> AgentState {
    let engage = s.in_range && s.see;
    last_satisfied(
        AgentState::Reload,
        &[
            (s.finished_reloading && !engage, AgentState::MoveToTarget),
            (s.finished_reloading && engage, AgentState::Shoot),
            // spotted mid-reload: break off and take cover
            (s.see && !s.finished_reloading, AgentState::Hide),
        ],
    )
}

/// Pure crisp transition (before the vital overrides)
pub fn transition(
    state: AgentState,
    senses: &Senses,
    resources: &ResourceSnapshot,
    thresholds: &CrispThresholds,
) -> AgentState {
    let situation = Situation::new(senses, resources, thresholds);
    match state {
        AgentState::Idle => from_idle(&situation),
        AgentState::Shoot => from_shoot(&situation),
        AgentState::MoveToTarget => from_move(&situation),
        AgentState::Hide => from_hide(&situation),
        AgentState::Reload => from_reload(&situation),
        AgentState::Dead => AgentState::Dead,
    }
}

/// Crisp controller: stateless apart from its thresholds
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrispController {
    pub thresholds: CrispThresholds,
}

impl CrispController {
    pub fn new(thresholds: CrispThresholds) -> Self {
        Self { thresholds }
    }
}

impl DecisionMaker for CrispController {
    fn propose(
        &mut self,
        state: AgentState,
        senses: &Senses,
        resources: &ResourceSnapshot,
    ) -> AgentState {
        transition(state, senses, resources, &self.thresholds)
    }

    fn shooting_range(&self) -> f32 {
        self.thresholds.dist_to_start_shooting
    }
}
