//! Controller states shared by both decision makers.

use std::fmt;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Active controller state (exactly one per agent)
///
/// Dead is absorbing: only a round reset brings the agent back to Idle.
#[derive(
    Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize,
)]
#[reflect(Component)]
pub enum AgentState {
    /// Round start; also forced while the target is down
    #[default]
    Idle,
    Shoot,
    Hide,
    MoveToTarget,
    Reload,
    Dead,
}

impl AgentState {
    pub const COUNT: usize = 6;

    /// Index order used by `StateChangeCounts` and raw index conversion
    pub const ALL: [AgentState; Self::COUNT] = [
        AgentState::Idle,
        AgentState::Shoot,
        AgentState::Hide,
        AgentState::MoveToTarget,
        AgentState::Reload,
        AgentState::Dead,
    ];

    pub fn index(self) -> usize {
        match self {
            AgentState::Idle => 0,
            AgentState::Shoot => 1,
            AgentState::Hide => 2,
            AgentState::MoveToTarget => 3,
            AgentState::Reload => 4,
            AgentState::Dead => 5,
        }
    }

    pub fn is_dead(self) -> bool {
        self == AgentState::Dead
    }

    pub fn name(self) -> &'static str {
        match self {
            AgentState::Idle => "Idle",
            AgentState::Shoot => "Shoot",
            AgentState::Hide => "Hide",
            AgentState::MoveToTarget => "MoveToTarget",
            AgentState::Reload => "Reload",
            AgentState::Dead => "Dead",
        }
    }
}

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw state index outside the declared enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("state index {0} is outside 0..{count}", count = AgentState::COUNT)]
pub struct InvalidStateIndex(pub u8);

impl TryFrom<u8> for AgentState {
    type Error = InvalidStateIndex;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        AgentState::ALL
            .get(index as usize)
            .copied()
            .ok_or(InvalidStateIndex(index))
    }
}

/// Per-state transition counters (harness statistics)
///
/// Incremented on entry into a state, so `get(Hide)` is "how many times the
/// agent went into hiding" this round.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChangeCounts {
    counts: [u32; AgentState::COUNT],
}

impl StateChangeCounts {
    pub fn record(&mut self, entered: AgentState) {
        self.counts[entered.index()] += 1;
    }

    pub fn get(&self, state: AgentState) -> u32 {
        self.counts[state.index()]
    }

    /// Lookup by raw index (harness export order). Unknown indices are
    /// logged and reported, nothing is counted.
    pub fn by_index(&self, index: u8) -> Result<u32, InvalidStateIndex> {
        AgentState::try_from(index)
            .map(|state| self.get(state))
            .inspect_err(|err| warn!("state-change lookup rejected: {}", err))
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    pub fn as_array(&self) -> [u32; AgentState::COUNT] {
        self.counts
    }

    pub fn clear(&mut self) {
        self.counts = [0; AgentState::COUNT];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trips_for_every_state() {
        for state in AgentState::ALL {
            assert_eq!(AgentState::try_from(state.index() as u8), Ok(state));
        }
    }

    #[test]
    fn test_out_of_range_index_rejected() {
        assert_eq!(AgentState::try_from(6), Err(InvalidStateIndex(6)));
        assert_eq!(AgentState::try_from(u8::MAX), Err(InvalidStateIndex(255)));
    }

    #[test]
    fn test_counts_record_and_lookup() {
        let mut counts = StateChangeCounts::default();
        counts.record(AgentState::Hide);
        counts.record(AgentState::Hide);
        counts.record(AgentState::Reload);

        assert_eq!(counts.get(AgentState::Hide), 2);
        assert_eq!(counts.by_index(4), Ok(1));
        assert_eq!(counts.by_index(9), Err(InvalidStateIndex(9)));
        assert_eq!(counts.total(), 3);

        counts.clear();
        assert_eq!(counts.total(), 0);
    }
}
