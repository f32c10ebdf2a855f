//! AI decision-making module
//!
//! Two competing controllers over the same six states:
//! - crisp: ordered threshold tables (`crisp`)
//! - fuzzy: Mamdani inference over per-state rule sets (`fuzzy`)
//!
//! Both are pure `(sensed values, resources) -> next state` functions behind
//! `DecisionMaker`; `Brain` dispatches to whichever the agent carries.

use bevy::prelude::*;

pub mod actions;
pub mod brain;
pub mod crisp;
pub mod fuzzy;
pub mod state;
pub mod systems;


pub use brain::{apply_vital_overrides, Brain, DecisionMaker, ResourceSnapshot};
pub use crisp::{CrispController, CrispThresholds};
pub use fuzzy::{FuzzyController, FuzzyDecision, FuzzyModel};
pub use state::{AgentState, InvalidStateIndex, StateChangeCounts};
pub use systems::run_controllers;

use crate::DuelSet;

/// AI Plugin
///
/// Registers the controller pass in FixedUpdate (DuelSet::Decide), after
/// perception and weapon timers, before damage resolution.
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<AgentState>()
            .add_systems(FixedUpdate, run_controllers.in_set(DuelSet::Decide));
    }
}
