//! Fuzzy controller: installed rule set + action band mapping.
//!
//! Output bands, half-open on the lower bound:
//! `[0,1)` Shoot, `[1,2)` Hide, `[2,3)` MoveToTarget, `[3,4)` Reload.
//! Anything else (including "no rule fired") is a Hold: the current state is kept.

use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::ai::brain::{DecisionMaker, ResourceSnapshot};
use crate::ai::AgentState;
use crate::perception::Senses;

use super::{CombatInputs, FuzzyError, FuzzyModel, RuleSet};

/// Why inference produced no action
#[derive(Debug, Clone, PartialEq)]
pub enum HoldReason {
    /// State has no rule set (Dead)
    NoRules,
    /// Zero-area envelope
    NoRuleFired,
    /// Centroid outside [0, 4)
    OutOfDomain(f32),
    InvalidInput(FuzzyError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FuzzyDecision {
    Act(AgentState),
    Hold(HoldReason),
}

/// Band lookup for a defuzzified scalar
pub fn action_for_output(output: f32) -> Option<AgentState> {
    if !(0.0..4.0).contains(&output) {
        return None;
    }
    match output.floor() as u8 {
        0 => Some(AgentState::Shoot),
        1 => Some(AgentState::Hide),
        2 => Some(AgentState::MoveToTarget),
        3 => Some(AgentState::Reload),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct FuzzyController {
    model: Arc<FuzzyModel>,
    installed_for: AgentState,
    rules: Option<Arc<RuleSet>>,
    shooting_range: f32,
    last_output: Option<f32>,
}

impl FuzzyController {
    /// New controller with the Idle rule set installed
    pub fn new(model: Arc<FuzzyModel>, shooting_range: f32) -> Self {
        let rules = model.rule_book().get(AgentState::Idle).cloned();
        Self {
            model,
            installed_for: AgentState::Idle,
            rules,
            shooting_range,
            last_output: None,
        }
    }

    /// Swap in the rule set for `state`; no-op if it is already installed
    pub fn install(&mut self, state: AgentState) -> bool {
        if self.installed_for == state {
            return false;
        }
        self.installed_for = state;
        self.rules = self.model.rule_book().get(state).cloned();
        debug!(
            "🧠 fuzzy rules installed: {} ({} rules)",
            state,
            self.rules.as_ref().map_or(0, |set| set.len())
        );
        true
    }

    pub fn installed_state(&self) -> AgentState {
        self.installed_for
    }

    pub fn installed_rules(&self) -> Option<&RuleSet> {
        self.rules.as_deref()
    }

    /// Last defuzzified scalar (None if nothing fired)
    pub fn last_output(&self) -> Option<f32> {
        self.last_output
    }

    /// Crisp output of the installed rule set
    pub fn infer(&self, senses: &Senses, resources: &ResourceSnapshot) -> Result<Option<f32>, FuzzyError> {
        match &self.rules {
            Some(rules) => self
                .model
                .evaluate(rules, &CombatInputs::from_sensed(senses, resources)),
            None => Ok(None),
        }
    }

    /// Run inference and map the result onto an action
    pub fn evaluate(&self, senses: &Senses, resources: &ResourceSnapshot) -> FuzzyDecision {
        if self.rules.is_none() {
            return FuzzyDecision::Hold(HoldReason::NoRules);
        }
        decision_for(self.infer(senses, resources))
    }
}

fn decision_for(inferred: Result<Option<f32>, FuzzyError>) -> FuzzyDecision {
    match inferred {
        Err(err) => FuzzyDecision::Hold(HoldReason::InvalidInput(err)),
        Ok(None) => FuzzyDecision::Hold(HoldReason::NoRuleFired),
        Ok(Some(output)) => match action_for_output(output) {
            Some(action) => FuzzyDecision::Act(action),
            None => FuzzyDecision::Hold(HoldReason::OutOfDomain(output)),
        },
    }
}

impl DecisionMaker for FuzzyController {
    fn propose(
        &mut self,
        state: AgentState,
        senses: &Senses,
        resources: &ResourceSnapshot,
    ) -> AgentState {
        self.install(state);
        if self.rules.is_none() {
            return state;
        }
        let inferred = self.infer(senses, resources);
        self.last_output = inferred.as_ref().ok().copied().flatten();

        match decision_for(inferred) {
            FuzzyDecision::Act(next) => next,
            FuzzyDecision::Hold(HoldReason::InvalidInput(err)) => {
                warn!("fuzzy inference rejected inputs in {}: {}", state, err);
                state
            }
            FuzzyDecision::Hold(reason) => {
                trace!("fuzzy hold in {}: {:?}", state, reason);
                state
            }
        }
    }

    fn on_enter(&mut self, state: AgentState) {
        self.install(state);
    }

    fn shooting_range(&self) -> f32 {
        self.shooting_range
    }
}
