//! Duel instantiation of the fuzzy engine: variables, rule book, inputs.
//!
//! Inputs (in this order):
//! - distance           [0, 20]  close / moderate / far
//! - health             [0, 100] percent of max: low / moderate / high
//! - target_health      [0, 100] same terms
//! - ammo               [0, clip] empty / low / moderate / high (scaled by clip)
//! - can_see_target     [0, 2]   yes / no, fed as 0.5 or 1.5
//! - finished_reloading [0, 2]   yes / no
//! - at_hiding_spot     [0, 2]   yes / no
//!
//! Output `action` on [0, 4]: shoot / hide / move / reload triangles, one per unit band.

use std::collections::HashMap;
use std::sync::Arc;

use crate::ai::brain::ResourceSnapshot;
use crate::ai::AgentState;
use crate::perception::Senses;

use super::{Antecedent, FuzzyError, FuzzyRule, FuzzySystem, LinguisticVariable, MembershipFunction, RuleSet};

pub const DISTANCE: &str = "distance";
pub const HEALTH: &str = "health";
pub const TARGET_HEALTH: &str = "target_health";
pub const AMMO: &str = "ammo";
pub const CAN_SEE_TARGET: &str = "can_see_target";
pub const FINISHED_RELOADING: &str = "finished_reloading";
pub const AT_HIDING_SPOT: &str = "at_hiding_spot";
pub const ACTION: &str = "action";

/// Crisp sample for a true / false signal
const YES: f32 = 0.5;
const NO: f32 = 1.5;

/// One tick's crisp inputs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombatInputs {
    pub distance: f32,
    pub health_percent: f32,
    pub target_health_percent: f32,
    pub ammo: f32,
    pub can_see_target: bool,
    pub finished_reloading: bool,
    pub at_hiding_spot: bool,
}

impl CombatInputs {
    pub fn from_sensed(senses: &Senses, resources: &ResourceSnapshot) -> Self {
        Self {
            distance: senses.distance,
            health_percent: resources.health_percent(),
            target_health_percent: senses.target_health_percent(),
            ammo: resources.ammo as f32,
            can_see_target: senses.can_see_target,
            finished_reloading: resources.finished_reloading,
            at_hiding_spot: resources.at_hiding_spot,
        }
    }

    /// Crisp vector in `FuzzySystem::inputs()` order
    pub fn to_crisp(&self) -> [f32; 7] {
        let flag = |value: bool| if value { YES } else { NO };
        [
            self.distance,
            self.health_percent,
            self.target_health_percent,
            self.ammo,
            flag(self.can_see_target),
            flag(self.finished_reloading),
            flag(self.at_hiding_spot),
        ]
    }
}

/// Immutable state → rule set mapping. Dead has no entry.
#[derive(Debug, Clone, Default)]
pub struct RuleBook {
    sets: HashMap<AgentState, Arc<RuleSet>>,
}

impl RuleBook {
    pub fn get(&self, state: AgentState) -> Option<&Arc<RuleSet>> {
        self.sets.get(&state)
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

/// Engine + rule book, built once and shared between controllers
#[derive(Debug, Clone)]
pub struct FuzzyModel {
    system: FuzzySystem,
    rules: RuleBook,
}

impl FuzzyModel {
    /// Build the duel model for a given clip size
    pub fn combat(ammo_per_clip: u32, resolution: usize) -> Result<Self, FuzzyError> {
        let system = FuzzySystem::new(input_variables(ammo_per_clip)?, action_variable()?, resolution)?;

        let mut sets = HashMap::new();
        for (state, rules) in rule_definitions() {
            let set = system.compile(state.name(), rules)?;
            sets.insert(state, Arc::new(set));
        }

        Ok(Self {
            system,
            rules: RuleBook { sets },
        })
    }

    pub fn system(&self) -> &FuzzySystem {
        &self.system
    }

    pub fn rule_book(&self) -> &RuleBook {
        &self.rules
    }

    /// Crisp action scalar for `inputs`, `None` if no rule fired
    pub fn evaluate(&self, rules: &RuleSet, inputs: &CombatInputs) -> Result<Option<f32>, FuzzyError> {
        self.system.infer(rules, &inputs.to_crisp())
    }
}

fn trapezoid(a: f32, b: f32, c: f32, d: f32) -> Result<MembershipFunction, FuzzyError> {
    MembershipFunction::trapezoid(a, b, c, d)
}

fn flag_variable(name: &str) -> Result<LinguisticVariable, FuzzyError> {
    LinguisticVariable::new(name, 0.0, 2.0)?
        .with_term("yes", trapezoid(0.0, 0.0, 1.0, 1.0)?)?
        .with_term("no", trapezoid(1.0, 1.0, 2.0, 2.0)?)
}

fn health_variable(name: &str) -> Result<LinguisticVariable, FuzzyError> {
    LinguisticVariable::new(name, 0.0, 100.0)?
        .with_term("low", trapezoid(0.0, 0.0, 20.0, 47.0)?)?
        .with_term("moderate", trapezoid(20.0, 40.0, 60.0, 80.0)?)?
        .with_term("high", trapezoid(53.0, 80.0, 100.0, 100.0)?)
}

fn input_variables(ammo_per_clip: u32) -> Result<Vec<LinguisticVariable>, FuzzyError> {
    let clip = ammo_per_clip as f32;

    let distance = LinguisticVariable::new(DISTANCE, 0.0, 20.0)?
        .with_term("close", trapezoid(0.0, 0.0, 3.0, 7.0)?)?
        .with_term("moderate", trapezoid(3.0, 7.0, 10.0, 16.0)?)?
        .with_term("far", trapezoid(12.0, 16.0, 20.0, 20.0)?)?;

    let ammo = LinguisticVariable::new(AMMO, 0.0, clip)?
        .with_term("empty", trapezoid(0.0, 0.0, 0.0, 1.0)?)?
        .with_term("low", trapezoid(0.0, 0.0, 0.3 * clip, 0.5 * clip)?)?
        .with_term("moderate", trapezoid(0.3 * clip, 0.5 * clip, 0.6 * clip, 0.8 * clip)?)?
        .with_term("high", trapezoid(0.6 * clip, 0.8 * clip, clip, clip)?)?;

    Ok(vec![
        distance,
        health_variable(HEALTH)?,
        health_variable(TARGET_HEALTH)?,
        ammo,
        flag_variable(CAN_SEE_TARGET)?,
        flag_variable(FINISHED_RELOADING)?,
        flag_variable(AT_HIDING_SPOT)?,
    ])
}

fn action_variable() -> Result<LinguisticVariable, FuzzyError> {
    LinguisticVariable::new(ACTION, 0.0, 4.0)?
        .with_term("shoot", MembershipFunction::triangle(0.0, 0.5, 1.0)?)?
        .with_term("hide", MembershipFunction::triangle(1.0, 1.5, 2.0)?)?
        .with_term("move", MembershipFunction::triangle(2.0, 2.5, 3.0)?)?
        .with_term("reload", MembershipFunction::triangle(3.0, 3.5, 4.0)?)
}

fn is(variable: &str, term: &str) -> Antecedent {
    Antecedent::is(variable, term)
}

fn is_not(variable: &str, term: &str) -> Antecedent {
    Antecedent::is_not(variable, term)
}

/// Per-state rules
fn rule_definitions() -> Vec<(AgentState, Vec<FuzzyRule>)> {
    let sees = || is(CAN_SEE_TARGET, "yes");
    let blind = || is(CAN_SEE_TARGET, "no");
    let far = || is(DISTANCE, "far");
    let not_far = || is_not(DISTANCE, "far");
    let not_close = || is_not(DISTANCE, "close");
    let hurt = || is(HEALTH, "low");
    let armed = || is_not(AMMO, "empty");
    let empty = || is(AMMO, "empty");
    let finished = || is(FINISHED_RELOADING, "yes");

    vec![
        (
            AgentState::Idle,
            vec![
                not_far().and(sees()).and(armed()).then("shoot"),
                far().or(blind()).then("move"),
                hurt().and(not_close()).then("hide"),
            ],
        ),
        (
            AgentState::Shoot,
            vec![
                far().or(blind()).then("move"),
                hurt().and(not_close()).then("hide"),
                is(AMMO, "low").and(blind()).or(far()).then("reload"),
                empty().and(sees()).then("hide"),
            ],
        ),
        (
            AgentState::Hide,
            vec![
                is(TARGET_HEALTH, "low").and(not_close()).then("move"),
                is(DISTANCE, "close").and(sees()).and(armed()).then("shoot"),
                is(AMMO, "low").and(blind()).or(far()).then("reload"),
                empty().and(is(AT_HIDING_SPOT, "yes")).then("reload"),
            ],
        ),
        (
            AgentState::MoveToTarget,
            vec![
                not_far().and(sees()).and(armed()).then("shoot"),
                hurt()
                    .and(not_close())
                    .and(is_not(TARGET_HEALTH, "low"))
                    .then("hide"),
                empty().and(blind()).then("reload"),
                empty().and(sees()).then("hide"),
            ],
        ),
        (
            AgentState::Reload,
            vec![
                finished().and(far().or(blind())).then("move"),
                finished().and(not_far()).and(sees()).then("shoot"),
                sees().and(hurt().or(is(FINISHED_RELOADING, "no"))).then("hide"),
            ],
        ),
    ]
}
