//! Mamdani fuzzy inference
//!
//! Pipeline (each step callable on its own):
//! 1. `FuzzySystem::fuzzify`         crisp inputs → degrees per term
//! 2. `FuzzySystem::firing_strength` AND=min, OR=max, NOT=1-x
//! 3. `FuzzySystem::aggregate`       clip consequents, pointwise max envelope
//! 4. `Envelope::centroid`           center of area → one crisp scalar
//!
//! `combat_model` instantiates the engine for the duel (variables + rule book),
//! `controller` maps the scalar back onto `AgentState`.

use thiserror::Error;

pub mod combat_model;
pub mod controller;
pub mod engine;
pub mod membership;
pub mod rule;
pub mod variable;

#[cfg(test)]
mod fuzzy_tests;

pub use combat_model::{CombatInputs, FuzzyModel, RuleBook};
pub use controller::{action_for_output, FuzzyController, FuzzyDecision, HoldReason};
pub use engine::{Envelope, Fuzzified, FuzzySystem};
pub use membership::MembershipFunction;
pub use rule::{Antecedent, FuzzyRule, RuleSet};
pub use variable::LinguisticVariable;

/// Errors raised while building a fuzzy system or feeding it inputs
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FuzzyError {
    #[error("membership points must be finite: {0:?}")]
    NonFinitePoints(Vec<f32>),

    #[error("membership points must be non-decreasing: {0:?}")]
    NotMonotone(Vec<f32>),

    #[error("membership function has zero width: {0:?}")]
    ZeroWidth(Vec<f32>),

    #[error("variable `{0}` has an empty or non-finite domain")]
    InvalidDomain(String),

    #[error("variable `{variable}` defines term `{term}` twice")]
    DuplicateTerm { variable: String, term: String },

    #[error("variable `{0}` is declared twice")]
    DuplicateVariable(String),

    #[error("unknown variable `{0}`")]
    UnknownVariable(String),

    #[error("variable `{variable}` has no term `{term}`")]
    UnknownTerm { variable: String, term: String },

    #[error("expected {expected} crisp inputs, got {got}")]
    InputArity { expected: usize, got: usize },

    #[error("crisp input for `{0}` is not finite")]
    NonFiniteInput(String),

    #[error("output resolution must be > 0")]
    ZeroResolution,
}
