//! Rule antecedents, rules and compiled rule sets.
//!
//! Rules are written against variable / term NAMES:
//!
//! ```ignore
//! Antecedent::is("distance", "far").or(Antecedent::is("can_see_target", "no")).then("move")
//! ```
//!
//! `FuzzySystem::compile` resolves the names into indices once, producing an
//! immutable `RuleSet`. Evaluation never touches the membership functions.

use super::engine::Fuzzified;

/// Boolean combination of `(variable, term, negated?)` atoms
#[derive(Debug, Clone, PartialEq)]
pub enum Antecedent {
    Is { variable: String, term: String },
    IsNot { variable: String, term: String },
    And(Box<Antecedent>, Box<Antecedent>),
    Or(Box<Antecedent>, Box<Antecedent>),
}

impl Antecedent {
    pub fn is(variable: impl Into<String>, term: impl Into<String>) -> Self {
        Self::Is {
            variable: variable.into(),
            term: term.into(),
        }
    }

    pub fn is_not(variable: impl Into<String>, term: impl Into<String>) -> Self {
        Self::IsNot {
            variable: variable.into(),
            term: term.into(),
        }
    }

    pub fn and(self, other: Antecedent) -> Self {
        Self::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Antecedent) -> Self {
        Self::Or(Box::new(self), Box::new(other))
    }

    /// Finish the rule with an output term
    pub fn then(self, consequent: impl Into<String>) -> FuzzyRule {
        FuzzyRule {
            antecedent: self,
            consequent: consequent.into(),
        }
    }
}

/// IF antecedent THEN output IS consequent
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyRule {
    pub antecedent: Antecedent,
    pub consequent: String,
}

/// Antecedent with names resolved to `(variable, term)` indices
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Condition {
    Is { variable: usize, term: usize },
    IsNot { variable: usize, term: usize },
    And(Box<Condition>, Box<Condition>),
    Or(Box<Condition>, Box<Condition>),
}

impl Condition {
    pub(crate) fn strength(&self, fuzzified: &Fuzzified) -> f32 {
        match self {
            Condition::Is { variable, term } => fuzzified.degree(*variable, *term),
            Condition::IsNot { variable, term } => 1.0 - fuzzified.degree(*variable, *term),
            Condition::And(lhs, rhs) => lhs.strength(fuzzified).min(rhs.strength(fuzzified)),
            Condition::Or(lhs, rhs) => lhs.strength(fuzzified).max(rhs.strength(fuzzified)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompiledRule {
    pub(crate) condition: Condition,
    /// Output term index
    pub(crate) consequent: usize,
    source: FuzzyRule,
}

impl CompiledRule {
    pub(crate) fn new(condition: Condition, consequent: usize, source: FuzzyRule) -> Self {
        Self {
            condition,
            consequent,
            source,
        }
    }

    pub fn source(&self) -> &FuzzyRule {
        &self.source
    }
}

/// Immutable, labelled list of compiled rules
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    label: String,
    rules: Vec<CompiledRule>,
}

impl RuleSet {
    pub(crate) fn new(label: String, rules: Vec<CompiledRule>) -> Self {
        Self { label, rules }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
