//! Inference engine: fuzzify → fire rules → aggregate → centroid.

use std::collections::HashSet;

use super::rule::{CompiledRule, Condition};
use super::{Antecedent, FuzzyError, FuzzyRule, LinguisticVariable, RuleSet};

/// Degrees of truth for every `(input variable, term)` pair
#[derive(Debug, Clone, PartialEq)]
pub struct Fuzzified {
    degrees: Vec<Vec<f32>>,
}

impl Fuzzified {
    /// Out-of-range indices read as 0 (compiled rules never produce them)
    pub fn degree(&self, variable: usize, term: usize) -> f32 {
        self.degrees
            .get(variable)
            .and_then(|terms| terms.get(term))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn variable(&self, variable: usize) -> &[f32] {
        self.degrees.get(variable).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Aggregated output membership sampled at bin midpoints
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    start: f32,
    step: f32,
    samples: Vec<f32>,
}

impl Envelope {
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Output-domain position of sample `i`
    pub fn x_at(&self, i: usize) -> f32 {
        self.start + (i as f32 + 0.5) * self.step
    }

    pub fn area(&self) -> f32 {
        self.samples.iter().sum::<f32>() * self.step
    }

    /// Center of area, `None` when nothing fired (zero area)
    pub fn centroid(&self) -> Option<f32> {
        let mut weighted = 0.0_f64;
        let mut total = 0.0_f64;
        for (i, &y) in self.samples.iter().enumerate() {
            weighted += self.x_at(i) as f64 * y as f64;
            total += y as f64;
        }
        if total <= f64::EPSILON {
            return None;
        }
        Some((weighted / total) as f32)
    }
}

/// Input variables + one output variable + sampling resolution
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzySystem {
    inputs: Vec<LinguisticVariable>,
    output: LinguisticVariable,
    resolution: usize,
}

impl FuzzySystem {
    pub fn new(
        inputs: Vec<LinguisticVariable>,
        output: LinguisticVariable,
        resolution: usize,
    ) -> Result<Self, FuzzyError> {
        if resolution == 0 {
            return Err(FuzzyError::ZeroResolution);
        }
        let mut seen = HashSet::new();
        for var in inputs.iter().chain(std::iter::once(&output)) {
            if !seen.insert(var.name()) {
                return Err(FuzzyError::DuplicateVariable(var.name().to_string()));
            }
        }
        Ok(Self {
            inputs,
            output,
            resolution,
        })
    }

    pub fn inputs(&self) -> &[LinguisticVariable] {
        &self.inputs
    }

    pub fn output(&self) -> &LinguisticVariable {
        &self.output
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn input_index(&self, name: &str) -> Option<usize> {
        self.inputs.iter().position(|var| var.name() == name)
    }

    /// Resolve rule names against this system's variables
    pub fn compile(
        &self,
        label: impl Into<String>,
        rules: impl IntoIterator<Item = FuzzyRule>,
    ) -> Result<RuleSet, FuzzyError> {
        let compiled = rules
            .into_iter()
            .map(|rule| {
                let condition = self.resolve(&rule.antecedent)?;
                let consequent = self.output.term_index(&rule.consequent).ok_or_else(|| {
                    FuzzyError::UnknownTerm {
                        variable: self.output.name().to_string(),
                        term: rule.consequent.clone(),
                    }
                })?;
                Ok(CompiledRule::new(condition, consequent, rule))
            })
            .collect::<Result<Vec<_>, FuzzyError>>()?;
        Ok(RuleSet::new(label.into(), compiled))
    }

    fn resolve(&self, antecedent: &Antecedent) -> Result<Condition, FuzzyError> {
        Ok(match antecedent {
            Antecedent::Is { variable, term } => {
                let (variable, term) = self.resolve_atom(variable, term)?;
                Condition::Is { variable, term }
            }
            Antecedent::IsNot { variable, term } => {
                let (variable, term) = self.resolve_atom(variable, term)?;
                Condition::IsNot { variable, term }
            }
            Antecedent::And(lhs, rhs) => {
                Condition::And(Box::new(self.resolve(lhs)?), Box::new(self.resolve(rhs)?))
            }
            Antecedent::Or(lhs, rhs) => {
                Condition::Or(Box::new(self.resolve(lhs)?), Box::new(self.resolve(rhs)?))
            }
        })
    }

    fn resolve_atom(&self, variable: &str, term: &str) -> Result<(usize, usize), FuzzyError> {
        let var_index = self
            .input_index(variable)
            .ok_or_else(|| FuzzyError::UnknownVariable(variable.to_string()))?;
        let term_index = self.inputs[var_index]
            .term_index(term)
            .ok_or_else(|| FuzzyError::UnknownTerm {
                variable: variable.to_string(),
                term: term.to_string(),
            })?;
        Ok((var_index, term_index))
    }

    /// Step 1: crisp inputs (in `inputs()` order) → degrees
    pub fn fuzzify(&self, crisp: &[f32]) -> Result<Fuzzified, FuzzyError> {
        if crisp.len() != self.inputs.len() {
            return Err(FuzzyError::InputArity {
                expected: self.inputs.len(),
                got: crisp.len(),
            });
        }
        let degrees = self
            .inputs
            .iter()
            .zip(crisp)
            .map(|(var, &x)| var.fuzzify(x))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Fuzzified { degrees })
    }

    /// Step 2: degree to which a rule's antecedent holds
    pub fn firing_strength(&self, rule: &CompiledRule, fuzzified: &Fuzzified) -> f32 {
        rule.condition.strength(fuzzified).clamp(0.0, 1.0)
    }

    /// Step 3: clip each consequent at its rule's strength, pointwise max
    pub fn aggregate(&self, rules: &RuleSet, fuzzified: &Fuzzified) -> Envelope {
        let (min, max) = self.output.domain();
        let step = (max - min) / self.resolution as f32;

        let fired: Vec<_> = rules
            .rules()
            .iter()
            .filter_map(|rule| {
                let strength = self.firing_strength(rule, fuzzified);
                let function = self.output.function(rule.consequent)?;
                (strength > 0.0).then_some((strength, function))
            })
            .collect();

        let mut envelope = Envelope {
            start: min,
            step,
            samples: vec![0.0; self.resolution],
        };
        for i in 0..self.resolution {
            let x = envelope.x_at(i);
            envelope.samples[i] = fired
                .iter()
                .map(|(strength, function)| function.degree(x).min(*strength))
                .fold(0.0, f32::max);
        }
        envelope
    }

    /// Whole pipeline. `Ok(None)` when no rule fired.
    pub fn infer(&self, rules: &RuleSet, crisp: &[f32]) -> Result<Option<f32>, FuzzyError> {
        let fuzzified = self.fuzzify(crisp)?;
        Ok(self.aggregate(rules, &fuzzified).centroid())
    }
}
