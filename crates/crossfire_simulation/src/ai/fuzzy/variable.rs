//! Linguistic variables: a named domain partitioned into named terms.

use super::{FuzzyError, MembershipFunction};

#[derive(Debug, Clone, PartialEq)]
pub struct LinguisticVariable {
    name: String,
    min: f32,
    max: f32,
    terms: Vec<(String, MembershipFunction)>,
}

impl LinguisticVariable {
    pub fn new(name: impl Into<String>, min: f32, max: f32) -> Result<Self, FuzzyError> {
        let name = name.into();
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(FuzzyError::InvalidDomain(name));
        }
        Ok(Self {
            name,
            min,
            max,
            terms: Vec::new(),
        })
    }

    /// Builder: add a named term
    pub fn with_term(
        mut self,
        term: impl Into<String>,
        function: MembershipFunction,
    ) -> Result<Self, FuzzyError> {
        let term = term.into();
        if self.term_index(&term).is_some() {
            return Err(FuzzyError::DuplicateTerm {
                variable: self.name,
                term,
            });
        }
        self.terms.push((term, function));
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain(&self) -> (f32, f32) {
        (self.min, self.max)
    }

    pub fn terms(&self) -> impl Iterator<Item = (&str, &MembershipFunction)> {
        self.terms.iter().map(|(name, mf)| (name.as_str(), mf))
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.terms.iter().position(|(name, _)| name == term)
    }

    pub(crate) fn function(&self, index: usize) -> Option<&MembershipFunction> {
        self.terms.get(index).map(|(_, mf)| mf)
    }

    /// Degree of every term for `x`, clamped into the domain first
    pub fn fuzzify(&self, x: f32) -> Result<Vec<f32>, FuzzyError> {
        if !x.is_finite() {
            return Err(FuzzyError::NonFiniteInput(self.name.clone()));
        }
        let x = x.clamp(self.min, self.max);
        Ok(self.terms.iter().map(|(_, mf)| mf.degree(x)).collect())
    }

    /// Degree of one named term (no clamping), mostly for diagnostics
    pub fn degree(&self, term: &str, x: f32) -> Option<f32> {
        self.term_index(term)
            .and_then(|index| self.function(index))
            .map(|mf| mf.degree(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn distance() -> LinguisticVariable {
        LinguisticVariable::new("distance", 0.0, 20.0)
            .and_then(|v| v.with_term("close", MembershipFunction::trapezoid(0.0, 0.0, 3.0, 7.0)?))
            .and_then(|v| v.with_term("far", MembershipFunction::trapezoid(12.0, 16.0, 20.0, 20.0)?))
            .unwrap()
    }

    #[test]
    fn test_fuzzify_clamps_into_domain() {
        let var = distance();

        // 35m is treated as 20m: fully far
        assert_eq!(var.fuzzify(35.0).unwrap(), vec![0.0, 1.0]);
        assert_eq!(var.fuzzify(-4.0).unwrap(), vec![1.0, 0.0]);
    }

    #[test]
    fn test_named_degree_skips_clamping() {
        let var = distance();

        assert_eq!(var.degree("close", 5.0), Some(0.5));
        assert_eq!(var.degree("far", 14.0), Some(0.5));
        // outside the domain the raw shape applies, unlike `fuzzify`
        assert_eq!(var.degree("far", 35.0), Some(0.0));
        assert_eq!(var.degree("medium", 5.0), None);
    }

    #[test]
    fn test_non_finite_input_rejected() {
        let var = distance();
        assert_eq!(
            var.fuzzify(f32::NAN),
            Err(FuzzyError::NonFiniteInput("distance".to_string()))
        );
    }

    #[test]
    fn test_duplicate_term_rejected() {
        let result = distance().with_term("far", MembershipFunction::triangle(0.0, 1.0, 2.0).unwrap());
        assert!(matches!(result, Err(FuzzyError::DuplicateTerm { .. })));
    }

    #[test]
    fn test_inverted_domain_rejected() {
        assert!(LinguisticVariable::new("ammo", 10.0, 0.0).is_err());
    }
}
