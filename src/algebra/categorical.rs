// Finite-domain variables encoded as one-hot boolean indicators

use std::fmt;

use super::error::{ModelError, Result};
use super::expression::Expression;
use super::region::{Definition, Region};
use super::variable::Variable;

/// A variable taking exactly one label out of a fixed list.
///
/// Each label owns a boolean indicator. The "indicators sum to one"
/// definition is attached to every expression and region the categorical
/// produces, so any model mentioning it enforces exclusivity.
#[derive(Debug, Clone)]
pub struct Categorical<L> {
    name: String,
    options: Vec<(L, Variable)>,
    definition: Definition,
}

impl<L> Categorical<L>
where
    L: Clone + PartialEq + fmt::Debug,
{
    pub(crate) fn new(name: String, options: Vec<(L, Variable)>, definition: Definition) -> Self {
        Self {
            name,
            options,
            definition,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn labels(&self) -> impl Iterator<Item = &L> {
        self.options.iter().map(|(label, _)| label)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Raw indicator variable of `label`.
    pub fn variable(&self, label: &L) -> Option<&Variable> {
        self.options
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, var)| var)
    }

    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.options.iter().map(|(_, var)| var)
    }

    fn lookup(&self, label: &L) -> Result<&Variable> {
        self.variable(label).ok_or_else(|| ModelError::UnknownLabel {
            categorical: self.name.clone(),
            label: format!("{:?}", label),
        })
    }

    fn expression_of(&self, var: &Variable) -> Expression {
        Expression::from(var).with_definition(self.definition.clone())
    }

    /// Indicator of `label` as an expression (1 when selected).
    pub fn indicator(&self, label: &L) -> Result<Expression> {
        let var = self.lookup(label)?;
        Ok(self.expression_of(var))
    }

    /// `self == label`
    pub fn is(&self, label: &L) -> Result<Region> {
        Ok(self.indicator(label)?.eq(1.0))
    }

    /// `self != label`; exclusivity then forces another label.
    pub fn is_not(&self, label: &L) -> Result<Region> {
        Ok(self.indicator(label)?.eq(0.0))
    }

    /// `self == other`: both select the same label.
    pub fn same_as(&self, other: &Categorical<L>) -> Result<Region> {
        let pairs = self.paired(other)?;
        Ok(Region::all(
            pairs.into_iter().map(|(mine, theirs)| mine.eq(theirs)),
        ))
    }

    /// Indicator expressions of both categoricals, matched by label.
    pub(crate) fn paired(&self, other: &Categorical<L>) -> Result<Vec<(Expression, Expression)>> {
        let mismatch = || ModelError::MismatchedCategories {
            left: self.name.clone(),
            right: other.name.clone(),
        };
        if self.len() != other.len() {
            return Err(mismatch());
        }
        self.options
            .iter()
            .map(|(label, var)| {
                let theirs = other.variable(label).ok_or_else(mismatch)?;
                Ok((self.expression_of(var), other.expression_of(theirs)))
            })
            .collect()
    }

    /// Label whose indicator rounds to one, given solved indicator values.
    pub(crate) fn resolve<F>(&self, lookup: F) -> Option<&L>
    where
        F: Fn(&Variable) -> Option<f64>,
    {
        let mut selected = None;
        for (label, var) in &self.options {
            if lookup(var)?.round() == 1.0 && selected.is_none() {
                selected = Some(label);
            }
        }
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::{Model, Relation};

    #[test]
    fn test_is_pins_indicator() {
        let mut model = Model::new();
        let x = model.categorical("x", ["A", "B", "C"]).unwrap();

        let region = x.is(&"C").unwrap();
        let c = &region.constraints()[0];
        assert_eq!(c.relation(), Relation::Equal);
        assert_eq!(c.expression().coefficient(x.variable(&"C").unwrap()), 1.0);
        assert_eq!(c.expression().constant(), -1.0);
        // exclusivity travels with the constraint
        assert_eq!(c.expression().definitions().len(), 1);
    }

    #[test]
    fn test_unknown_label() {
        let mut model = Model::new();
        let x = model.categorical("x", ["A", "B"]).unwrap();
        let err = x.is_not(&"Z").unwrap_err();
        assert_eq!(
            err,
            ModelError::UnknownLabel {
                categorical: "x".to_string(),
                label: "\"Z\"".to_string(),
            }
        );
    }

    #[test]
    fn test_same_as_requires_matching_labels() {
        let mut model = Model::new();
        let x = model.categorical("x", [1, 2, 3]).unwrap();
        let y = model.categorical("y", [3, 2, 1]).unwrap();
        let z = model.categorical("z", [1, 2, 4]).unwrap();

        let region = x.same_as(&y).unwrap();
        assert_eq!(region.len(), 3);
        assert!(matches!(
            x.same_as(&z),
            Err(ModelError::MismatchedCategories { .. })
        ));
    }

    #[test]
    fn test_resolve_rounds_indicators() {
        let mut model = Model::new();
        let x = model.categorical("x", ['a', 'b']).unwrap();
        let a = x.variable(&'a').unwrap().id();

        let noisy = |var: &Variable| Some(if var.id() == a { 0.02 } else { 0.9999 });
        assert_eq!(x.resolve(noisy), Some(&'b'));

        let missing = |_: &Variable| None;
        assert_eq!(x.resolve(missing), None);
    }
}
