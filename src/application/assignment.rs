use std::collections::HashMap;
use std::fmt;
use std::ops::Index;

use crate::algebra::{Categorical, Expression, VarId, Variable};
use crate::domain::{SolutionStatus, SolverStatistics};

/// Solved values of a model, keyed by the caller's symbolic entities.
///
/// Every variable that took part in the solve has a value, including
/// internal slacks and indicators, but only decision variables are listed by
/// [`Assignment::variables`].
#[derive(Debug, Clone)]
pub struct Assignment {
    status: SolutionStatus,
    objective_value: f64,
    values: HashMap<VarId, f64>,
    variables: Vec<Variable>,
    statistics: SolverStatistics,
    backend: String,
}

impl Assignment {
    pub(crate) fn new(
        status: SolutionStatus,
        objective_value: f64,
        values: HashMap<VarId, f64>,
        variables: Vec<Variable>,
        statistics: SolverStatistics,
        backend: &str,
    ) -> Self {
        Self {
            status,
            objective_value,
            values,
            variables,
            statistics,
            backend: backend.to_string(),
        }
    }

    pub fn status(&self) -> SolutionStatus {
        self.status
    }

    /// The caller's objective, constant included, at the solved point.
    pub fn objective_value(&self) -> f64 {
        self.objective_value
    }

    pub fn statistics(&self) -> &SolverStatistics {
        &self.statistics
    }

    /// Name of the backend that produced this assignment
    pub fn backend(&self) -> &str {
        &self.backend
    }

    pub fn value(&self, var: &Variable) -> Option<f64> {
        self.values.get(&var.id()).copied()
    }

    /// Selected label of `categorical`, `None` if it was not part of the model.
    pub fn label<'a, L>(&self, categorical: &'a Categorical<L>) -> Option<&'a L>
    where
        L: Clone + PartialEq + fmt::Debug,
    {
        categorical.resolve(|var| self.value(var))
    }

    pub fn evaluate(&self, expression: &Expression) -> Option<f64> {
        expression.evaluate(|var| self.value(var))
    }

    /// Decision variables and their values, in compilation order.
    pub fn variables(&self) -> impl Iterator<Item = (&Variable, f64)> + '_ {
        self.variables
            .iter()
            .filter(|var| !var.is_internal())
            .filter_map(|var| self.value(var).map(|value| (var, value)))
    }
}

impl Index<&Variable> for Assignment {
    type Output = f64;

    fn index(&self, var: &Variable) -> &f64 {
        match self.values.get(&var.id()) {
            Some(value) => value,
            None => panic!("variable '{}' is not part of the solved model", var.unique_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::Model;

    #[test]
    fn test_internal_variables_hidden_from_listing() {
        let mut model = Model::new();
        let x = model.continuous("x");
        let slack_sum = model.abs(&x);
        let (z_neg, _) = slack_sum.terms()[0].clone();

        let values = HashMap::from([(x.id(), 3.0), (z_neg.id(), 0.5)]);
        let assignment = Assignment::new(
            SolutionStatus::Optimal,
            3.0,
            values,
            vec![x.clone(), z_neg.clone()],
            SolverStatistics::default(),
            "test",
        );

        let listed: Vec<_> = assignment.variables().map(|(v, _)| v.id()).collect();
        assert_eq!(listed, vec![x.id()]);
        assert_eq!(assignment[&z_neg], 0.5);
        assert_eq!(assignment[&x], 3.0);
    }

    #[test]
    #[should_panic(expected = "not part of the solved model")]
    fn test_index_unknown_variable_panics() {
        let mut model = Model::new();
        let x = model.continuous("x");
        let y = model.continuous("y");
        let assignment = Assignment::new(
            SolutionStatus::Optimal,
            0.0,
            HashMap::from([(x.id(), 1.0)]),
            vec![x],
            SolverStatistics::default(),
            "test",
        );
        let _ = assignment[&y];
    }
}
