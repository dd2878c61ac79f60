// Mappers: convert between symbolic model entities and the flat backend models.
// Backends never see symbolic variables; this is the only place the two meet.

use std::collections::HashMap;

use crate::algebra::{Constraint, Domain, Expression, Relation, VarId, Variable};
use crate::domain::{
    models::{Constraint as BackendConstraint, Solution, Variable as BackendVariable},
    value_objects::{ConstraintType, VariableType},
};

use super::assignment::Assignment;

/// Backend column of every distinct symbolic variable, in first-seen order.
#[derive(Debug, Default)]
pub struct ColumnMap {
    index: HashMap<VarId, usize>,
    variables: Vec<Variable>,
}

impl ColumnMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Column of `var`, allocated on first sight.
    pub fn column(&mut self, var: &Variable) -> usize {
        if let Some(&column) = self.index.get(&var.id()) {
            return column;
        }
        let column = self.variables.len();
        self.index.insert(var.id(), column);
        self.variables.push(var.clone());
        column
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn into_variables(self) -> Vec<Variable> {
        self.variables
    }
}

/// Convert a symbolic variable's domain to the backend variable type
pub fn domain_to_variable_type(domain: Domain) -> VariableType {
    match domain {
        Domain::Continuous => VariableType::Continuous,
        Domain::Integer => VariableType::Integer,
        Domain::Boolean => VariableType::Binary,
    }
}

/// Convert a symbolic variable to a backend variable; missing bounds become ±∞
pub fn to_backend_variable(var: &Variable) -> BackendVariable {
    let variable_type = domain_to_variable_type(var.domain());
    let (lower, upper) = match variable_type {
        VariableType::Binary => (0.0, 1.0),
        _ => (
            var.lower_bound().unwrap_or(f64::NEG_INFINITY),
            var.upper_bound().unwrap_or(f64::INFINITY),
        ),
    };

    BackendVariable {
        variable_type,
        lower_bound: lower,
        upper_bound: upper,
        name: var.unique_name().to_string(),
    }
}

/// Convert expression terms to `(column, coefficient)` pairs, dropping zeros
pub fn to_backend_terms(expression: &Expression, columns: &mut ColumnMap) -> Vec<(usize, f64)> {
    expression
        .terms()
        .iter()
        .filter(|(_, coeff)| *coeff != 0.0)
        .map(|(var, coeff)| (columns.column(var), *coeff))
        .collect()
}

/// Convert `expression (>= | ==) 0` to `terms (>= | ==) -constant`
pub fn to_backend_constraint(constraint: &Constraint, columns: &mut ColumnMap) -> BackendConstraint {
    let constraint_type = match constraint.relation() {
        Relation::GreaterEqual => ConstraintType::GreaterThanOrEqual,
        Relation::Equal => ConstraintType::Equal,
    };
    let expression = constraint.expression();

    BackendConstraint::new(
        constraint_type,
        to_backend_terms(expression, columns),
        -expression.constant(),
    )
    .with_name(constraint.to_string())
}

/// Lift a backend solution back onto the symbolic variables it was built from
pub fn to_assignment(
    solution: &Solution,
    variables: Vec<Variable>,
    objective: &Expression,
    backend: &str,
) -> Assignment {
    let values: HashMap<VarId, f64> = variables
        .iter()
        .zip(solution.variable_values.iter())
        .map(|(var, value)| (var.id(), *value))
        .collect();

    let objective_value = objective
        .evaluate(|var| values.get(&var.id()).copied())
        .unwrap_or(objective.constant());

    Assignment::new(
        solution.status,
        objective_value,
        values,
        variables,
        solution.statistics.clone(),
        backend,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::{Model, VariableDefinition};
    use crate::domain::SolutionStatus;

    #[test]
    fn test_columns_dedup_by_identity() {
        let mut model = Model::new();
        let x1 = model.continuous("x");
        let x2 = model.continuous("x");

        let mut columns = ColumnMap::new();
        assert_eq!(columns.column(&x1), 0);
        assert_eq!(columns.column(&x2), 1);
        assert_eq!(columns.column(&x1.clone()), 0);
        assert_eq!(columns.len(), 2);
    }

    #[test]
    fn test_domain_mapping() {
        let mut model = Model::new();
        let b = model.boolean("b");
        let i = model.add(VariableDefinition::integer("i").bounds(-3.0, 4.0));
        let c = model.add(VariableDefinition::continuous("c").min(1.0));

        let b = to_backend_variable(&b);
        assert_eq!(b.variable_type, VariableType::Binary);
        assert_eq!((b.lower_bound, b.upper_bound), (0.0, 1.0));

        let i = to_backend_variable(&i);
        assert_eq!(i.variable_type, VariableType::Integer);
        assert_eq!((i.lower_bound, i.upper_bound), (-3.0, 4.0));

        let c = to_backend_variable(&c);
        assert_eq!(c.variable_type, VariableType::Continuous);
        assert_eq!(c.lower_bound, 1.0);
        assert_eq!(c.upper_bound, f64::INFINITY);
    }

    #[test]
    fn test_constraint_moves_constant_to_bound() {
        let mut model = Model::new();
        let x = model.continuous("x");
        let y = model.continuous("y");

        // x + 3y <= 10  ->  -x - 3y >= -10
        let region = (&x + 3.0 * &y).leq(10.0);
        let mut columns = ColumnMap::new();
        let row = to_backend_constraint(&region.constraints()[0], &mut columns);

        assert_eq!(row.constraint_type, ConstraintType::GreaterThanOrEqual);
        assert_eq!(row.terms, vec![(0, -1.0), (1, -3.0)]);
        assert_eq!(row.bound, -10.0);
    }

    #[test]
    fn test_to_assignment_evaluates_objective() {
        let mut model = Model::new();
        let x = model.continuous("x");
        let y = model.continuous("y");

        let solution = Solution::optimal(-1.0, vec![2.0, 3.0]);
        let objective = 2.0 * &x + &y + 1.0;
        let assignment = to_assignment(&solution, vec![x.clone(), y.clone()], &objective, "test");

        assert_eq!(assignment.status(), SolutionStatus::Optimal);
        assert_eq!(assignment.value(&x), Some(2.0));
        assert_eq!(assignment.objective_value(), 8.0);
    }
}
