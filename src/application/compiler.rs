// Lowers a symbolic region plus objective into a flat OptimizationProblem

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::algebra::{
    Constraint, Definition, DefinitionId, Expression, ModelError, Region, Relation, Role,
};
use crate::domain::{
    models::{ObjectiveFunction, OptimizationProblem, SolverConfig},
    value_objects::OptimizationType,
};

use super::mappers::{self, ColumnMap};

/// Tolerance for deciding constant-only constraints at compile time
const TRIVIAL_TOLERANCE: f64 = 1e-9;

/// Result of lowering a model.
#[derive(Debug)]
pub enum Compiled {
    /// Ready for a backend; `variables[i]` is backend column `i`.
    Problem {
        problem: OptimizationProblem,
        variables: Vec<crate::algebra::Variable>,
    },
    /// A constraint without variables is violated; no backend call needed.
    Infeasible(String),
}

/// Lower `region` and `objective` for a backend.
///
/// The backend is always driven as a maximization; minimizing negates the
/// objective coefficients.
pub fn compile(
    region: &Region,
    objective: &Expression,
    direction: OptimizationType,
    config: &SolverConfig,
) -> Result<Compiled, ModelError> {
    check_finite(objective)?;
    for constraint in region.constraints() {
        check_finite(constraint.expression())?;
    }
    check_abs_usage(region, objective, direction)?;

    let (constraints, definitions) = collect_constraints(region, objective)?;
    for constraint in &constraints[region.len()..] {
        check_finite(constraint.expression())?;
    }

    let mut columns = ColumnMap::new();
    let sign = match direction {
        OptimizationType::Maximize => 1.0,
        OptimizationType::Minimize => -1.0,
    };
    let objective_terms = mappers::to_backend_terms(objective, &mut columns)
        .into_iter()
        .map(|(column, coeff)| (column, sign * coeff))
        .collect();

    let mut rows = Vec::with_capacity(constraints.len());
    for constraint in &constraints {
        match constraint.holds_trivially(TRIVIAL_TOLERANCE) {
            Some(true) => continue,
            Some(false) => return Ok(Compiled::Infeasible(constraint.to_string())),
            None => rows.push(mappers::to_backend_constraint(constraint, &mut columns)),
        }
    }

    let variables = columns.into_variables();
    let mut problem = OptimizationProblem::new(ObjectiveFunction::new(
        OptimizationType::Maximize,
        objective_terms,
    ))
    .with_name(format!("{} {}", direction, objective))
    .with_variables(variables.iter().map(mappers::to_backend_variable).collect())
    .with_config(config.clone());
    problem.constraints = rows;

    debug!(
        variables = problem.num_variables(),
        integer_variables = problem.num_integer_variables(),
        constraints = problem.constraints.len(),
        definitions,
        %direction,
        "compiled model"
    );

    Ok(Compiled::Problem { problem, variables })
}

/// The region's constraints followed by every definitional region reachable
/// from the objective or from an emitted constraint, each exactly once.
///
/// A definition may only mention abs slacks it owns: inside another
/// definition a slack is pushed both ways, so its pair could grow together.
fn collect_constraints(
    region: &Region,
    objective: &Expression,
) -> Result<(Vec<Constraint>, usize), ModelError> {
    let mut constraints: Vec<Constraint> = region.constraints().to_vec();
    let mut pending: Vec<Definition> = objective.definitions().to_vec();
    for constraint in &constraints {
        pending.extend(constraint.expression().definitions().iter().cloned());
    }

    let mut visited: HashSet<DefinitionId> = HashSet::new();
    while let Some(definition) = pending.pop() {
        if !visited.insert(definition.id()) {
            continue;
        }
        trace!(definition = ?definition.id(), region = %definition.region(), "emitting definition");
        for constraint in definition.region().constraints() {
            let foreign_slack = constraint.expression().terms().iter().find(|(var, coeff)| {
                var.role() == Role::Slack && *coeff != 0.0 && !definition.owns(var)
            });
            if let Some((var, _)) = foreign_slack {
                return Err(ModelError::AbsMisuse {
                    variable: var.unique_name().to_string(),
                    context: "nested in another definition",
                });
            }
            pending.extend(constraint.expression().definitions().iter().cloned());
            constraints.push(constraint.clone());
        }
    }

    Ok((constraints, visited.len()))
}

fn check_finite(expression: &Expression) -> Result<(), ModelError> {
    match expression.non_finite() {
        Some(detail) => Err(ModelError::MalformedOperand(detail)),
        None => Ok(()),
    }
}

/// Abs slacks may only be pushed down: minimized in the objective or bounded
/// from above in a constraint. Definitional regions are not inspected; they
/// are where the slacks are tied to their argument.
fn check_abs_usage(
    region: &Region,
    objective: &Expression,
    direction: OptimizationType,
) -> Result<(), ModelError> {
    let towards_min = match direction {
        OptimizationType::Minimize => 1.0,
        OptimizationType::Maximize => -1.0,
    };
    for (var, coeff) in objective.terms() {
        if var.role() == Role::Slack && towards_min * coeff < 0.0 {
            return Err(ModelError::AbsMisuse {
                variable: var.unique_name().to_string(),
                context: "objective pushes it up",
            });
        }
    }

    for constraint in region.constraints() {
        for (var, coeff) in constraint.expression().terms() {
            if var.role() != Role::Slack || *coeff == 0.0 {
                continue;
            }
            let context = match constraint.relation() {
                Relation::Equal => "equality constraint",
                Relation::GreaterEqual if *coeff > 0.0 => "lower-bounded constraint",
                Relation::GreaterEqual => continue,
            };
            return Err(ModelError::AbsMisuse {
                variable: var.unique_name().to_string(),
                context,
            });
        }
    }
    Ok(())
}
