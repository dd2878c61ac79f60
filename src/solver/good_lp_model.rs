// Shared translation of an OptimizationProblem into good_lp terms.
// Used by every backend that goes through good_lp (microlp, CBC).

use std::time::Instant;

use good_lp::solvers::SolutionStatus as GoodLpStatus;
use good_lp::variable::{ProblemVariables, UnsolvedProblem};
use good_lp::{
    constraint, variable, Constraint as GoodLpConstraint, Expression, ResolutionError,
    Solution as GoodLpSolutionTrait, Variable as GoodLpVariable,
};

use crate::domain::{
    models::{OptimizationProblem, Solution as DomainSolution, SolverStatistics},
    solver_service::{Result, SolverError},
    value_objects::{ConstraintType, SolutionStatus as DomainSolutionStatus, VariableType},
};

pub(crate) struct GoodLpModel {
    pub unsolved: UnsolvedProblem,
    pub constraints: Vec<GoodLpConstraint>,
    pub columns: Vec<GoodLpVariable>,
}

/// Declare variables, objective and rows; the caller picks the solver.
pub(crate) fn build(problem: &OptimizationProblem) -> GoodLpModel {
    let mut vars = ProblemVariables::new();
    let mut columns = Vec::with_capacity(problem.num_variables());

    for var_def in &problem.variables {
        let mut definition = variable().name(var_def.name.clone());
        definition = match var_def.variable_type {
            VariableType::Binary => definition.binary(),
            VariableType::Integer => definition.integer(),
            VariableType::Continuous => definition,
        };
        if var_def.lower_bound.is_finite() {
            definition = definition.min(var_def.lower_bound);
        }
        if var_def.upper_bound.is_finite() {
            definition = definition.max(var_def.upper_bound);
        }
        columns.push(vars.add(definition));
    }

    let objective: Expression = problem
        .objective
        .terms
        .iter()
        .map(|&(index, coeff)| coeff * columns[index])
        .sum();

    let unsolved = if problem.objective.is_maximize() {
        vars.maximise(objective)
    } else {
        vars.minimise(objective)
    };

    let constraints = problem
        .constraints
        .iter()
        .map(|row| {
            let lhs: Expression = row
                .terms
                .iter()
                .map(|&(index, coeff)| coeff * columns[index])
                .sum();
            let bound = row.bound;
            match row.constraint_type {
                ConstraintType::GreaterThanOrEqual => constraint!(lhs >= bound),
                ConstraintType::Equal => constraint!(lhs == bound),
            }
        })
        .collect();

    GoodLpModel {
        unsolved,
        constraints,
        columns,
    }
}

/// Convert a good_lp outcome into a domain solution.
pub(crate) fn finish<S: GoodLpSolutionTrait>(
    problem: &OptimizationProblem,
    columns: &[GoodLpVariable],
    outcome: std::result::Result<S, ResolutionError>,
    started: Instant,
) -> Result<DomainSolution> {
    let solve_time = started.elapsed().as_secs_f64() * 1000.0;
    let statistics = SolverStatistics::for_problem(problem, solve_time);

    match outcome {
        Ok(sol) => match solved_status(sol.status()) {
            status @ (DomainSolutionStatus::Optimal | DomainSolutionStatus::Feasible) => {
                let variable_values: Vec<f64> =
                    columns.iter().map(|&var| sol.value(var)).collect();
                let value = problem.objective_value(&variable_values);
                let mut solution = DomainSolution::optimal(value, variable_values);
                solution.status = status;
                solution.statistics = statistics;
                solution.message = format!("Solution found for '{}' ({})", problem.name, status);
                Ok(solution)
            }
            status => Ok(DomainSolution::new(
                status,
                "Time limit reached before proving optimality",
            )
            .with_statistics(statistics)),
        },
        Err(ResolutionError::Infeasible) => Ok(DomainSolution::new(
            DomainSolutionStatus::Infeasible,
            "Problem is infeasible: no solution satisfies all constraints",
        )
        .with_statistics(statistics)),
        Err(ResolutionError::Unbounded) => Ok(DomainSolution::new(
            DomainSolutionStatus::Unbounded,
            "Problem is unbounded: objective can be improved infinitely",
        )
        .with_statistics(statistics)),
        Err(e) => Err(SolverError::ExecutionFailed(format!("{:?}", e))),
    }
}

/// Status of a solve good_lp reported as successful.
///
/// A CBC run cut short by its `seconds` limit still returns `Ok`; like the
/// HiGHS adapter it is reported as `TimeLimit` rather than `Optimal`. A run
/// stopped at its gap tolerance keeps its incumbent as `Feasible`.
fn solved_status(status: GoodLpStatus) -> DomainSolutionStatus {
    match status {
        GoodLpStatus::Optimal => DomainSolutionStatus::Optimal,
        GoodLpStatus::GapLimit => DomainSolutionStatus::Feasible,
        GoodLpStatus::TimeLimit => DomainSolutionStatus::TimeLimit,
    }
}
