// Use case: optimize an objective over a region.
// Orchestrates compilation, one backend call, and lifting of the result.

use std::time::Instant;

use tracing::info;

use crate::algebra::{Expression, ModelError, Region};
use crate::domain::{
    models::SolverConfig,
    solver_service::{SolverError, SolverService},
    value_objects::{OptimizationType, SolutionStatus},
};
use crate::solver::SolverFactory;

use super::assignment::Assignment;
use super::compiler::{self, Compiled};
use super::mappers;

/// Why a solve produced no assignment
#[derive(Debug, thiserror::Error)]
pub enum SolveError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error("Problem is infeasible: no point satisfies all constraints")]
    Infeasible,

    #[error("Problem is unbounded: objective can be improved infinitely")]
    Unbounded,

    #[error("Solver stopped without an optimal solution: {0}")]
    NotOptimal(SolutionStatus),
}

impl Region {
    /// Maximize `objective` over this region with the default backend.
    pub fn maximize(&self, objective: impl Into<Expression>) -> Result<Assignment, SolveError> {
        self.solve(objective, OptimizationType::Maximize, &SolverConfig::default())
    }

    /// Minimize `objective` over this region with the default backend.
    pub fn minimize(&self, objective: impl Into<Expression>) -> Result<Assignment, SolveError> {
        self.solve(objective, OptimizationType::Minimize, &SolverConfig::default())
    }

    /// Optimize with the backend selected by `config`.
    pub fn solve(
        &self,
        objective: impl Into<Expression>,
        direction: OptimizationType,
        config: &SolverConfig,
    ) -> Result<Assignment, SolveError> {
        let solver = SolverFactory::create(config)?;
        self.solve_with(objective, direction, config, solver.as_ref())
    }

    /// Optimize with an explicit backend.
    ///
    /// A constant objective asks for any feasible point.
    pub fn solve_with(
        &self,
        objective: impl Into<Expression>,
        direction: OptimizationType,
        config: &SolverConfig,
        solver: &dyn SolverService,
    ) -> Result<Assignment, SolveError> {
        let objective = objective.into();
        let (problem, variables) = match compiler::compile(self, &objective, direction, config)? {
            Compiled::Problem { problem, variables } => (problem, variables),
            Compiled::Infeasible(constraint) => {
                info!(%constraint, "model is infeasible before solving");
                return Err(SolveError::Infeasible);
            }
        };

        if problem.is_mixed_integer() && !solver.supports_mip() {
            return Err(SolverError::SolverNotAvailable(format!(
                "{} cannot solve mixed-integer problems",
                solver.name()
            ))
            .into());
        }

        info!(
            backend = solver.name(),
            variables = problem.num_variables(),
            constraints = problem.constraints.len(),
            %direction,
            "solving model"
        );
        let started = Instant::now();
        let solution = solver.solve(&problem)?;
        info!(
            backend = solver.name(),
            status = %solution.status,
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "solve finished"
        );

        match solution.status {
            SolutionStatus::Optimal | SolutionStatus::Feasible => Ok(mappers::to_assignment(
                &solution,
                variables,
                &objective,
                solver.name(),
            )),
            SolutionStatus::Infeasible => Err(SolveError::Infeasible),
            SolutionStatus::Unbounded => Err(SolveError::Unbounded),
            status => Err(SolveError::NotOptimal(status)),
        }
    }
}
