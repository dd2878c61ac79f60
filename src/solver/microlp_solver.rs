// microlp adapter: pure-Rust LP/MIP through good_lp, no native libraries needed

use std::time::Instant;

use good_lp::{solvers::microlp::microlp, SolverModel};
use tracing::warn;

use crate::domain::{
    models::{OptimizationProblem, Solution as DomainSolution},
    solver_service::{Result, SolverService},
};

use super::good_lp_model::{self, GoodLpModel};

pub struct MicroLpSolver;

impl MicroLpSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MicroLpSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for MicroLpSolver {
    fn solve(&self, problem: &OptimizationProblem) -> Result<DomainSolution> {
        self.validate(problem)?;
        if let Some(solution) = super::empty_solution(problem) {
            return Ok(solution);
        }
        if let Some(limit) = problem.solver_config.time_limit {
            warn!(limit, "microlp has no time limit; ignoring it");
        }

        let start_time = Instant::now();
        let GoodLpModel {
            unsolved,
            constraints,
            columns,
        } = good_lp_model::build(problem);

        let mut lp_model = unsolved.using(microlp);
        for constraint in constraints {
            lp_model = lp_model.with(constraint);
        }

        good_lp_model::finish(problem, &columns, lp_model.solve(), start_time)
    }

    fn name(&self) -> &str {
        "microlp"
    }

    fn supports_mip(&self) -> bool {
        true
    }
}
