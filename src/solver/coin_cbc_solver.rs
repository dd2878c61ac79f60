// COIN-OR CBC adapter through good_lp

use std::time::Instant;

use good_lp::{solvers::coin_cbc::coin_cbc, SolverModel};

use crate::domain::{
    models::{OptimizationProblem, Solution as DomainSolution},
    solver_service::{Result, SolverService},
};

use super::good_lp_model::{self, GoodLpModel};

pub struct CoinCbcSolver;

impl CoinCbcSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CoinCbcSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for CoinCbcSolver {
    fn solve(&self, problem: &OptimizationProblem) -> Result<DomainSolution> {
        // Validate first
        self.validate(problem)?;
        if let Some(solution) = super::empty_solution(problem) {
            return Ok(solution);
        }

        let start_time = Instant::now();
        let GoodLpModel {
            unsolved,
            constraints,
            columns,
        } = good_lp_model::build(problem);

        let mut lp_model = unsolved.using(coin_cbc);
        let config = &problem.solver_config;
        lp_model.set_parameter("logLevel", if config.verbose { "1" } else { "0" });
        if let Some(limit) = config.time_limit {
            lp_model.set_parameter("seconds", &limit.to_string());
        }

        for constraint in constraints {
            lp_model = lp_model.with(constraint);
        }

        good_lp_model::finish(problem, &columns, lp_model.solve(), start_time)
    }

    fn name(&self) -> &str {
        "COIN-OR CBC"
    }

    fn supports_mip(&self) -> bool {
        true
    }
}
