// Solver adapters module: one SolverService per backend, each behind its feature

#[cfg(feature = "coin_cbc")]
pub mod coin_cbc_solver;
pub mod factory;
#[cfg(any(feature = "microlp", feature = "coin_cbc"))]
mod good_lp_model;
#[cfg(feature = "highs")]
pub mod highs_solver;
#[cfg(feature = "microlp")]
pub mod microlp_solver;

#[cfg(feature = "coin_cbc")]
pub use coin_cbc_solver::CoinCbcSolver;
pub use factory::SolverFactory;
#[cfg(feature = "highs")]
pub use highs_solver::HighsSolver;
#[cfg(feature = "microlp")]
pub use microlp_solver::MicroLpSolver;

#[cfg(any(feature = "microlp", feature = "coin_cbc", feature = "highs"))]
use crate::domain::models::{OptimizationProblem, Solution, SolverStatistics};

/// Solution for a problem without columns; nothing to hand to a backend.
#[cfg(any(feature = "microlp", feature = "coin_cbc", feature = "highs"))]
pub(crate) fn empty_solution(problem: &OptimizationProblem) -> Option<Solution> {
    if problem.num_variables() > 0 {
        return None;
    }
    let statistics = SolverStatistics::for_problem(problem, 0.0);
    Some(Solution::optimal(0.0, Vec::new()).with_statistics(statistics))
}
