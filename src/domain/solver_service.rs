// Contract between the modeling layer and any numerical engine.
// Backends translate an OptimizationProblem into their own API and report a Solution.

use super::models::{OptimizationProblem, Solution};

/// Error types for the solver service
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    #[error("Solver not available: {0}")]
    SolverNotAvailable(String),

    #[error("Solver execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, SolverError>;

/// Numerical engine behind the modeling layer.
///
/// Implementations receive a fully lowered problem and are called exactly
/// once per solve; they never see symbolic variables.
pub trait SolverService: Send + Sync {
    /// Solve an optimization problem
    fn solve(&self, problem: &OptimizationProblem) -> Result<Solution>;

    /// Validate a problem without solving it
    fn validate(&self, problem: &OptimizationProblem) -> Result<()> {
        let mut errors = Vec::new();
        let num_vars = problem.num_variables();

        for &(index, coeff) in &problem.objective.terms {
            if index >= num_vars {
                errors.push(format!(
                    "Objective references variable {} but problem has {} variables",
                    index, num_vars
                ));
            }
            if !coeff.is_finite() {
                errors.push(format!("Objective coefficient {} is not finite", coeff));
            }
        }

        for (i, constraint) in problem.constraints.iter().enumerate() {
            for &(index, coeff) in &constraint.terms {
                if index >= num_vars {
                    errors.push(format!(
                        "Constraint {} references variable {} but problem has {} variables",
                        i, index, num_vars
                    ));
                }
                if !coeff.is_finite() {
                    errors.push(format!(
                        "Constraint {} has non-finite coefficient {}",
                        i, coeff
                    ));
                }
            }
            if !constraint.bound.is_finite() {
                errors.push(format!(
                    "Constraint {} has non-finite bound {}",
                    i, constraint.bound
                ));
            }
        }

        for (i, var) in problem.variables.iter().enumerate() {
            if var.lower_bound > var.upper_bound {
                errors.push(format!(
                    "Variable {} '{}' has lower bound ({}) > upper bound ({})",
                    i, var.name, var.lower_bound, var.upper_bound
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SolverError::InvalidProblem(errors.join("; ")))
        }
    }

    /// Get the name of this solver backend
    fn name(&self) -> &str;

    /// Check if this solver supports mixed-integer programming
    fn supports_mip(&self) -> bool;
}
