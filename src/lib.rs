// Modeling layer: variables, expressions, regions, disjunctions, categoricals
pub mod algebra;

// Domain layer: the flat problem contract shared with solver backends
pub mod domain;

// Application layer: compiling models and lifting solutions back
pub mod application;

// Infrastructure layer: environment configuration and logging
pub mod infrastructure;

// Solver adapters: concrete implementations of SolverService
pub mod solver;

// Re-export commonly used types
pub use algebra::{
    BigM, Categorical, Comparison, Domain, Expression, Model, ModelError, QuotientExpression,
    Region, Variable, VariableDefinition,
};

pub use application::{Assignment, SolveError};

pub use domain::{
    OptimizationProblem, OptimizationType, Solution, SolutionStatus, SolverBackend, SolverConfig,
    SolverError, SolverService,
};

pub use infrastructure::enable_logging;

pub use solver::SolverFactory;

#[cfg(feature = "coin_cbc")]
pub use solver::CoinCbcSolver;
#[cfg(feature = "highs")]
pub use solver::HighsSolver;
#[cfg(feature = "microlp")]
pub use solver::MicroLpSolver;
