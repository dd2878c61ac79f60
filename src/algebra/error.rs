// Errors raised while building or compiling a symbolic model

/// Construction-time failures of the modeling layer.
///
/// Every variant is raised at the point of misuse; nothing here is deferred
/// to the solver.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("Malformed operand: {0}")]
    MalformedOperand(String),

    #[error("Strict inequality '{0}' is not representable; use <=, >= or ==")]
    StrictInequality(String),

    #[error("Unknown relation '{0}'")]
    UnknownRelation(String),

    #[error(
        "Cannot size disjunction for {expression}: variable '{variable}' has no {side} bound"
    )]
    UnsizableDisjunction {
        expression: String,
        variable: String,
        side: &'static str,
    },

    #[error("Big-M constant must be positive and finite, got {0}")]
    InvalidBigM(f64),

    #[error("Categorical '{left}' and '{right}' have different label sets")]
    MismatchedCategories { left: String, right: String },

    #[error("Categorical '{categorical}' has no label {label}")]
    UnknownLabel { categorical: String, label: String },

    #[error("Categorical '{0}' needs at least one label")]
    EmptyCategorical(String),

    #[error("Categorical '{categorical}' lists label {label} more than once")]
    DuplicateLabel { categorical: String, label: String },

    #[error("Absolute value {variable} is only sound when minimized or bounded above ({context})")]
    AbsMisuse {
        variable: String,
        context: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
