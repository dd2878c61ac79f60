// Symbolic modeling layer: variables, expressions, regions and the constructs
// built on top of them

pub mod categorical;
pub mod error;
pub mod expression;
pub mod model;
pub mod quotient;
pub mod region;
pub mod variable;

pub use categorical::Categorical;
pub use error::ModelError;
pub use expression::{Comparison, Expression};
pub use model::{BigM, Model};
pub use quotient::QuotientExpression;
pub use region::{Constraint, Definition, DefinitionId, Region, Relation};
pub use variable::{Domain, Role, VarId, Variable, VariableDefinition};
