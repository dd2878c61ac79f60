// Application module: compiling symbolic models for a backend and lifting results back

pub mod assignment;
pub mod compiler;
pub mod mappers;
pub mod solve;

pub use assignment::Assignment;
pub use solve::SolveError;
