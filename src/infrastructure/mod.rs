// Infrastructure: process environment and diagnostics

pub mod config;
pub mod logging;

pub use logging::enable_logging;
