// Solver configuration read from the process environment

use std::env;

use crate::domain::{
    models::SolverConfig,
    solver_service::{Result, SolverError},
    value_objects::SolverBackend,
};

pub const BACKEND_VAR: &str = "LETSMODEL_BACKEND";
pub const TIME_LIMIT_VAR: &str = "LETSMODEL_TIME_LIMIT";
pub const VERBOSE_VAR: &str = "LETSMODEL_VERBOSE";

impl SolverConfig {
    /// Defaults overridden by `LETSMODEL_BACKEND`, `LETSMODEL_TIME_LIMIT`
    /// (seconds) and `LETSMODEL_VERBOSE`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = SolverConfig::default();

        if let Some(backend) = lookup(BACKEND_VAR) {
            config = config.with_backend(backend.trim().parse::<SolverBackend>()?);
        }

        if let Some(raw) = lookup(TIME_LIMIT_VAR) {
            let seconds: f64 = raw.trim().parse().map_err(|_| {
                SolverError::InvalidConfig(format!("{}='{}' is not a number", TIME_LIMIT_VAR, raw))
            })?;
            if !seconds.is_finite() || seconds <= 0.0 {
                return Err(SolverError::InvalidConfig(format!(
                    "{} must be a positive number of seconds, got {}",
                    TIME_LIMIT_VAR, raw
                )));
            }
            config = config.with_time_limit(seconds);
        }

        if let Some(raw) = lookup(VERBOSE_VAR) {
            let verbose = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" | "" => false,
                _ => {
                    return Err(SolverError::InvalidConfig(format!(
                        "{}='{}' is not a boolean",
                        VERBOSE_VAR, raw
                    )))
                }
            };
            config = config.with_verbose(verbose);
        }

        Ok(config)
    }
}
