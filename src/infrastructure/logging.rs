//! Opt-in structured logging.

use std::env;
use std::io;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::domain::solver_service::{Result, SolverError};

pub const TRACE_VAR: &str = "LETSMODEL_TRACE";

/// Install a stderr `fmt` subscriber for this crate's tracing events.
///
/// `level` is an `EnvFilter` directive such as `"debug"` or
/// `"letsmodel=trace"`. When it is `None`, `LETSMODEL_TRACE` is read; when
/// that is unset too, logging stays off. Returns `false` if a global
/// subscriber is already installed.
pub fn enable_logging(level: Option<&str>) -> Result<bool> {
    if tracing::dispatcher::has_been_set() {
        return Ok(false);
    }

    let level_value = level
        .map(str::to_string)
        .or_else(|| env::var(TRACE_VAR).ok())
        .unwrap_or_else(|| "off".to_string());

    let filter = if level_value.eq_ignore_ascii_case("off") {
        EnvFilter::default().add_directive(LevelFilter::OFF.into())
    } else {
        EnvFilter::try_new(&level_value)
            .map_err(|err| SolverError::InvalidConfig(format!("Invalid log filter: {err}")))?
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .try_init()
        .map_err(|err| {
            SolverError::InvalidConfig(format!("Failed to initialize logging: {err}"))
        })?;

    Ok(true)
}
