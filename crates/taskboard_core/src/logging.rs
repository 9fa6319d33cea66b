//! Diagnostic logging for the command line front end.
//!
//! Events go to stderr so they never mix with command output. The filter is
//! read from `TASKBOARD_LOG` (same syntax as `RUST_LOG`) and defaults to
//! `warn`, which keeps storage failures visible without chatter.

use crate::error::AppError;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV_VAR: &str = "TASKBOARD_LOG";
const DEFAULT_DIRECTIVE: &str = "warn";

pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init_logging() -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| AppError::invalid_data(format!("failed to initialize logging: {err}")))
}
