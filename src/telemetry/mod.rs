//! Logging setup for budgetsim
//!
//! Diagnostics go to stderr through `tracing`; reports own stdout.
//! `RUST_LOG` takes precedence over the CLI verbosity.

use crate::cli::Verbosity;
use crate::errors::{Result, SimError};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber for the given verbosity
pub fn init(verbosity: Verbosity) -> Result<()> {
    let filter = filter_for(verbosity)?;
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(matches!(verbosity, Verbosity::VeryVerbose));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| SimError::LoggingError(e.to_string()))
}

/// Filter from `RUST_LOG`, falling back to the verbosity level
pub fn filter_for(verbosity: Verbosity) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => mk_filter(verbosity.log_level()),
    }
}

fn mk_filter(level: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(level)
        .map_err(|_| SimError::LoggingError(format!("invalid log level: {}", level)))
}
