use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::AppError;

/// Installs the global `tracing` subscriber writing to stderr.
///
/// `filter` uses `EnvFilter` directive syntax; an unparsable filter falls back
/// to `info`.
///
/// # Errors
/// Returns [`AppError::Telemetry`] when a global subscriber is already set.
pub fn init_tracing(filter: &str) -> Result<(), AppError> {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(true)
        .try_init()
        .map_err(|error| AppError::Telemetry(error.to_string()))?;

    info!(filter, "telemetry initialized");
    Ok(())
}
