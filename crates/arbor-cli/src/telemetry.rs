//! Structured telemetry initialisation for the CLI.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

/// Environment variable consulted for the default log filter.
pub const LOG_FILTER_ENV: &str = "ARBOR_LOG";

static TELEMETRY_GUARD: OnceCell<()> = OnceCell::new();

/// Errors encountered while configuring telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Failed to parse the log filter expression.
    #[error("invalid log filter: {0}")]
    Filter(String),
    /// Failed to install the tracing subscriber.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(#[from] SetGlobalDefaultError),
}

/// Configures the global tracing subscriber when invoked for the first
/// time.
///
/// `filter` takes precedence over the `ARBOR_LOG` environment variable;
/// when both are absent the filter defaults to `warn`. Repeated calls are
/// idempotent: only the first invocation installs the subscriber.
///
/// # Errors
///
/// Returns [`TelemetryError`] when the filter expression does not parse
/// or a global subscriber is already installed by other means.
pub fn initialise(filter: Option<&str>) -> Result<(), TelemetryError> {
    TELEMETRY_GUARD
        .get_or_try_init(|| install_subscriber(filter))
        .map(|()| ())
}

fn install_subscriber(filter: Option<&str>) -> Result<(), TelemetryError> {
    let expression = filter
        .map(ToOwned::to_owned)
        .or_else(|| std::env::var(LOG_FILTER_ENV).ok())
        .unwrap_or_else(|| "warn".to_owned());
    let env_filter = EnvFilter::try_new(&expression)
        .map_err(|error| TelemetryError::Filter(error.to_string()))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(io::stderr)
        // Avoid stray colour codes in non-TTY sinks while keeping colour
        // on interactive terminals.
        .with_ansi(io::stderr().is_terminal())
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
