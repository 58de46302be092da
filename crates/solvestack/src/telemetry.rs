use std::fmt;

use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

use crate::config::TelemetryConfig;

#[derive(Debug)]
pub enum TelemetryError {
    EnvFilter { value: String, source: ParseError },
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::EnvFilter { value, .. } => {
                write!(
                    f,
                    "invalid log level/filter '{}': unable to build EnvFilter",
                    value
                )
            }
            TelemetryError::Subscriber(err) => write!(f, "telemetry error: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::EnvFilter { source, .. } => Some(source),
            TelemetryError::Subscriber(err) => Some(&**err),
        }
    }
}

/// Filter directives for a verbosity count: the configured level at 0, then `debug` and from 2
/// on `trace` for the workspace crates on top of it.
pub fn directives(config: &TelemetryConfig, verbosity: u8) -> String {
    let workspace_level = match verbosity {
        0 => return config.log_level.clone(),
        1 => "debug",
        _ => "trace",
    };
    format!(
        "{},solvestack={workspace_level},solvestack_cli={workspace_level}",
        config.log_level
    )
}

/// An explicit verbosity beats `RUST_LOG`, which beats the configured level. Logs go to stderr
/// so JSON on stdout stays clean.
pub fn init(config: &TelemetryConfig, verbosity: u8) -> Result<(), TelemetryError> {
    let from_env = if verbosity == 0 {
        EnvFilter::try_from_default_env().ok()
    } else {
        None
    };
    let env_filter = match from_env {
        Some(filter) => filter,
        None => {
            let value = directives(config, verbosity);
            EnvFilter::try_new(&value)
                .map_err(|source| TelemetryError::EnvFilter { value, source })?
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(verbosity > 1)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}
