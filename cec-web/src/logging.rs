//! Logging initialization for the gateway binary

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Logging configuration error
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),
}

/// Initializes compact stderr logging, filtered by `CEC_WEB_LOG` (falling
/// back to `RUST_LOG`, then "info").
///
/// Call once, early in the binary. Library crates only emit `tracing`
/// events and never install a subscriber themselves.
pub fn init() -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_env("CEC_WEB_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| LoggingError::TracingInit(e.to_string()))
}
