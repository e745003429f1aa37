//! Error types for bus communication

use thiserror::Error;

/// Errors that can occur talking to the CEC bus
#[derive(Debug, Error)]
pub enum BusError {
    /// The adapter connection could not be opened
    #[error("Failed to open CEC adapter: {0}")]
    Open(String),

    /// A bus transmission (key press, power command, raw frame) failed
    #[error("CEC transmit failed: {0}")]
    Transmit(String),

    /// A bus query (enumeration, power status, physical address) failed
    #[error("CEC query failed: {0}")]
    Query(String),
}

/// Type alias for results that can return a [`BusError`]
pub type Result<T> = std::result::Result<T, BusError>;
