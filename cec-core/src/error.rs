//! Error taxonomy for gateway operations

use cec_bus::BusError;
use thiserror::Error;

/// Errors produced while turning an HTTP intent into bus operations
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The device name did not resolve to a logical address. Raised before
    /// any bus mutation; a caller seeing this knows nothing was transmitted.
    #[error("Unknown device: {0}")]
    UnknownDevice(String),

    /// The key identifier is neither a known key name nor a hex code literal
    #[error("Unknown key identifier: {0}")]
    InvalidKey(String),

    /// The channel string contains a non-digit character
    #[error("Invalid channel '{channel}': '{offending}' is not a digit")]
    InvalidChannel { channel: String, offending: char },

    /// The bus reported a power state outside the expected enumeration
    #[error("Invalid power state for {device}: {state}")]
    InconsistentPowerState { device: String, state: String },

    /// A multi-step sequence failed partway through. Steps before `failed_step`
    /// were already issued and are not rolled back.
    #[error("Sequence aborted at step {failed_step} of {total_steps}: {source}")]
    SequenceAborted {
        failed_step: usize,
        total_steps: usize,
        #[source]
        source: BusError,
    },

    /// A single bus primitive failed
    #[error(transparent)]
    Bus(#[from] BusError),
}

/// Type alias for results that can return a [`GatewayError`]
pub type Result<T> = std::result::Result<T, GatewayError>;

impl GatewayError {
    /// Whether this error is the caller's fault (bad name, bad key, bad
    /// channel) rather than a bus or gateway failure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            GatewayError::UnknownDevice(_)
                | GatewayError::InvalidKey(_)
                | GatewayError::InvalidChannel { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(GatewayError::UnknownDevice("vcr".to_string()).is_client_error());
        assert!(GatewayError::InvalidKey("0xzz".to_string()).is_client_error());
        assert!(!GatewayError::Bus(BusError::Transmit("nack".to_string())).is_client_error());
    }

    #[test]
    fn test_sequence_aborted_display_names_step() {
        let err = GatewayError::SequenceAborted {
            failed_step: 2,
            total_steps: 3,
            source: BusError::Transmit("nack".to_string()),
        };
        assert!(err.to_string().contains("step 2 of 3"));
    }
}
