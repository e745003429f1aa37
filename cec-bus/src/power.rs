//! Device power state as reported by the bus

use serde::{Serialize, Serializer};
use std::fmt;

/// Power state of a bus device
///
/// The bus reports power state as a free-form string. The two states the
/// gateway can act on are `On` and `Standby`; anything else (transition
/// states, query failures, garbage) is preserved verbatim in `Unknown` so the
/// diagnostic survives all the way to the HTTP response. `Unknown` must never
/// be collapsed into `Standby`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PowerStatus {
    On,
    Standby,
    Unknown(String),
}

impl PowerStatus {
    /// Interprets a raw power state string from the adapter.
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "on" => PowerStatus::On,
            "standby" => PowerStatus::Standby,
            other => PowerStatus::Unknown(other.to_string()),
        }
    }

    /// The raw string form of this state.
    pub fn as_str(&self) -> &str {
        match self {
            PowerStatus::On => "on",
            PowerStatus::Standby => "standby",
            PowerStatus::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for PowerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for PowerStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
