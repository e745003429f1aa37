//! CEC addressing types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical address of a CEC bus participant
///
/// A small integer in the range 0-15 identifying a device role on the bus
/// (TV, recording device, tuner, ...). Addresses are allocated by the bus
/// itself during device registration; this crate only resolves and carries
/// them, it never allocates one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogicalAddress(u8);

/// Role names in bus address order, as libcec reports them.
const ROLE_NAMES: [&str; 16] = [
    "TV",
    "Recorder 1",
    "Recorder 2",
    "Tuner 1",
    "Playback 1",
    "Audio",
    "Tuner 2",
    "Tuner 3",
    "Playback 2",
    "Recorder 3",
    "Tuner 4",
    "Playback 3",
    "Reserved 1",
    "Reserved 2",
    "Free use",
    "Broadcast",
];

impl LogicalAddress {
    /// The TV, always logical address 0.
    pub const TV: LogicalAddress = LogicalAddress(0);
    /// The first playback device, logical address 4.
    pub const PLAYBACK_1: LogicalAddress = LogicalAddress(4);
    /// The audio system (soundbar/receiver), logical address 5.
    pub const AUDIO_SYSTEM: LogicalAddress = LogicalAddress(5);
    /// The broadcast address, logical address 15.
    pub const BROADCAST: LogicalAddress = LogicalAddress(15);

    /// Creates a logical address from its raw bus value.
    ///
    /// Returns `None` for values outside the 0-15 CEC addressing space.
    pub fn new(raw: u8) -> Option<Self> {
        (raw <= 15).then_some(Self(raw))
    }

    /// Resolves a human role name ("tv", "audio", "playback 1", ...) against
    /// the static CEC role table.
    ///
    /// Matching is case-insensitive and ignores spaces, hyphens and
    /// underscores, so "Tuner 1", "tuner1" and "tuner_1" all resolve to
    /// logical address 3. A handful of common shorthands ("recorder",
    /// "playback", "tuner") resolve to the first device of that role.
    pub fn from_role_name(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();

        // Shorthands for the first device of a role.
        let shorthand = match normalized.as_str() {
            "audiosystem" | "soundbar" => Some(5),
            "recorder" | "recording" => Some(1),
            "tuner" => Some(3),
            "playback" => Some(4),
            "freeuse" | "free" => Some(14),
            "unregistered" => Some(15),
            _ => None,
        };
        if let Some(raw) = shorthand {
            return Some(Self(raw));
        }

        ROLE_NAMES.iter().position(|role| {
            role.chars()
                .filter(|c| *c != ' ')
                .collect::<String>()
                .to_lowercase()
                == normalized
        })
        .map(|raw| Self(raw as u8))
    }

    /// The raw bus value of this address.
    pub fn value(&self) -> u8 {
        self.0
    }

    /// The canonical role name for this address.
    pub fn role_name(&self) -> &'static str {
        ROLE_NAMES[usize::from(self.0)]
    }
}

impl fmt::Display for LogicalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.role_name(), self.0)
    }
}

/// Physical address of a device in the HDMI topology
///
/// A dotted path like "1.0.0.0" encoding the chain of HDMI ports between the
/// display and the device. The leading segment is the top-level HDMI input
/// number on the display. The string is owned by the bus; this type carries
/// it verbatim and only ever parses the leading segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicalAddress(String);

impl PhysicalAddress {
    /// Wraps a dotted physical address string as reported by the adapter.
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    /// The top-level HDMI input number, derived from the leading dotted
    /// segment only. Returns `None` when the leading segment is not a number.
    pub fn hdmi_input(&self) -> Option<u8> {
        self.0.split('.').next()?.parse().ok()
    }

    /// The dotted address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhysicalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PhysicalAddress {
    fn from(s: &str) -> Self {
        PhysicalAddress::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(LogicalAddress::new(15).is_some());
        assert!(LogicalAddress::new(16).is_none());
    }

    #[test]
    fn test_role_name_round_trip() {
        for raw in 0..=15 {
            let addr = LogicalAddress::new(raw).unwrap();
            assert_eq!(LogicalAddress::from_role_name(addr.role_name()), Some(addr));
        }
    }

    #[test]
    fn test_from_role_name_is_case_and_separator_insensitive() {
        assert_eq!(LogicalAddress::from_role_name("tv"), Some(LogicalAddress::TV));
        assert_eq!(
            LogicalAddress::from_role_name("TUNER_1"),
            LogicalAddress::new(3)
        );
        assert_eq!(
            LogicalAddress::from_role_name("playback-2"),
            LogicalAddress::new(8)
        );
    }

    #[test]
    fn test_from_role_name_shorthands() {
        assert_eq!(
            LogicalAddress::from_role_name("audiosystem"),
            Some(LogicalAddress::AUDIO_SYSTEM)
        );
        assert_eq!(LogicalAddress::from_role_name("recorder"), LogicalAddress::new(1));
        assert_eq!(LogicalAddress::from_role_name("playback"), LogicalAddress::new(4));
    }

    #[test]
    fn test_from_role_name_unknown() {
        assert_eq!(LogicalAddress::from_role_name("toaster"), None);
        assert_eq!(LogicalAddress::from_role_name(""), None);
    }

    #[test]
    fn test_hdmi_input_uses_leading_segment_only() {
        assert_eq!(PhysicalAddress::new("2.0.0.0").hdmi_input(), Some(2));
        // Deeper segments must never leak into the input number.
        assert_eq!(PhysicalAddress::new("1.2.3.4").hdmi_input(), Some(1));
    }

    #[test]
    fn test_hdmi_input_non_numeric() {
        assert_eq!(PhysicalAddress::new("f.f.f.f").hdmi_input(), None);
        assert_eq!(PhysicalAddress::new("").hdmi_input(), None);
    }
}
