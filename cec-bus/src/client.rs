//! The bus adapter trait and its configuration

use crate::address::{LogicalAddress, PhysicalAddress};
use crate::device::Device;
use crate::error::{BusError, Result};
use crate::keys::KeyCode;
use crate::power::PowerStatus;
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Device type the gateway registers as on the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceType {
    Tv,
    Recorder,
    #[default]
    Tuner,
    Playback,
    Audio,
}

impl FromStr for DeviceType {
    type Err = BusError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "tv" => Ok(DeviceType::Tv),
            "recorder" | "recording" => Ok(DeviceType::Recorder),
            "tuner" => Ok(DeviceType::Tuner),
            "playback" => Ok(DeviceType::Playback),
            "audio" => Ok(DeviceType::Audio),
            other => Err(BusError::Open(format!("Unknown device type: {other}"))),
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeviceType::Tv => "tv",
            DeviceType::Recorder => "recorder",
            DeviceType::Tuner => "tuner",
            DeviceType::Playback => "playback",
            DeviceType::Audio => "audio",
        };
        write!(f, "{name}")
    }
}

/// Startup parameters for opening a bus adapter
#[derive(Debug, Clone)]
pub struct BusConfig {
    /// Adapter identifier (port path, "RPI", ...); `None` lets the backend
    /// autodetect
    pub adapter: Option<String>,
    /// OSD name announced on the bus
    pub osd_name: String,
    /// Device type announced on the bus
    pub device_type: DeviceType,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            adapter: None,
            osd_name: "REST Gateway".to_string(),
            device_type: DeviceType::Tuner,
        }
    }
}

/// A raw bus frame in colon-separated hex form, e.g. "10:04"
///
/// The lowest-level escape hatch: the gateway forwards these unmodified and
/// performs no validation, so frames outside the modeled vocabulary stay
/// expressible. Byte decoding happens only in backends that need it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCommand(String);

impl RawCommand {
    pub fn new(frame: impl Into<String>) -> Self {
        Self(frame.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decodes the frame into bytes. Fails when any colon-separated segment
    /// is not a two-digit-or-less hex byte.
    pub fn bytes(&self) -> Result<Vec<u8>> {
        self.0
            .split(':')
            .map(|segment| {
                u8::from_str_radix(segment, 16)
                    .map_err(|_| BusError::Transmit(format!("Malformed frame: {}", self.0)))
            })
            .collect()
    }
}

impl fmt::Display for RawCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Shared handle to the process-wide bus adapter
pub type SharedBus = Arc<dyn CecBus>;

/// The CEC bus adapter boundary
///
/// One implementation of this trait is constructed at startup and passed into
/// everything that talks to the bus, never referenced globally. The CEC bus
/// is a single serial medium, so implementations must serialize physical bus
/// access internally: every method is safe to invoke from concurrent callers
/// and calls are applied in an implementation-defined but consistent order.
///
/// Power and key commands are fire-and-forget: a returned `Ok` means the
/// frame was handed to the bus, not that the target acknowledged it.
#[async_trait]
pub trait CecBus: Send + Sync {
    /// Enumerates all devices currently visible on the bus.
    async fn list(&self) -> Result<Vec<Device>>;

    /// Looks up a logical address by device name: live OSD names first,
    /// then the static role-name table. Returns `Ok(None)` for unknown
    /// names. Pure with respect to bus state; never transmits.
    async fn address_by_name(&self, name: &str) -> Result<Option<LogicalAddress>>;

    /// Queries the power state of one device.
    async fn power_status(&self, address: LogicalAddress) -> Result<PowerStatus>;

    /// Returns every bus address paired with its activity flag, in bus
    /// address order.
    async fn active_devices(&self) -> Result<Vec<(LogicalAddress, bool)>>;

    /// Whether the given address is the current active source.
    async fn is_active_source(&self, address: LogicalAddress) -> Result<bool>;

    /// Queries the physical (HDMI topology) address of one device.
    async fn physical_address(&self, address: LogicalAddress) -> Result<PhysicalAddress>;

    /// Sends an "image view on" power-on to one device.
    async fn power_on(&self, address: LogicalAddress) -> Result<()>;

    /// Puts one device into standby.
    async fn standby(&self, address: LogicalAddress) -> Result<()>;

    /// Volume step up on the audio system. Bus-wide, unaddressed.
    async fn volume_up(&self) -> Result<()>;

    /// Volume step down on the audio system. Bus-wide, unaddressed.
    async fn volume_down(&self) -> Result<()>;

    /// Toggles audio mute. Bus-wide, unaddressed.
    async fn mute(&self) -> Result<()>;

    /// Sends one key press (press + release) to a device.
    async fn send_key(&self, address: LogicalAddress, key: KeyCode) -> Result<()>;

    /// Transmits one raw frame verbatim.
    async fn transmit(&self, command: RawCommand) -> Result<()>;
}
