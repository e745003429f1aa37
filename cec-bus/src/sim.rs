//! In-memory simulated bus
//!
//! `SimBus` stands in for real hardware in tests and in development
//! deployments (the `sim` adapter id). It keeps a device table and an
//! ordered log of every mutating call, so tests can assert on the exact
//! primitive sequence an operation produced. Failures can be injected to
//! exercise partial-failure paths.

use crate::address::{LogicalAddress, PhysicalAddress};
use crate::client::{CecBus, RawCommand};
use crate::device::Device;
use crate::error::{BusError, Result};
use crate::keys::KeyCode;
use crate::power::PowerStatus;
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::trace;

/// One device in the simulated bus topology
#[derive(Debug, Clone)]
pub struct SimDevice {
    pub address: LogicalAddress,
    pub osd_name: String,
    pub vendor: String,
    pub physical_address: PhysicalAddress,
    pub power: PowerStatus,
    pub active: bool,
    pub active_source: bool,
}

impl SimDevice {
    pub fn new(address: LogicalAddress, osd_name: impl Into<String>) -> Self {
        Self {
            address,
            osd_name: osd_name.into(),
            vendor: String::new(),
            physical_address: PhysicalAddress::new("0.0.0.0"),
            power: PowerStatus::Standby,
            active: false,
            active_source: false,
        }
    }

    pub fn at(mut self, physical_address: impl Into<String>) -> Self {
        self.physical_address = PhysicalAddress::new(physical_address);
        self
    }

    pub fn powered(mut self, power: PowerStatus) -> Self {
        self.power = power;
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn active_source(mut self, active_source: bool) -> Self {
        self.active_source = active_source;
        self
    }
}

/// One recorded mutating bus call, in issue order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusCall {
    PowerOn(LogicalAddress),
    Standby(LogicalAddress),
    VolumeUp,
    VolumeDown,
    Mute,
    /// Key press: target address and the one-byte user-control code
    Key(LogicalAddress, u8),
    Transmit(String),
}

#[derive(Debug, Default)]
struct SimState {
    devices: Vec<SimDevice>,
    calls: Vec<BusCall>,
    /// Mutating calls still allowed to succeed; `None` means unlimited
    successes_remaining: Option<usize>,
}

/// Simulated CEC bus
///
/// The single internal mutex doubles as the serialization the [`CecBus`]
/// contract requires from adapters.
#[derive(Debug, Default)]
pub struct SimBus {
    state: Mutex<SimState>,
}

impl SimBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a device to the topology. Devices keep insertion order, which is
    /// the bus address order enumerations report.
    pub fn with_device(self, device: SimDevice) -> Self {
        let mut state = self.state.into_inner();
        state.devices.push(device);
        Self {
            state: Mutex::new(state),
        }
    }

    /// A small living-room topology for development deployments: a TV on
    /// 0.0.0.0, a playback device on input 1 acting as the current source,
    /// and an audio system.
    pub fn with_default_topology() -> Self {
        Self::new()
            .with_device(
                SimDevice::new(LogicalAddress::TV, "TV")
                    .at("0.0.0.0")
                    .powered(PowerStatus::On)
                    .active(true),
            )
            .with_device(
                SimDevice::new(LogicalAddress::PLAYBACK_1, "Playback 1")
                    .at("1.0.0.0")
                    .powered(PowerStatus::On)
                    .active(true)
                    .active_source(true),
            )
            .with_device(
                SimDevice::new(LogicalAddress::AUDIO_SYSTEM, "Audio").at("2.0.0.0"),
            )
    }

    /// After the next `n` mutating calls succeed, every further mutating
    /// call fails with a transmit error.
    pub fn fail_after(self, n: usize) -> Self {
        let mut state = self.state.into_inner();
        state.successes_remaining = Some(n);
        Self {
            state: Mutex::new(state),
        }
    }

    /// The mutating calls issued so far, in order.
    pub async fn calls(&self) -> Vec<BusCall> {
        self.state.lock().await.calls.clone()
    }

    /// Overwrites the power state of a device, bypassing the call log.
    pub async fn set_power(&self, address: LogicalAddress, power: PowerStatus) {
        let mut state = self.state.lock().await;
        if let Some(device) = state.devices.iter_mut().find(|d| d.address == address) {
            device.power = power;
        }
    }
}

impl SimState {
    fn device(&self, address: LogicalAddress) -> Result<&SimDevice> {
        self.devices
            .iter()
            .find(|d| d.address == address)
            .ok_or_else(|| BusError::Query(format!("No device at address {address}")))
    }

    fn record(&mut self, call: BusCall) -> Result<()> {
        match self.successes_remaining {
            Some(0) => Err(BusError::Transmit("Injected bus failure".to_string())),
            Some(ref mut remaining) => {
                *remaining -= 1;
                trace!(?call, "Sim bus call");
                self.calls.push(call);
                Ok(())
            }
            None => {
                trace!(?call, "Sim bus call");
                self.calls.push(call);
                Ok(())
            }
        }
    }
}

#[async_trait]
impl CecBus for SimBus {
    async fn list(&self) -> Result<Vec<Device>> {
        let state = self.state.lock().await;
        Ok(state
            .devices
            .iter()
            .map(|d| Device {
                logical_address: d.address,
                osd_name: d.osd_name.clone(),
                vendor: d.vendor.clone(),
                physical_address: d.physical_address.clone(),
                power_status: d.power.clone(),
                active: d.active,
                active_source: d.active_source,
            })
            .collect())
    }

    async fn address_by_name(&self, name: &str) -> Result<Option<LogicalAddress>> {
        let state = self.state.lock().await;
        let by_osd = state
            .devices
            .iter()
            .find(|d| d.osd_name.eq_ignore_ascii_case(name))
            .map(|d| d.address);
        Ok(by_osd.or_else(|| LogicalAddress::from_role_name(name)))
    }

    async fn power_status(&self, address: LogicalAddress) -> Result<PowerStatus> {
        let state = self.state.lock().await;
        Ok(state.device(address)?.power.clone())
    }

    async fn active_devices(&self) -> Result<Vec<(LogicalAddress, bool)>> {
        let state = self.state.lock().await;
        Ok(state.devices.iter().map(|d| (d.address, d.active)).collect())
    }

    async fn is_active_source(&self, address: LogicalAddress) -> Result<bool> {
        let state = self.state.lock().await;
        Ok(state.device(address)?.active_source)
    }

    async fn physical_address(&self, address: LogicalAddress) -> Result<PhysicalAddress> {
        let state = self.state.lock().await;
        Ok(state.device(address)?.physical_address.clone())
    }

    async fn power_on(&self, address: LogicalAddress) -> Result<()> {
        let mut state = self.state.lock().await;
        state.record(BusCall::PowerOn(address))?;
        if let Some(device) = state.devices.iter_mut().find(|d| d.address == address) {
            device.power = PowerStatus::On;
        }
        Ok(())
    }

    async fn standby(&self, address: LogicalAddress) -> Result<()> {
        let mut state = self.state.lock().await;
        state.record(BusCall::Standby(address))?;
        if let Some(device) = state.devices.iter_mut().find(|d| d.address == address) {
            device.power = PowerStatus::Standby;
        }
        Ok(())
    }

    async fn volume_up(&self) -> Result<()> {
        self.state.lock().await.record(BusCall::VolumeUp)
    }

    async fn volume_down(&self) -> Result<()> {
        self.state.lock().await.record(BusCall::VolumeDown)
    }

    async fn mute(&self) -> Result<()> {
        self.state.lock().await.record(BusCall::Mute)
    }

    async fn send_key(&self, address: LogicalAddress, key: KeyCode) -> Result<()> {
        self.state
            .lock()
            .await
            .record(BusCall::Key(address, key.code()))
    }

    async fn transmit(&self, command: RawCommand) -> Result<()> {
        self.state
            .lock()
            .await
            .record(BusCall::Transmit(command.as_str().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tv() -> SimDevice {
        SimDevice::new(LogicalAddress::TV, "TV")
            .at("0.0.0.0")
            .powered(PowerStatus::On)
            .active(true)
    }

    #[tokio::test]
    async fn test_address_by_name_prefers_live_osd_names() {
        // A device announcing the OSD name "Audio" shadows the static role
        // entry for logical address 5.
        let bus = SimBus::new().with_device(
            SimDevice::new(LogicalAddress::new(4).unwrap(), "Audio").at("1.0.0.0"),
        );
        assert_eq!(
            bus.address_by_name("audio").await.unwrap(),
            LogicalAddress::new(4)
        );
    }

    #[tokio::test]
    async fn test_address_by_name_falls_back_to_role_table() {
        let bus = SimBus::new();
        assert_eq!(
            bus.address_by_name("tv").await.unwrap(),
            Some(LogicalAddress::TV)
        );
        assert_eq!(bus.address_by_name("toaster").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_power_on_updates_device_state() {
        let bus = SimBus::new().with_device(tv().powered(PowerStatus::Standby));
        bus.power_on(LogicalAddress::TV).await.unwrap();
        assert_eq!(
            bus.power_status(LogicalAddress::TV).await.unwrap(),
            PowerStatus::On
        );
        assert_eq!(bus.calls().await, vec![BusCall::PowerOn(LogicalAddress::TV)]);
    }

    #[tokio::test]
    async fn test_fail_after_rejects_later_calls() {
        let bus = SimBus::new().with_device(tv()).fail_after(2);
        bus.volume_up().await.unwrap();
        bus.volume_down().await.unwrap();
        assert!(bus.mute().await.is_err());
        // Failed calls are not recorded.
        assert_eq!(bus.calls().await.len(), 2);
    }

    #[tokio::test]
    async fn test_query_for_missing_device_fails() {
        let bus = SimBus::new();
        assert!(bus.power_status(LogicalAddress::TV).await.is_err());
    }
}
