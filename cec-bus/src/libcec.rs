//! libcec-backed bus adapter
//!
//! Wraps a `cec_rs::CecConnection` behind the [`CecBus`] trait. Only built
//! with the `hardware` feature, which requires the native libcec library at
//! link time.

use crate::address::{LogicalAddress, PhysicalAddress};
use crate::client::{BusConfig, CecBus, DeviceType, RawCommand};
use crate::device::Device;
use crate::error::{BusError, Result};
use crate::keys::KeyCode;
use crate::power::PowerStatus;
use async_trait::async_trait;
use cec_rs::{
    CecCommand, CecConnection, CecConnectionCfgBuilder, CecDatapacket, CecDeviceType,
    CecDeviceTypeVec, CecLogicalAddress, CecOpcode, CecPowerStatus, CecUserControlCode,
};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

/// CEC bus adapter backed by libcec
///
/// The connection is held behind a mutex: libcec drives a single serial
/// medium, and the mutex gives concurrent callers the consistent ordering
/// the [`CecBus`] contract promises.
pub struct LibCecBus {
    connection: Mutex<CecConnection>,
}

impl LibCecBus {
    /// Opens the adapter described by `config`.
    pub fn open(config: &BusConfig) -> Result<Self> {
        let device_type = match config.device_type {
            DeviceType::Tv => CecDeviceType::Tv,
            DeviceType::Recorder => CecDeviceType::RecordingDevice,
            DeviceType::Tuner => CecDeviceType::Tuner,
            DeviceType::Playback => CecDeviceType::PlaybackDevice,
            DeviceType::Audio => CecDeviceType::AudioSystem,
        };

        let mut builder = CecConnectionCfgBuilder::default()
            .device_name(config.osd_name.clone())
            .device_types(CecDeviceTypeVec::new(device_type))
            .activate_source(false);
        if let Some(port) = &config.adapter {
            builder = builder.port(port.clone());
        }

        let connection = builder
            .build()
            .map_err(|e| BusError::Open(format!("Invalid adapter configuration: {e:?}")))?
            .open()
            .map_err(|e| BusError::Open(format!("{e:?}")))?;

        debug!(osd_name = %config.osd_name, "CEC adapter opened");
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }
}

fn to_cec_address(address: LogicalAddress) -> Result<CecLogicalAddress> {
    CecLogicalAddress::try_from(i32::from(address.value()))
        .map_err(|_| BusError::Query(format!("Address {address} not representable")))
}

fn from_power_status(status: CecPowerStatus) -> PowerStatus {
    match status {
        CecPowerStatus::On => PowerStatus::On,
        CecPowerStatus::Standby => PowerStatus::Standby,
        other => PowerStatus::Unknown(format!("{other:?}")),
    }
}

fn format_physical_address(packed: u16) -> PhysicalAddress {
    PhysicalAddress::new(format!(
        "{}.{}.{}.{}",
        (packed >> 12) & 0xF,
        (packed >> 8) & 0xF,
        (packed >> 4) & 0xF,
        packed & 0xF
    ))
}

#[async_trait]
impl CecBus for LibCecBus {
    async fn list(&self) -> Result<Vec<Device>> {
        let connection = self.connection.lock().await;
        let actives = connection.get_active_devices();

        let mut devices = Vec::new();
        for raw in 0..15u8 {
            let address = match LogicalAddress::new(raw) {
                Some(address) => address,
                None => continue,
            };
            let cec_address = to_cec_address(address)?;
            let active = actives.contains(cec_address);
            if !active {
                continue;
            }
            devices.push(Device {
                logical_address: address,
                osd_name: connection.get_device_osd_name(cec_address).to_string(),
                vendor: format!("{:?}", connection.get_device_vendor_id(cec_address)),
                physical_address: format_physical_address(
                    connection.get_device_physical_address(cec_address),
                ),
                power_status: from_power_status(
                    connection.get_device_power_status(cec_address),
                ),
                active,
                active_source: connection.is_active_source(cec_address),
            });
        }
        Ok(devices)
    }

    async fn address_by_name(&self, name: &str) -> Result<Option<LogicalAddress>> {
        let connection = self.connection.lock().await;
        let actives = connection.get_active_devices();
        for raw in 0..15u8 {
            let Some(address) = LogicalAddress::new(raw) else {
                continue;
            };
            let cec_address = to_cec_address(address)?;
            if actives.contains(cec_address)
                && connection
                    .get_device_osd_name(cec_address)
                    .to_string()
                    .eq_ignore_ascii_case(name)
            {
                return Ok(Some(address));
            }
        }
        Ok(LogicalAddress::from_role_name(name))
    }

    async fn power_status(&self, address: LogicalAddress) -> Result<PowerStatus> {
        let connection = self.connection.lock().await;
        Ok(from_power_status(
            connection.get_device_power_status(to_cec_address(address)?),
        ))
    }

    async fn active_devices(&self) -> Result<Vec<(LogicalAddress, bool)>> {
        let connection = self.connection.lock().await;
        let actives = connection.get_active_devices();
        let mut result = Vec::with_capacity(15);
        for raw in 0..15u8 {
            let Some(address) = LogicalAddress::new(raw) else {
                continue;
            };
            result.push((address, actives.contains(to_cec_address(address)?)));
        }
        Ok(result)
    }

    async fn is_active_source(&self, address: LogicalAddress) -> Result<bool> {
        let connection = self.connection.lock().await;
        Ok(connection.is_active_source(to_cec_address(address)?))
    }

    async fn physical_address(&self, address: LogicalAddress) -> Result<PhysicalAddress> {
        let connection = self.connection.lock().await;
        Ok(format_physical_address(
            connection.get_device_physical_address(to_cec_address(address)?),
        ))
    }

    async fn power_on(&self, address: LogicalAddress) -> Result<()> {
        let connection = self.connection.lock().await;
        connection
            .send_power_on_devices(to_cec_address(address)?)
            .map_err(|e| BusError::Transmit(format!("{e:?}")))
    }

    async fn standby(&self, address: LogicalAddress) -> Result<()> {
        let connection = self.connection.lock().await;
        connection
            .send_standby_devices(to_cec_address(address)?)
            .map_err(|e| BusError::Transmit(format!("{e:?}")))
    }

    async fn volume_up(&self) -> Result<()> {
        let connection = self.connection.lock().await;
        connection
            .volume_up(true)
            .map_err(|e| BusError::Transmit(format!("{e:?}")))
    }

    async fn volume_down(&self) -> Result<()> {
        let connection = self.connection.lock().await;
        connection
            .volume_down(true)
            .map_err(|e| BusError::Transmit(format!("{e:?}")))
    }

    async fn mute(&self) -> Result<()> {
        let connection = self.connection.lock().await;
        connection
            .audio_toggle_mute()
            .map_err(|e| BusError::Transmit(format!("{e:?}")))
    }

    async fn send_key(&self, address: LogicalAddress, key: KeyCode) -> Result<()> {
        let control_code = CecUserControlCode::try_from(u32::from(key.code()))
            .map_err(|_| BusError::Transmit(format!("Key {key} has no CEC control code")))?;
        let connection = self.connection.lock().await;
        let cec_address = to_cec_address(address)?;
        connection
            .send_keypress(cec_address, control_code, true)
            .map_err(|e| BusError::Transmit(format!("{e:?}")))?;
        connection
            .send_key_release(cec_address, true)
            .map_err(|e| BusError::Transmit(format!("{e:?}")))
    }

    async fn transmit(&self, command: RawCommand) -> Result<()> {
        let bytes = command.bytes()?;
        let (header, rest) = bytes
            .split_first()
            .ok_or_else(|| BusError::Transmit(format!("Empty frame: {command}")))?;

        let initiator = CecLogicalAddress::try_from(i32::from(header >> 4))
            .map_err(|_| BusError::Transmit(format!("Bad initiator in frame: {command}")))?;
        let destination = CecLogicalAddress::try_from(i32::from(header & 0x0F))
            .map_err(|_| BusError::Transmit(format!("Bad destination in frame: {command}")))?;

        let opcode_set = !rest.is_empty();
        let opcode = match rest.first() {
            Some(byte) => CecOpcode::try_from(u32::from(*byte))
                .map_err(|_| BusError::Transmit(format!("Unknown opcode in frame: {command}")))?,
            None => CecOpcode::FeatureAbort,
        };
        let mut parameters = CecDatapacket::default();
        for byte in rest.iter().skip(1) {
            parameters.0.push(*byte);
        }

        let frame = CecCommand {
            initiator,
            destination,
            ack: false,
            eom: true,
            opcode,
            parameters,
            opcode_set,
            transmit_timeout: Duration::from_millis(1000),
        };

        let connection = self.connection.lock().await;
        connection
            .transmit(frame)
            .map_err(|e| BusError::Transmit(format!("{e:?}")))
    }
}
