//! State interpretation: raw bus state into HTTP-shaped answers

use crate::error::{GatewayError, Result};
use crate::resolver::AddressResolver;
use cec_bus::{BusError, LogicalAddress, PowerStatus, SharedBus};
use tracing::debug;

/// The two power outcomes the HTTP surface distinguishes
///
/// The bus reports three states; the gateway deliberately collapses them to
/// two outcomes plus an error so that clients polling "can I assume it's
/// on?" get a plain yes (204) or no (404). An out-of-enumeration state is
/// never folded into `Standby`: it surfaces as
/// [`GatewayError::InconsistentPowerState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerReport {
    On,
    Standby,
}

/// The device currently driving the display, and through which HDMI input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceStatus {
    pub address: LogicalAddress,
    pub hdmi_input: u8,
}

impl SourceStatus {
    /// The human-readable body the `/sourcestatus` route returns.
    pub fn message(&self) -> String {
        format!("INPUT HDMI {}", self.hdmi_input)
    }
}

/// Answers status queries from the live bus view
#[derive(Clone)]
pub struct StateInterpreter {
    bus: SharedBus,
    resolver: AddressResolver,
}

impl StateInterpreter {
    pub fn new(bus: SharedBus) -> Self {
        let resolver = AddressResolver::new(bus.clone());
        Self { bus, resolver }
    }

    /// Reduces a device's power state to the two-outcome report.
    pub async fn power_report(&self, device: &str) -> Result<PowerReport> {
        let address = self.resolver.resolve(device).await?;
        match self.bus.power_status(address).await? {
            PowerStatus::On => Ok(PowerReport::On),
            PowerStatus::Standby => Ok(PowerReport::Standby),
            PowerStatus::Unknown(raw) => Err(GatewayError::InconsistentPowerState {
                device: device.to_string(),
                state: raw,
            }),
        }
    }

    /// Finds the device that is both enumerated-active and flagged as the
    /// current source, and derives its top-level HDMI input number.
    ///
    /// At most one device should satisfy both conditions; if the bus
    /// reports more than one, the first in enumeration order wins (a
    /// defined tie-break, not an error). `Ok(None)` means no device
    /// qualifies right now.
    pub async fn source_status(&self) -> Result<Option<SourceStatus>> {
        for (address, active) in self.bus.active_devices().await? {
            if !active || !self.bus.is_active_source(address).await? {
                continue;
            }
            let physical = self.bus.physical_address(address).await?;
            let hdmi_input = physical.hdmi_input().ok_or_else(|| {
                GatewayError::Bus(BusError::Query(format!(
                    "Unparseable physical address for {address}: {physical}"
                )))
            })?;
            debug!(%address, %physical, hdmi_input, "Active source found");
            return Ok(Some(SourceStatus {
                address,
                hdmi_input,
            }));
        }
        Ok(None)
    }
}
