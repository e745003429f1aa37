//! Device name resolution

use crate::error::{GatewayError, Result};
use cec_bus::{LogicalAddress, SharedBus};
use tracing::debug;

/// Maps human device names to logical bus addresses
///
/// Resolution is a pure lookup against the bus's current name table (live
/// OSD names, falling back to the static CEC role table). An unresolvable
/// name is a hard [`GatewayError::UnknownDevice`], never a default address,
/// and no bus mutation happens on the resolution path.
#[derive(Clone)]
pub struct AddressResolver {
    bus: SharedBus,
}

impl AddressResolver {
    pub fn new(bus: SharedBus) -> Self {
        Self { bus }
    }

    /// Resolves `name` to a logical address.
    pub async fn resolve(&self, name: &str) -> Result<LogicalAddress> {
        match self.bus.address_by_name(name).await? {
            Some(address) => {
                debug!(name, %address, "Resolved device name");
                Ok(address)
            }
            None => Err(GatewayError::UnknownDevice(name.to_string())),
        }
    }
}
