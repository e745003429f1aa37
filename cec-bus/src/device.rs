//! Device enumeration record

use crate::address::{LogicalAddress, PhysicalAddress};
use crate::power::PowerStatus;
use serde::Serialize;

/// One device as seen in a live bus enumeration
///
/// This is a point-in-time snapshot: nothing in it is cached between
/// requests, every enumeration rebuilds it from the bus. The field set
/// matches what the gateway's `/info` endpoint exposes as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct Device {
    /// Logical address the device registered under
    pub logical_address: LogicalAddress,
    /// On-screen-display name the device announces on the bus
    pub osd_name: String,
    /// Vendor name, or an empty string when the bus does not know it
    pub vendor: String,
    /// Position in the HDMI topology
    pub physical_address: PhysicalAddress,
    /// Power state at enumeration time
    pub power_status: PowerStatus,
    /// Whether the device is currently reporting activity on the bus
    pub active: bool,
    /// Whether the device is the current active source
    pub active_source: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_to_flat_json() {
        let device = Device {
            logical_address: LogicalAddress::TV,
            osd_name: "Living Room TV".to_string(),
            vendor: "Samsung".to_string(),
            physical_address: PhysicalAddress::new("0.0.0.0"),
            power_status: PowerStatus::On,
            active: true,
            active_source: false,
        };

        let json: serde_json::Value = serde_json::to_value(&device).unwrap();
        assert_eq!(json["logical_address"], 0);
        assert_eq!(json["osd_name"], "Living Room TV");
        assert_eq!(json["physical_address"], "0.0.0.0");
        assert_eq!(json["power_status"], "on");
        assert_eq!(json["active_source"], false);
    }
}
