//! HDMI-CEC bus adapter boundary.
//!
//! This crate is the seam between the cec-web gateway and the physical CEC
//! bus. It owns the CEC domain vocabulary (logical and physical addresses,
//! power states, key codes, raw frames) and the [`CecBus`] trait every bus
//! backend implements.
//!
//! # Overview
//!
//! - [`CecBus`]: the adapter trait. One implementation is constructed at
//!   startup and shared (as [`SharedBus`]) by everything that talks to the
//!   bus. Implementations serialize physical bus access internally, so all
//!   methods are safe to call from concurrent tasks.
//! - [`SimBus`]: an in-memory bus with a configurable device table and an
//!   ordered call log. Used by tests throughout the workspace and by
//!   development deployments via the `sim` adapter id.
//! - `LibCecBus` (feature `hardware`): the libcec-backed adapter for real
//!   hardware.
//!
//! # Example
//!
//! ```
//! use cec_bus::{CecBus, LogicalAddress, PowerStatus, SimBus, SimDevice};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), cec_bus::BusError> {
//! let bus = SimBus::new().with_device(
//!     SimDevice::new(LogicalAddress::TV, "TV").powered(PowerStatus::On),
//! );
//!
//! let address = bus.address_by_name("tv").await?.unwrap();
//! assert_eq!(bus.power_status(address).await?, PowerStatus::On);
//! # Ok(())
//! # }
//! ```
//!
//! # Private Workspace Crate
//!
//! This crate is intended for internal use within the workspace and is not
//! published to crates.io.

pub mod address;
pub mod client;
pub mod device;
pub mod error;
pub mod keys;
pub mod power;
pub mod sim;

#[cfg(feature = "hardware")]
pub mod libcec;

pub use address::{LogicalAddress, PhysicalAddress};
pub use client::{BusConfig, CecBus, DeviceType, RawCommand, SharedBus};
pub use device::Device;
pub use error::BusError;
pub use keys::KeyCode;
pub use power::PowerStatus;
pub use sim::{BusCall, SimBus, SimDevice};

#[cfg(feature = "hardware")]
pub use libcec::LibCecBus;
