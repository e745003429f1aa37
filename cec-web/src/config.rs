//! Startup configuration

use cec_bus::{BusConfig, DeviceType};
use clap::Parser;
use std::net::{IpAddr, SocketAddr};

/// Adapter id selecting the simulated bus instead of real hardware.
pub const SIM_ADAPTER: &str = "sim";

/// Command-line options for the gateway
#[derive(Debug, Clone, Parser)]
#[command(name = "cec-web", version, about = "REST gateway for the HDMI-CEC bus")]
pub struct Options {
    /// IP to listen on
    #[arg(short = 'i', long = "ip", default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// TCP port to listen on
    #[arg(short = 'p', long = "port", default_value_t = 8080)]
    pub port: u16,

    /// CEC adapter to connect to (RPI, a serial port path, ..., or "sim"
    /// for the built-in simulated bus)
    #[arg(short = 'a', long = "adapter")]
    pub adapter: Option<String>,

    /// OSD name to announce on the CEC bus
    #[arg(short = 'n', long = "name", default_value = "REST Gateway")]
    pub osd_name: String,

    /// The device type to register as
    #[arg(short = 't', long = "type", default_value = "tuner")]
    pub device_type: DeviceType,
}

impl Options {
    /// The socket address to bind the HTTP server to.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// The adapter-facing slice of the configuration.
    pub fn bus_config(&self) -> BusConfig {
        BusConfig {
            adapter: self
                .adapter
                .as_deref()
                .filter(|id| *id != SIM_ADAPTER)
                .map(str::to_string),
            osd_name: self.osd_name.clone(),
            device_type: self.device_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_announced_surface() {
        let options = Options::parse_from(["cec-web"]);
        assert_eq!(options.listen_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(options.osd_name, "REST Gateway");
        assert_eq!(options.device_type, DeviceType::Tuner);
        assert_eq!(options.adapter, None);
    }

    #[test]
    fn test_parses_short_flags() {
        let options =
            Options::parse_from(["cec-web", "-i", "0.0.0.0", "-p", "9090", "-a", "RPI", "-t", "playback"]);
        assert_eq!(options.listen_addr().to_string(), "0.0.0.0:9090");
        assert_eq!(options.adapter.as_deref(), Some("RPI"));
        assert_eq!(options.device_type, DeviceType::Playback);
    }

    #[test]
    fn test_sim_adapter_is_not_forwarded_to_the_bus_config() {
        let options = Options::parse_from(["cec-web", "--adapter", "sim"]);
        assert_eq!(options.bus_config().adapter, None);
    }
}
