use cec_bus::{SharedBus, SimBus};
use cec_web::{config, logging, GatewayContext, GatewayServer, Options};
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

/// Opens the bus adapter selected by the options.
///
/// The `sim` adapter id always resolves to the in-memory bus. Real adapter
/// ids need the `hardware` feature; without it the gateway falls back to
/// the simulated bus so development builds stay runnable.
fn open_bus(options: &Options) -> Result<SharedBus, cec_bus::BusError> {
    if options.adapter.as_deref() == Some(config::SIM_ADAPTER) {
        info!("Using simulated CEC bus");
        return Ok(Arc::new(SimBus::with_default_topology()));
    }

    #[cfg(feature = "hardware")]
    {
        let bus = cec_bus::LibCecBus::open(&options.bus_config())?;
        Ok(Arc::new(bus))
    }

    #[cfg(not(feature = "hardware"))]
    {
        tracing::warn!(
            adapter = options.adapter.as_deref().unwrap_or("autodetect"),
            "Built without the hardware feature; using the simulated CEC bus"
        );
        Ok(Arc::new(SimBus::with_default_topology()))
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let options = Options::parse();

    if let Err(e) = logging::init() {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    let bus = match open_bus(&options) {
        Ok(bus) => bus,
        Err(e) => {
            error!(error = %e, "Could not open CEC adapter");
            return ExitCode::FAILURE;
        }
    };

    let context = GatewayContext::new(bus);
    let server = match GatewayServer::start(options.listen_addr(), context) {
        Ok(server) => server,
        Err(e) => {
            error!(error = %e, "Could not start HTTP server");
            return ExitCode::FAILURE;
        }
    };

    server.run_until_ctrl_c().await;
    ExitCode::SUCCESS
}
