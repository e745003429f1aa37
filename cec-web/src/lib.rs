//! Stateless REST gateway for the HDMI-CEC bus.
//!
//! Exposes power, volume, channel, key-press and raw-frame control of CEC
//! devices over HTTP. The HTTP layer here is deliberately thin: every route
//! parses its parameters, calls into [`cec_core`], and renders the result;
//! all protocol knowledge lives in the core and in the [`cec_bus`] adapter.
//!
//! # Routes
//!
//! | Method | Path | Success |
//! |---|---|---|
//! | GET | `/info` | 200, JSON device list |
//! | GET | `/sourcestatus` | 200, `INPUT HDMI N` |
//! | GET | `/power/:device` | 204 if on, 404 if standby |
//! | PUT | `/power/:device` | 204 |
//! | DELETE | `/power/:device` | 204 |
//! | PUT | `/volume/up` `/down` `/mute` | 204 |
//! | PUT | `/key/:device/:key` | 204 |
//! | PUT | `/channel/:device/:channel` | 200, echoes the channel |
//! | POST | `/transmit` | 204 |
//!
//! # Example
//!
//! ```no_run
//! use cec_bus::SimBus;
//! use cec_web::{GatewayContext, GatewayServer};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let bus = Arc::new(SimBus::with_default_topology());
//!     let context = GatewayContext::new(bus);
//!     let server = GatewayServer::start("127.0.0.1:8080".parse().unwrap(), context)
//!         .expect("bind failed");
//!     server.run_until_ctrl_c().await;
//! }
//! ```

pub mod config;
pub mod context;
pub mod logging;
pub mod routes;
pub mod server;

pub use config::Options;
pub use context::GatewayContext;
pub use server::{GatewayServer, ServerError};
