//! Command translation and addressing core for the cec-web gateway.
//!
//! This crate maps HTTP-shaped intents (device names, channel digits, key
//! identifiers, raw command strings) onto CEC bus primitives, and interprets
//! raw bus state into the answers the HTTP surface reports. It talks to the
//! bus exclusively through the [`cec_bus::CecBus`] trait, so everything here
//! is testable against the in-memory `SimBus`.
//!
//! # Components
//!
//! - [`AddressResolver`]: device name to logical address; unknown names are
//!   a hard error, never a default.
//! - [`CommandTranslator`]: power, volume, key, channel and raw-transmit
//!   intents to bus primitive sequences. Multi-digit channel entry becomes
//!   an ordered sequence of digit key presses; multi-step sequences abort
//!   on the first failing step.
//! - [`StateInterpreter`]: power tri-state reduction and active-source
//!   discovery.
//!
//! Nothing in this crate holds mutable state: every answer is derived per
//! call from the live bus and discarded.

pub mod error;
pub mod interpreter;
pub mod resolver;
pub mod translator;

pub use error::{GatewayError, Result};
pub use interpreter::{PowerReport, SourceStatus, StateInterpreter};
pub use resolver::AddressResolver;
pub use translator::{CommandTranslator, VolumeCommand};
