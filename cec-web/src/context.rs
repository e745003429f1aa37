//! Shared per-request context

use cec_bus::SharedBus;
use cec_core::{CommandTranslator, StateInterpreter};

/// Everything a request handler needs, cloned into each route filter
///
/// Built once at startup around the single bus adapter; cloning is cheap
/// (the bus handle is an `Arc`, the core services hold clones of it).
#[derive(Clone)]
pub struct GatewayContext {
    pub bus: SharedBus,
    pub translator: CommandTranslator,
    pub interpreter: StateInterpreter,
}

impl GatewayContext {
    pub fn new(bus: SharedBus) -> Self {
        let translator = CommandTranslator::new(bus.clone());
        let interpreter = StateInterpreter::new(bus.clone());
        Self {
            bus,
            translator,
            interpreter,
        }
    }
}
