//! Application state shared across handlers

use std::sync::Arc;

use crate::gateway::FlightSuretyGateway;
use crate::oracle::SimulatorState;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<FlightSuretyGateway>,
    pub simulator: SimulatorState,
}

impl AppState {
    pub fn new(gateway: Arc<FlightSuretyGateway>, simulator: SimulatorState) -> Self {
        Self { gateway, simulator }
    }
}
