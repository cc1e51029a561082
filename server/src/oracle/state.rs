//! Read-only view of the simulator shared with the HTTP layer

use std::collections::VecDeque;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::models::FlightStatusInfo;

use super::registration::RegisteredOracle;

const RECENT_STATUS_LIMIT: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SimulatorPhase {
    #[default]
    Idle,
    Registering,
    Listening,
    Responding,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SimulatorSnapshot {
    pub phase: SimulatorPhase,
    pub oracles: Vec<RegisteredOracle>,
    pub requests_seen: u64,
    pub responses_submitted: u64,
    pub responses_failed: u64,
    /// Next block the event cursor will read from
    pub next_block: u64,
    pub recent_statuses: VecDeque<FlightStatusInfo>,
}

/// Written only by the simulator task; readers get clones.
#[derive(Clone, Default)]
pub struct SimulatorState {
    inner: Arc<RwLock<SimulatorSnapshot>>,
}

impl SimulatorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> SimulatorSnapshot {
        self.inner.read().await.clone()
    }

    pub async fn set_phase(&self, phase: SimulatorPhase) {
        self.inner.write().await.phase = phase;
    }

    pub async fn set_oracles(&self, oracles: Vec<RegisteredOracle>) {
        self.inner.write().await.oracles = oracles;
    }

    pub async fn set_next_block(&self, block: u64) {
        self.inner.write().await.next_block = block;
    }

    pub async fn record_request(&self) {
        self.inner.write().await.requests_seen += 1;
    }

    pub async fn record_responses(&self, submitted: u64, failed: u64) {
        let mut snapshot = self.inner.write().await;
        snapshot.responses_submitted += submitted;
        snapshot.responses_failed += failed;
    }

    pub async fn record_status(&self, info: FlightStatusInfo) {
        let mut snapshot = self.inner.write().await;
        if snapshot.recent_statuses.len() == RECENT_STATUS_LIMIT {
            snapshot.recent_statuses.pop_front();
        }
        snapshot.recent_statuses.push_back(info);
    }
}
