use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::error::GatewayError;
use crate::eth::{Address, H256};
use crate::models::{ContractEvent, FlightStatus, OracleRequest, OracleResponse};

use super::contract::OracleContract;
use super::registration::{register_oracles, RegisteredOracle};
use super::source::StatusSource;
use super::state::{SimulatorPhase, SimulatorState};
use super::subscription::EventSubscription;

#[derive(Debug, Clone, Copy)]
pub struct SimulatorSettings {
    /// Accounts `1..oracle_count` become oracles
    pub oracle_count: usize,
    pub poll_interval: Duration,
    pub block_range: u64,
}

impl Default for SimulatorSettings {
    fn default() -> Self {
        Self {
            oracle_count: 20,
            poll_interval: Duration::from_millis(2000),
            block_range: 500,
        }
    }
}

#[derive(Error, Debug)]
pub enum StartError {
    #[error("no oracle could be registered")]
    NoOraclesRegistered,

    #[error("oracle registration failed: {0}")]
    Registration(#[from] GatewayError),
}

/// What happened to one oracle's answer to a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ResponseOutcome {
    Submitted {
        oracle: Address,
        status: FlightStatus,
        tx_hash: H256,
    },
    Failed {
        oracle: Address,
        status: Option<FlightStatus>,
        reason: String,
    },
}

impl ResponseOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, ResponseOutcome::Submitted { .. })
    }
}

/// Registers a pool of oracle accounts and answers every `OracleRequest`
/// addressed to one of their indexes.
pub struct OracleSimulator {
    contract: Arc<dyn OracleContract>,
    source: Arc<dyn StatusSource>,
    settings: SimulatorSettings,
    state: SimulatorState,
    oracles: Vec<RegisteredOracle>,
}

impl OracleSimulator {
    pub fn new(
        contract: Arc<dyn OracleContract>,
        source: Arc<dyn StatusSource>,
        settings: SimulatorSettings,
        state: SimulatorState,
    ) -> Self {
        Self {
            contract,
            source,
            settings,
            state,
            oracles: Vec::new(),
        }
    }

    pub fn state(&self) -> &SimulatorState {
        &self.state
    }

    /// Registers the oracle pool. Fails when not a single oracle made it.
    pub async fn register(&mut self) -> Result<(), StartError> {
        self.state.set_phase(SimulatorPhase::Registering).await;

        let oracles = register_oracles(self.contract.as_ref(), self.settings.oracle_count).await;
        let oracles = match oracles {
            Ok(oracles) => oracles,
            Err(err) => {
                self.state.set_phase(SimulatorPhase::Idle).await;
                return Err(err.into());
            }
        };

        if oracles.is_empty() {
            self.state.set_phase(SimulatorPhase::Idle).await;
            return Err(StartError::NoOraclesRegistered);
        }

        info!(registered = oracles.len(), "oracle pool ready");
        self.state.set_oracles(oracles.clone()).await;
        self.oracles = oracles;
        Ok(())
    }

    /// Registers the pool, then follows the event log from block 0 forever.
    /// Only returns when registration fails.
    pub async fn run(mut self) -> Result<(), StartError> {
        self.register().await?;

        let subscription = EventSubscription::from_block(
            self.contract.clone(),
            0,
            self.settings.block_range,
            self.settings.poll_interval,
        )
        .reporting_to(self.state.clone());

        self.state.set_phase(SimulatorPhase::Listening).await;
        info!("listening for oracle requests");

        let mut events = Box::pin(subscription.into_stream());
        while let Some(next) = events.next().await {
            match next {
                Ok(event) => self.dispatch(event).await,
                Err(err) => error!(error = %err, "event poll cycle failed"),
            }
        }

        Ok(())
    }

    pub async fn dispatch(&self, event: ContractEvent) {
        match event {
            ContractEvent::OracleRequest(request) => {
                self.state.set_phase(SimulatorPhase::Responding).await;
                self.handle_request(&request).await;
                self.state.set_phase(SimulatorPhase::Listening).await;
            }
            ContractEvent::FlightStatusInfo(info) => {
                let status = FlightStatus::from_code(info.status_code)
                    .map(|status| status.to_string())
                    .unwrap_or_else(|| format!("UNRECOGNIZED ({})", info.status_code));
                info!(
                    airline = ?info.airline,
                    flight = %info.flight,
                    timestamp = info.timestamp,
                    %status,
                    "flight status finalized"
                );
                self.state.record_status(info).await;
            }
        }
    }

    /// Answers `request` from every registered oracle holding its index, one
    /// at a time in registration order.
    pub async fn handle_request(&self, request: &OracleRequest) -> Vec<ResponseOutcome> {
        let span = info_span!(
            "oracle_request",
            request_id = %Uuid::new_v4(),
            index = request.index,
            flight = %request.flight,
            block = request.block_number,
        );

        async {
            self.state.record_request().await;

            let mut outcomes = Vec::new();
            for oracle in self.oracles.iter().filter(|o| o.listens_to(request.index)) {
                outcomes.push(self.respond(oracle.address, request).await);
            }

            let submitted = outcomes.iter().filter(|o| o.is_submitted()).count() as u64;
            let failed = outcomes.len() as u64 - submitted;
            self.state.record_responses(submitted, failed).await;

            info!(responders = outcomes.len(), submitted, failed, "oracle request handled");
            outcomes
        }
        .instrument(span)
        .await
    }

    async fn respond(&self, oracle: Address, request: &OracleRequest) -> ResponseOutcome {
        let status = match self.source.status_for(oracle, request).await {
            Ok(status) => status,
            Err(err) => {
                warn!(oracle = ?oracle, error = %err, "status source failed");
                return ResponseOutcome::Failed {
                    oracle,
                    status: None,
                    reason: err.to_string(),
                };
            }
        };

        let response = OracleResponse::answering(request, status);
        match self.contract.submit_oracle_response(oracle, &response).await {
            Ok(receipt) => {
                info!(
                    oracle = ?oracle,
                    %status,
                    tx_hash = ?receipt.transaction_hash,
                    "oracle response submitted"
                );
                ResponseOutcome::Submitted {
                    oracle,
                    status,
                    tx_hash: receipt.transaction_hash,
                }
            }
            Err(err) => {
                warn!(oracle = ?oracle, %status, error = %err, "oracle response rejected");
                ResponseOutcome::Failed {
                    oracle,
                    status: Some(status),
                    reason: err.to_string(),
                }
            }
        }
    }
}
