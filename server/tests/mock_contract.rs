#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use flightsurety_server::error::GatewayError;
use flightsurety_server::eth::{Address, TxReceipt, H256, U256};
use flightsurety_server::models::{ContractEvent, FlightStatus, OracleRequest, OracleResponse};
use flightsurety_server::oracle::{OracleContract, StatusSource};

/// In-memory oracle registry with caller-chosen index assignments
#[derive(Default)]
pub struct MockOracleContract {
    pub accounts: Vec<Address>,
    pub assigned: HashMap<Address, [u8; 3]>,
    pub registered: Mutex<HashSet<Address>>,
    pub responses: Mutex<Vec<(Address, OracleResponse)>>,
    pub rejecting: HashSet<Address>,
    /// 1-based fee queries that fail
    pub failing_fee_calls: HashSet<usize>,
    pub fee_calls: AtomicUsize,
    pub events: Mutex<Vec<ContractEvent>>,
    pub event_ranges: Mutex<Vec<(u64, u64)>>,
    pub latest: AtomicU64,
    pub fail_next_poll: AtomicBool,
    pub fail_accounts: bool,
    tx_counter: AtomicU64,
}

/// `[p % 10, (p + 1) % 10, (p + 2) % 10]`, so consecutive positions overlap
/// and ten oracles already cover every index.
pub fn deterministic_indexes(position: u64) -> [u8; 3] {
    [
        (position % 10) as u8,
        ((position + 1) % 10) as u8,
        ((position + 2) % 10) as u8,
    ]
}

pub fn account(position: u64) -> Address {
    Address::from_low_u64_be(position + 1)
}

impl MockOracleContract {
    /// `count` accounts; every non-owner account gets deterministic indexes.
    pub fn with_accounts(count: u64) -> Self {
        let accounts: Vec<Address> = (0..count).map(account).collect();
        let assigned = (1..count)
            .map(|position| (account(position), deterministic_indexes(position)))
            .collect();
        Self {
            accounts,
            assigned,
            ..Self::default()
        }
    }

    pub fn assign(mut self, position: u64, indexes: [u8; 3]) -> Self {
        self.assigned.insert(account(position), indexes);
        self
    }

    pub fn rejecting_responses_from(mut self, position: u64) -> Self {
        self.rejecting.insert(account(position));
        self
    }

    pub fn failing_accounts(mut self) -> Self {
        self.fail_accounts = true;
        self
    }

    pub fn failing_fee_call(mut self, call: usize) -> Self {
        self.failing_fee_calls.insert(call);
        self
    }

    pub async fn preregister(&self, position: u64) {
        self.registered.lock().await.insert(account(position));
    }

    pub async fn push_event(&self, event: ContractEvent) {
        let block = event.block_number();
        self.events.lock().await.push(event);
        self.latest.fetch_max(block, Ordering::SeqCst);
    }

    fn receipt(&self) -> TxReceipt {
        let n = self.tx_counter.fetch_add(1, Ordering::SeqCst) + 1;
        TxReceipt {
            transaction_hash: H256::from_low_u64_be(n),
            block_number: self.latest.load(Ordering::SeqCst),
            success: true,
        }
    }
}

#[async_trait]
impl OracleContract for MockOracleContract {
    async fn accounts(&self) -> Result<Vec<Address>, GatewayError> {
        if self.fail_accounts {
            return Err(GatewayError::Network("connection refused".into()));
        }
        Ok(self.accounts.clone())
    }

    async fn registration_fee(&self) -> Result<U256, GatewayError> {
        let call = self.fee_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.failing_fee_calls.contains(&call) {
            return Err(GatewayError::Network("fee query timed out".into()));
        }
        Ok(U256::exp10(18))
    }

    async fn register_oracle(&self, oracle: Address, fee: U256) -> Result<TxReceipt, GatewayError> {
        if fee < U256::exp10(18) {
            return Err(GatewayError::Reverted("Registration fee is required".into()));
        }
        if !self.registered.lock().await.insert(oracle) {
            return Err(GatewayError::Reverted("Oracle already registered".into()));
        }
        Ok(self.receipt())
    }

    async fn get_my_indexes(&self, oracle: Address) -> Result<[u8; 3], GatewayError> {
        if !self.registered.lock().await.contains(&oracle) {
            return Err(GatewayError::Reverted("Not registered as an oracle".into()));
        }
        self.assigned
            .get(&oracle)
            .copied()
            .ok_or_else(|| GatewayError::Decode("no indexes assigned".into()))
    }

    async fn submit_oracle_response(
        &self,
        oracle: Address,
        response: &OracleResponse,
    ) -> Result<TxReceipt, GatewayError> {
        if self.rejecting.contains(&oracle) {
            return Err(GatewayError::Reverted(
                "Flight or timestamp do not match oracle request".into(),
            ));
        }
        self.responses.lock().await.push((oracle, response.clone()));
        Ok(self.receipt())
    }

    async fn latest_block(&self) -> Result<u64, GatewayError> {
        Ok(self.latest.load(Ordering::SeqCst))
    }

    async fn contract_events(
        &self,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<ContractEvent>, GatewayError> {
        if self.fail_next_poll.swap(false, Ordering::SeqCst) {
            return Err(GatewayError::Network("eth_getLogs failed".into()));
        }
        self.event_ranges.lock().await.push((from_block, to_block));
        Ok(self
            .events
            .lock()
            .await
            .iter()
            .filter(|event| (from_block..=to_block).contains(&event.block_number()))
            .cloned()
            .collect())
    }
}

/// Always reports the same status
pub struct FixedStatusSource(pub FlightStatus);

#[async_trait]
impl StatusSource for FixedStatusSource {
    async fn status_for(
        &self,
        _oracle: Address,
        _request: &OracleRequest,
    ) -> anyhow::Result<FlightStatus> {
        Ok(self.0)
    }
}

pub fn oracle_request(index: u8, block_number: u64) -> OracleRequest {
    OracleRequest {
        index,
        airline: Address::from_low_u64_be(0xa1),
        flight: "ND1309".into(),
        timestamp: 1_600_000_000,
        block_number,
    }
}
