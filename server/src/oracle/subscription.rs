//! Polling follower of the contract's event log
//!
//! The cursor starts at a caller-chosen block (0 to replay everything) and
//! advances in bounded `eth_getLogs` ranges. It only moves after a range has
//! been fetched successfully, so a failed poll is retried from the same block.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{self, Stream};
use tokio::time::sleep;
use tracing::debug;

use crate::error::GatewayError;
use crate::models::ContractEvent;

use super::contract::OracleContract;
use super::state::SimulatorState;

pub struct EventSubscription {
    contract: Arc<dyn OracleContract>,
    next_block: u64,
    block_range: u64,
    poll_interval: Duration,
    caught_up: bool,
    buffered: VecDeque<ContractEvent>,
    state: Option<SimulatorState>,
}

impl EventSubscription {
    pub fn from_block(
        contract: Arc<dyn OracleContract>,
        start: u64,
        block_range: u64,
        poll_interval: Duration,
    ) -> Self {
        Self {
            contract,
            next_block: start,
            block_range: block_range.max(1),
            poll_interval,
            caught_up: false,
            buffered: VecDeque::new(),
            state: None,
        }
    }

    /// Publishes the cursor position to `state` after every successful poll.
    pub fn reporting_to(mut self, state: SimulatorState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn next_block(&self) -> u64 {
        self.next_block
    }

    /// True once the last poll reached the chain head.
    pub fn caught_up(&self) -> bool {
        self.caught_up
    }

    /// Fetches the next block range, in chain order.
    pub async fn poll(&mut self) -> Result<Vec<ContractEvent>, GatewayError> {
        let latest = self.contract.latest_block().await?;
        if self.next_block > latest {
            self.caught_up = true;
            return Ok(Vec::new());
        }

        let to_block = latest.min(self.next_block.saturating_add(self.block_range - 1));
        let events = self.contract.contract_events(self.next_block, to_block).await?;

        debug!(
            from_block = self.next_block,
            to_block,
            events = events.len(),
            "polled contract events"
        );

        self.next_block = to_block + 1;
        self.caught_up = to_block >= latest;
        if let Some(state) = &self.state {
            state.set_next_block(self.next_block).await;
        }

        Ok(events)
    }

    /// Endless stream of events. Sleeps `poll_interval` whenever the head is
    /// reached with nothing new, and after yielding a poll error.
    pub fn into_stream(self) -> impl Stream<Item = Result<ContractEvent, GatewayError>> + Send {
        stream::unfold(self, |mut sub| async move {
            loop {
                if let Some(event) = sub.buffered.pop_front() {
                    return Some((Ok(event), sub));
                }

                match sub.poll().await {
                    Ok(events) => {
                        let idle = events.is_empty() && sub.caught_up;
                        sub.buffered.extend(events);
                        if idle {
                            sleep(sub.poll_interval).await;
                        }
                    }
                    Err(err) => {
                        sleep(sub.poll_interval).await;
                        return Some((Err(err), sub));
                    }
                }
            }
        })
    }
}
