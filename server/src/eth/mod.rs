//! Ethereum primitives: JSON-RPC transport, ABI codec and unit conversion

pub mod abi;
pub mod client;
pub mod types;
pub mod units;

pub use client::{ChainClient, HttpChainClient};
pub use types::{parse_address, Address, CallRequest, Log, LogFilter, TxReceipt, H256, U256};
