//! Chain-level value types exchanged with the JSON-RPC node

use serde_json::{json, Map, Value};

pub use primitive_types::{H160 as Address, H256, U256};

/// Parses a `0x`-prefixed (or bare) 20-byte hex address.
pub fn parse_address(value: &str) -> Option<Address> {
    let trimmed = value.trim();
    let hex_part = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    let bytes = hex::decode(hex_part).ok()?;
    if bytes.len() != 20 {
        return None;
    }
    Some(Address::from_slice(&bytes))
}

pub fn address_hex(address: &Address) -> String {
    format!("0x{}", hex::encode(address.as_bytes()))
}

pub fn h256_hex(hash: &H256) -> String {
    format!("0x{}", hex::encode(hash.as_bytes()))
}

pub fn quantity_hex(value: U256) -> String {
    format!("0x{:x}", value)
}

pub fn parse_h256(value: &str) -> Option<H256> {
    let bytes = hex::decode(value.strip_prefix("0x").unwrap_or(value)).ok()?;
    if bytes.len() != 32 {
        return None;
    }
    Some(H256::from_slice(&bytes))
}

pub fn parse_quantity(value: &str) -> Option<u64> {
    let digits = value.strip_prefix("0x")?;
    if digits.is_empty() {
        return Some(0);
    }
    u64::from_str_radix(digits, 16).ok()
}

pub fn parse_bytes(value: &str) -> Option<Vec<u8>> {
    hex::decode(value.strip_prefix("0x").unwrap_or(value)).ok()
}

/// Parameters of an `eth_call` or `eth_sendTransaction`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
    pub from: Address,
    pub to: Address,
    pub value: Option<U256>,
    pub gas: Option<u64>,
    pub data: Vec<u8>,
}

impl CallRequest {
    pub fn new(from: Address, to: Address, data: Vec<u8>) -> Self {
        Self {
            from,
            to,
            value: None,
            gas: None,
            data,
        }
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_gas(mut self, gas: u64) -> Self {
        self.gas = Some(gas);
        self
    }

    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        object.insert("from".into(), json!(address_hex(&self.from)));
        object.insert("to".into(), json!(address_hex(&self.to)));
        object.insert("data".into(), json!(format!("0x{}", hex::encode(&self.data))));
        if let Some(value) = self.value {
            object.insert("value".into(), json!(quantity_hex(value)));
        }
        if let Some(gas) = self.gas {
            object.insert("gas".into(), json!(format!("0x{:x}", gas)));
        }
        Value::Object(object)
    }
}

/// Mined transaction outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub transaction_hash: H256,
    pub block_number: u64,
    pub success: bool,
}

/// Raw event log entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Log {
    pub address: Address,
    pub topics: Vec<H256>,
    pub data: Vec<u8>,
    pub block_number: u64,
    pub transaction_hash: Option<H256>,
    pub log_index: u64,
}

/// `eth_getLogs` filter over one contract, matching any of `topics` in position 0
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFilter {
    pub address: Address,
    pub topics: Vec<H256>,
    pub from_block: u64,
    pub to_block: u64,
}

impl LogFilter {
    pub fn to_json(&self) -> Value {
        let topics: Vec<String> = self.topics.iter().map(h256_hex).collect();
        json!({
            "address": address_hex(&self.address),
            "fromBlock": format!("0x{:x}", self.from_block),
            "toBlock": format!("0x{:x}", self.to_block),
            "topics": [topics],
        })
    }
}
