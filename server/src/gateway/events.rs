//! Decoding of FlightSuretyApp event logs

use std::sync::OnceLock;

use crate::eth::abi::{self, AbiError, ParamKind, Token};
use crate::eth::{Log, H256};
use crate::models::{ContractEvent, FlightStatusInfo, OracleRequest};

use super::methods::{FLIGHT_STATUS_INFO_EVENT, ORACLE_REQUEST_EVENT};

pub fn oracle_request_topic() -> H256 {
    static TOPIC: OnceLock<H256> = OnceLock::new();
    *TOPIC.get_or_init(|| abi::event_topic(ORACLE_REQUEST_EVENT))
}

pub fn flight_status_info_topic() -> H256 {
    static TOPIC: OnceLock<H256> = OnceLock::new();
    *TOPIC.get_or_init(|| abi::event_topic(FLIGHT_STATUS_INFO_EVENT))
}

/// Decodes a log into a known event. `Ok(None)` means the log belongs to an
/// event this server does not follow.
pub fn decode_event(log: &Log) -> Result<Option<ContractEvent>, AbiError> {
    let Some(topic) = log.topics.first() else {
        return Ok(None);
    };

    if *topic == oracle_request_topic() {
        let [index, airline, flight, timestamp] = decode_four(
            &[ParamKind::Uint, ParamKind::Address, ParamKind::String, ParamKind::Uint],
            &log.data,
        )?;

        return Ok(Some(ContractEvent::OracleRequest(OracleRequest {
            index: index.into_u8()?,
            airline: airline.into_address()?,
            flight: flight.into_string()?,
            timestamp: timestamp.into_u64()?,
            block_number: log.block_number,
        })));
    }

    if *topic == flight_status_info_topic() {
        let [airline, flight, timestamp, status] = decode_four(
            &[ParamKind::Address, ParamKind::String, ParamKind::Uint, ParamKind::Uint],
            &log.data,
        )?;

        return Ok(Some(ContractEvent::FlightStatusInfo(FlightStatusInfo {
            airline: airline.into_address()?,
            flight: flight.into_string()?,
            timestamp: timestamp.into_u64()?,
            status_code: status.into_u8()?,
            block_number: log.block_number,
        })));
    }

    Ok(None)
}

fn decode_four(kinds: &[ParamKind; 4], data: &[u8]) -> Result<[Token; 4], AbiError> {
    let tokens = abi::decode(kinds, data)?;
    // decode yields exactly one token per kind
    tokens.try_into().map_err(|_| AbiError::ShortData {
        needed: 4 * 32,
        got: data.len(),
    })
}
