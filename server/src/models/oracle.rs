use std::fmt;

use serde::{Deserialize, Serialize};

use crate::eth::Address;

/// Flight status codes understood by the contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlightStatus {
    Unknown,
    OnTime,
    LateAirline,
    LateWeather,
    LateTechnical,
    LateOther,
}

impl FlightStatus {
    pub const ALL: [FlightStatus; 6] = [
        FlightStatus::Unknown,
        FlightStatus::OnTime,
        FlightStatus::LateAirline,
        FlightStatus::LateWeather,
        FlightStatus::LateTechnical,
        FlightStatus::LateOther,
    ];

    pub fn code(self) -> u8 {
        match self {
            FlightStatus::Unknown => 0,
            FlightStatus::OnTime => 10,
            FlightStatus::LateAirline => 20,
            FlightStatus::LateWeather => 30,
            FlightStatus::LateTechnical => 40,
            FlightStatus::LateOther => 50,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.code() == code)
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlightStatus::Unknown => "STATUS_CODE_UNKNOWN",
            FlightStatus::OnTime => "STATUS_CODE_ON_TIME",
            FlightStatus::LateAirline => "STATUS_CODE_LATE_AIRLINE",
            FlightStatus::LateWeather => "STATUS_CODE_LATE_WEATHER",
            FlightStatus::LateTechnical => "STATUS_CODE_LATE_TECHNICAL",
            FlightStatus::LateOther => "STATUS_CODE_LATE_OTHER",
        };
        write!(f, "{} ({})", name, self.code())
    }
}

/// `OracleRequest` event emitted when someone asks for a flight's status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OracleRequest {
    pub index: u8,
    pub airline: Address,
    pub flight: String,
    pub timestamp: u64,
    pub block_number: u64,
}

/// Answer an oracle submits for an [`OracleRequest`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OracleResponse {
    pub index: u8,
    pub airline: Address,
    pub flight: String,
    pub timestamp: u64,
    pub status: FlightStatus,
}

impl OracleResponse {
    pub fn answering(request: &OracleRequest, status: FlightStatus) -> Self {
        Self {
            index: request.index,
            airline: request.airline,
            flight: request.flight.clone(),
            timestamp: request.timestamp,
            status,
        }
    }
}

/// `FlightStatusInfo` event emitted once the contract accepts a status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlightStatusInfo {
    pub airline: Address,
    pub flight: String,
    pub timestamp: u64,
    /// Raw code; unknown codes are kept rather than dropped
    pub status_code: u8,
    pub block_number: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractEvent {
    OracleRequest(OracleRequest),
    FlightStatusInfo(FlightStatusInfo),
}

impl ContractEvent {
    pub fn block_number(&self) -> u64 {
        match self {
            ContractEvent::OracleRequest(request) => request.block_number,
            ContractEvent::FlightStatusInfo(info) => info.block_number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_contract_constants() {
        let codes: Vec<u8> = FlightStatus::ALL.iter().map(|s| s.code()).collect();
        assert_eq!(codes, vec![0, 10, 20, 30, 40, 50]);
    }

    #[test]
    fn from_code_rejects_unknown_values() {
        assert_eq!(FlightStatus::from_code(20), Some(FlightStatus::LateAirline));
        assert_eq!(FlightStatus::from_code(25), None);
    }

    #[test]
    fn display_names_the_constant() {
        assert_eq!(FlightStatus::LateWeather.to_string(), "STATUS_CODE_LATE_WEATHER (30)");
    }
}
