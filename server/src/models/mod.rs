//! Data models for the FlightSurety server

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::eth::Address;

pub mod oracle;
pub use oracle::*;

/// API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// Outcome of a user-initiated transaction
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionNotice {
    pub notification: String,
    pub tx_hash: String,
    pub block_number: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OperationalStatus {
    pub operational: bool,
}

/// Request DTO for registering an airline
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterAirlineRequest {
    #[validate(length(min = 1))]
    pub address: String,
    #[validate(length(min = 1, max = 64))]
    pub name: String,
}

/// Request DTO for an airline paying its participation funding
#[derive(Debug, Deserialize, Validate)]
pub struct FundAirlineRequest {
    #[validate(length(min = 1))]
    pub airline: String,
    /// Ether, as entered by the user
    #[validate(length(min = 1))]
    pub amount: String,
}

/// Request DTO for buying flight insurance
#[derive(Debug, Deserialize, Validate)]
pub struct PurchaseInsuranceRequest {
    #[validate(length(min = 1))]
    pub airline: String,
    #[validate(length(min = 1, max = 32))]
    pub flight: String,
    /// Ether, as entered by the user
    #[validate(length(min = 1))]
    pub amount: String,
}

/// Request DTO for registering a flight
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterFlightRequest {
    #[validate(length(min = 1))]
    pub airline: String,
    #[validate(length(min = 1, max = 32))]
    pub flight: String,
    /// Unix seconds; defaults to now
    pub timestamp: Option<u64>,
}

/// Request DTO for asking the oracles about a flight
#[derive(Debug, Deserialize, Validate)]
pub struct FetchFlightStatusRequest {
    #[validate(length(min = 1, max = 32))]
    pub flight: String,
}

/// Payload echoed back after a status fetch was submitted
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FlightStatusQuery {
    pub airline: Address,
    pub flight: String,
    pub timestamp: u64,
}
