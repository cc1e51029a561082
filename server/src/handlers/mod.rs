//! API handlers for the FlightSurety dapp
//!
//! Every action answers with an [`ApiResponse`] carrying a user-facing
//! notification. Failures keep the envelope and pick the HTTP status from the
//! error kind.

pub mod airline;
pub mod flight;
pub mod insurance;
pub mod oracle;
pub mod status;

pub use airline::{register_airline, submit_airline_funding};
pub use flight::{fetch_flight_status, register_flight};
pub use insurance::{purchase_insurance, withdraw_insurance_payout};
pub use oracle::get_oracles;
pub use status::{get_operational_status, health_check};

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;
use validator::Validate;

use crate::error::GatewayError;
use crate::eth::types::h256_hex;
use crate::eth::{parse_address, Address, TxReceipt};
use crate::models::{ApiResponse, TransactionNotice};

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Failed action: HTTP status plus the notification shown to the user
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

/// Malformed or incomplete bodies keep the envelope.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            message: format!("Invalid request body: {}", rejection.body_text()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiResponse::<()>::failure(self.message))).into_response()
    }
}

pub(crate) fn validate_payload(payload: &impl Validate) -> Result<(), ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::bad_request(format!("Validation error: {}", e)))
}

pub(crate) fn address_field(field: &str, value: &str) -> Result<Address, ApiError> {
    parse_address(value).ok_or_else(|| {
        ApiError::bad_request(format!("`{}` is not a valid address: {}", field, value))
    })
}

/// Logs the failure and wraps it with the action's notification.
pub(crate) fn gateway_failure(notification: &str, err: GatewayError) -> ApiError {
    warn!(error = %err, "{}", notification);
    ApiError {
        status: err.status_code(),
        message: format!("{} ({})", notification, err),
    }
}

pub(crate) fn transaction_notice(notification: &str, receipt: &TxReceipt) -> TransactionNotice {
    TransactionNotice {
        notification: notification.to_string(),
        tx_hash: h256_hex(&receipt.transaction_hash),
        block_number: receipt.block_number,
    }
}
