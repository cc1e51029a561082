use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::info;

use crate::app_state::AppState;
use crate::gateway::unix_now;
use crate::models::{
    ApiResponse, FetchFlightStatusRequest, FlightStatusQuery, RegisterFlightRequest,
    TransactionNotice,
};

use super::{address_field, gateway_failure, transaction_notice, validate_payload, ApiResult};

pub async fn register_flight(
    State(state): State<AppState>,
    payload: Result<Json<RegisterFlightRequest>, JsonRejection>,
) -> ApiResult<TransactionNotice> {
    let Json(payload) = payload?;
    validate_payload(&payload)?;
    let airline = address_field("airline", &payload.airline)?;
    let timestamp = payload.timestamp.unwrap_or_else(unix_now);

    match state
        .gateway
        .register_flight(airline, &payload.flight, timestamp)
        .await
    {
        Ok(receipt) => Ok(Json(ApiResponse::ok(transaction_notice(
            "Flight registered.",
            &receipt,
        )))),
        Err(e) => Err(gateway_failure("Flight registration failed.", e)),
    }
}

/// Submits a fresh oracle request and echoes what was asked. The status
/// itself arrives later as a `FlightStatusInfo` event.
pub async fn fetch_flight_status(
    State(state): State<AppState>,
    payload: Result<Json<FetchFlightStatusRequest>, JsonRejection>,
) -> ApiResult<FlightStatusQuery> {
    let Json(payload) = payload?;
    validate_payload(&payload)?;

    match state.gateway.fetch_flight_status(&payload.flight).await {
        Ok((query, receipt)) => {
            info!(
                flight = %query.flight,
                timestamp = query.timestamp,
                tx_hash = ?receipt.transaction_hash,
                "flight status requested from oracles"
            );
            Ok(Json(ApiResponse::ok(query)))
        }
        Err(e) => Err(gateway_failure("Could not trigger the oracles.", e)),
    }
}
