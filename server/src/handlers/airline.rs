use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::info;

use crate::app_state::AppState;
use crate::models::{ApiResponse, FundAirlineRequest, RegisterAirlineRequest, TransactionNotice};

use super::{address_field, gateway_failure, transaction_notice, validate_payload, ApiResult};

pub async fn register_airline(
    State(state): State<AppState>,
    payload: Result<Json<RegisterAirlineRequest>, JsonRejection>,
) -> ApiResult<TransactionNotice> {
    let Json(payload) = payload?;
    validate_payload(&payload)?;
    let airline = address_field("address", &payload.address)?;

    match state.gateway.register_airline(airline, &payload.name).await {
        Ok(receipt) => {
            info!(airline = ?airline, name = %payload.name, "airline registered");
            Ok(Json(ApiResponse::ok(transaction_notice(
                "Congrats! You are now a registered airline!",
                &receipt,
            ))))
        }
        Err(e) => Err(gateway_failure(
            "Your wings will not arrive today! Try again at a later time to register!",
            e,
        )),
    }
}

pub async fn submit_airline_funding(
    State(state): State<AppState>,
    payload: Result<Json<FundAirlineRequest>, JsonRejection>,
) -> ApiResult<TransactionNotice> {
    let Json(payload) = payload?;
    validate_payload(&payload)?;
    let airline = address_field("airline", &payload.airline)?;

    match state.gateway.submit_airline_funding(airline, &payload.amount).await {
        Ok(receipt) => Ok(Json(ApiResponse::ok(transaction_notice(
            "Funding received, the airline can now participate.",
            &receipt,
        )))),
        Err(e) => Err(gateway_failure(
            "Airline funding failed. Please try to submit funding again.",
            e,
        )),
    }
}
