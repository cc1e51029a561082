use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::app_state::AppState;
use crate::models::{ApiResponse, PurchaseInsuranceRequest, TransactionNotice};

use super::{address_field, gateway_failure, transaction_notice, validate_payload, ApiResult};

pub async fn purchase_insurance(
    State(state): State<AppState>,
    payload: Result<Json<PurchaseInsuranceRequest>, JsonRejection>,
) -> ApiResult<TransactionNotice> {
    let Json(payload) = payload?;
    validate_payload(&payload)?;
    let airline = address_field("airline", &payload.airline)?;

    match state
        .gateway
        .purchase_insurance(airline, &payload.flight, &payload.amount)
        .await
    {
        Ok(receipt) => Ok(Json(ApiResponse::ok(transaction_notice(
            "You're Insured! Have a safe flight!",
            &receipt,
        )))),
        Err(e) => Err(gateway_failure(
            "Your insurance purchase has failed. Please try again",
            e,
        )),
    }
}

pub async fn withdraw_insurance_payout(
    State(state): State<AppState>,
) -> ApiResult<TransactionNotice> {
    match state.gateway.withdraw_insurance_payout().await {
        Ok(receipt) => Ok(Json(ApiResponse::ok(transaction_notice(
            "Payout withdrawn. You are no longer insured.",
            &receipt,
        )))),
        Err(e) => Err(gateway_failure(
            "You are still insured. The withdrawal did not go through, please try again.",
            e,
        )),
    }
}
