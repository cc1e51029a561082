use axum::{extract::State, Json};

use crate::app_state::AppState;
use crate::models::{ApiResponse, OperationalStatus};

use super::{gateway_failure, ApiResult};

pub async fn get_operational_status(
    State(state): State<AppState>,
) -> ApiResult<OperationalStatus> {
    match state.gateway.is_operational().await {
        Ok(operational) => Ok(Json(ApiResponse::ok(OperationalStatus { operational }))),
        Err(e) => Err(gateway_failure("Could not read the contract's operational status", e)),
    }
}

pub async fn health_check() -> &'static str {
    "OK"
}
