use axum::{extract::State, Json};

use crate::app_state::AppState;
use crate::models::ApiResponse;
use crate::oracle::SimulatorSnapshot;

pub async fn get_oracles(State(state): State<AppState>) -> Json<ApiResponse<SimulatorSnapshot>> {
    Json(ApiResponse::ok(state.simulator.snapshot().await))
}
