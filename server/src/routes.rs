//! Route definitions for the FlightSurety API

use axum::{
    routing::{get, post},
    Router,
};

use crate::app_state::AppState;
use crate::handlers::*;

// Contract status routes
pub fn status_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/status", get(get_operational_status))
}

// Airline routes
pub fn airline_routes() -> Router<AppState> {
    Router::new()
        .route("/api/airlines", post(register_airline))
        .route("/api/airlines/funding", post(submit_airline_funding))
}

// Insurance routes
pub fn insurance_routes() -> Router<AppState> {
    Router::new()
        .route("/api/insurance", post(purchase_insurance))
        .route("/api/insurance/withdraw", post(withdraw_insurance_payout))
}

// Flight and oracle routes
pub fn flight_routes() -> Router<AppState> {
    Router::new()
        .route("/api/flights", post(register_flight))
        .route("/api/flights/status", post(fetch_flight_status))
        .route("/api/oracles", get(get_oracles))
}

/// Every API route, bound to `state`. Middleware layers are added by the caller.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .merge(status_routes())
        .merge(airline_routes())
        .merge(insurance_routes())
        .merge(flight_routes())
        .with_state(state)
}
