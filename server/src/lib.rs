//! FlightSurety Server Library
//!
//! Contract gateway, oracle simulator and HTTP API for the FlightSurety
//! flight-delay insurance dapp.

pub mod app_state;
pub mod config;
pub mod error;
pub mod eth;
pub mod gateway;
pub mod handlers;
pub mod models;
pub mod oracle;
pub mod routes;
