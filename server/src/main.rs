//! FlightSurety Server
//!
//! Serves the dapp's HTTP API over the deployed FlightSuretyApp contract and
//! runs the oracle simulator that answers flight status requests.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use tokio::time::{sleep, Duration};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use flightsurety_server::app_state::AppState;
use flightsurety_server::config::{AppConfig, DeploymentConfig};
use flightsurety_server::error::GatewayError;
use flightsurety_server::gateway::{FlightSuretyGateway, GatewayOptions};
use flightsurety_server::oracle::{
    OracleContract, OracleSimulator, RandomStatusSource, SimulatorSettings, SimulatorState,
    StatusSource,
};
use flightsurety_server::routes;

const SUPERVISOR_MAX_BACKOFF_SECONDS: u64 = 30;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = AppConfig::from_env().context("invalid environment configuration")?;
    let deployment = DeploymentConfig::load(&config.deployment_path).with_context(|| {
        format!(
            "failed to load deployment config from {}",
            config.deployment_path.display()
        )
    })?;

    let gateway = Arc::new(connect_gateway(&config, &deployment).await?);
    let simulator_state = SimulatorState::new();

    if config.oracle_simulation_enabled {
        spawn_oracle_supervisor(gateway.clone(), simulator_state.clone(), &config);
    } else {
        info!("oracle simulation disabled");
    }

    let app = routes::app_router(AppState::new(gateway, simulator_state))
        .layer(build_cors_layer(&config.cors_allowed_origins))
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    info!("Server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

/// Connects to the node, retrying with backoff while it is unreachable.
/// Configuration problems are returned immediately.
async fn connect_gateway(
    config: &AppConfig,
    deployment: &DeploymentConfig,
) -> anyhow::Result<FlightSuretyGateway> {
    let options = GatewayOptions {
        tx_gas: config.tx_gas,
        oracle_gas: config.oracle_gas,
    };

    let mut attempt: u32 = 0;
    loop {
        match FlightSuretyGateway::connect(
            deployment,
            &config.network,
            options,
            config.receipt_timeout,
        )
        .await
        {
            Ok(gateway) => return Ok(gateway),
            Err(err @ GatewayError::Config(_)) => {
                return Err(err).context("contract gateway misconfigured");
            }
            Err(err) => {
                attempt = attempt.saturating_add(1);
                let backoff_seconds = backoff(attempt);
                warn!(attempt, backoff_seconds, error = %err, "node unreachable; retrying");
                sleep(Duration::from_secs(backoff_seconds)).await;
            }
        }
    }
}

/// Runs the oracle simulator and restarts it with backoff whenever a run ends
/// without oracles or the task dies.
fn spawn_oracle_supervisor(
    gateway: Arc<FlightSuretyGateway>,
    state: SimulatorState,
    config: &AppConfig,
) {
    let settings = SimulatorSettings {
        oracle_count: config.oracle_count,
        poll_interval: config.event_poll_interval,
        block_range: config.event_block_range,
    };
    let source: Arc<dyn StatusSource> = Arc::new(RandomStatusSource::new());
    let contract: Arc<dyn OracleContract> = gateway;

    tokio::spawn(async move {
        let mut restart_count: u32 = 0;
        loop {
            let simulator =
                OracleSimulator::new(contract.clone(), source.clone(), settings, state.clone());
            let handle = tokio::spawn(simulator.run());

            match handle.await {
                Ok(Ok(())) => {
                    info!("oracle simulator exited cleanly; stopping supervisor");
                    break;
                }
                Ok(Err(err)) => {
                    error!(error = %err, "oracle simulator failed to start; restarting");
                }
                Err(join_error) => {
                    if join_error.is_panic() {
                        error!("oracle simulator panicked; restarting");
                    } else {
                        error!(error = %join_error, "oracle simulator task failed; restarting");
                    }
                }
            }

            restart_count = restart_count.saturating_add(1);
            let backoff_seconds = backoff(restart_count);
            warn!(restart_count, backoff_seconds, "oracle simulator restart backoff");
            sleep(Duration::from_secs(backoff_seconds)).await;
        }
    });
}

fn backoff(attempt: u32) -> u64 {
    2u64.saturating_pow(attempt.min(5)).min(SUPERVISOR_MAX_BACKOFF_SECONDS)
}

fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let allowed_origins = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(false)
}
