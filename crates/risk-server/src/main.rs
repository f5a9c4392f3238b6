//! wallet-risk HTTP Server
//!
//! Axum-based server exposing per-token risk verdicts and a portfolio
//! summary for a wallet on a supported EVM chain.

mod config;
mod dto;
mod error;
mod handlers;
mod routes;
mod state;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use risk_engine::source::{HoldingsSource, MockHoldingsSource};
use risk_engine::{Chain, RiskAssessor};

use crate::config::ServerConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    // Upstream sources
    let holdings: Arc<dyn HoldingsSource> = Arc::new(MockHoldingsSource::new());
    let security = config.security_source.build()?;

    tracing::info!("✓ Holdings source: {}", holdings.name());
    tracing::info!("✓ Security source: {}", security.name());
    tracing::info!(
        timeout_secs = config.assessor.upstream_timeout.as_secs(),
        max_retries = config.assessor.max_retries,
        "Upstream policy"
    );

    let state = AppState {
        assessor: Arc::new(RiskAssessor::new(holdings, security, config.assessor.clone())),
    };

    let app = routes::build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 wallet-risk server running on http://{}", config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                          - Health check");
    tracing::info!("  GET  /api/chains                      - Supported chains");
    tracing::info!("  GET  /api/wallets/{{address}}/risk?chain= - Wallet risk report");
    tracing::info!(
        "Chains: {}",
        Chain::ALL.into_iter().map(Chain::as_str).collect::<Vec<_>>().join(", ")
    );
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
