//! HTTP Handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};

use risk_engine::Chain;

use crate::dto::{ChainInfo, HealthResponse, RiskQuery, WalletRiskResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        security_source: state.assessor.security_source_name().to_string(),
    })
}

/// Supported chains
pub async fn list_chains() -> Json<Vec<ChainInfo>> {
    Json(Chain::ALL.into_iter().map(ChainInfo::from).collect())
}

/// Assess every token a wallet holds on one chain
pub async fn wallet_risk(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Query(query): Query<RiskQuery>,
) -> ApiResult<Json<WalletRiskResponse>> {
    let assessment = state.assessor.assess_on(&address, &query.chain).await?;
    Ok(Json(assessment.into()))
}
