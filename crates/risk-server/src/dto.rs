//! Response Shapes
//!
//! Maps engine results into the wire envelope. No business rules live here.

use serde::{Deserialize, Serialize};

use risk_engine::{
    AllocationSlice, AssessedHolding, Chain, EvidenceItem, PortfolioReport, PortfolioRiskLevel,
    RiskCounts, RiskLevel, WalletRiskAssessment,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub security_source: String,
}

#[derive(Debug, Deserialize)]
pub struct RiskQuery {
    #[serde(default = "default_chain")]
    pub chain: String,
}

fn default_chain() -> String {
    Chain::Ethereum.to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainInfo {
    pub name: Chain,
    pub chain_id: u64,
    pub native_symbol: &'static str,
}

impl From<Chain> for ChainInfo {
    fn from(chain: Chain) -> Self {
        Self {
            name: chain,
            chain_id: chain.chain_id(),
            native_symbol: chain.native_symbol(),
        }
    }
}

/// One token row
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRisk {
    pub symbol: String,
    pub name: String,
    pub contract_address: Option<String>,
    /// Exact decimal string
    pub amount: String,
    pub value_usd: f64,
    pub price_usd: f64,
    pub change_24h_percent: f64,
    pub allocation_percent: f64,
    pub risk_level: RiskLevel,
    pub risk_reason: Option<String>,
    /// Bounded, severity-first evidence prefix
    pub risk_sources: Vec<EvidenceItem>,
}

impl From<&AssessedHolding> for TokenRisk {
    fn from(entry: &AssessedHolding) -> Self {
        let h = &entry.holding;
        Self {
            symbol: h.symbol.clone(),
            name: h.name.clone(),
            contract_address: h.contract_address.clone(),
            amount: h.amount.to_string(),
            value_usd: h.value_usd,
            price_usd: h.price_usd,
            change_24h_percent: h.change_24h_percent,
            allocation_percent: h.allocation_percent,
            risk_level: entry.verdict.risk_level,
            risk_reason: entry.verdict.risk_reason.clone(),
            risk_sources: entry.verdict.top_evidence().to_vec(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub risk_counts: RiskCounts,
    pub summary_statements: Vec<String>,
    pub allocation_chart: Vec<AllocationSlice>,
    pub overall_risk: Option<PortfolioRiskLevel>,
    pub major_allocation_percent: f64,
    /// Client should render an "insufficient data" state
    pub insufficient_data: bool,
}

impl From<PortfolioReport> for PortfolioSummary {
    fn from(report: PortfolioReport) -> Self {
        let insufficient_data = report.is_insufficient_data();
        Self {
            risk_counts: report.risk_counts,
            summary_statements: report.summary_statements,
            allocation_chart: report.allocation_chart,
            overall_risk: report.overall_risk,
            major_allocation_percent: report.major_allocation_percent,
            insufficient_data,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletRiskResponse {
    pub assessment_id: String,
    pub wallet: String,
    pub chain: ChainInfo,
    pub total_value_usd: f64,
    pub assessed_at: String,
    pub tokens: Vec<TokenRisk>,
    pub portfolio: PortfolioSummary,
}

impl From<WalletRiskAssessment> for WalletRiskResponse {
    fn from(assessment: WalletRiskAssessment) -> Self {
        Self {
            assessment_id: uuid::Uuid::new_v4().to_string(),
            wallet: assessment.wallet,
            chain: assessment.chain.into(),
            total_value_usd: assessment.total_value_usd,
            assessed_at: assessment.assessed_at.to_rfc3339(),
            tokens: assessment.holdings.iter().map(TokenRisk::from).collect(),
            portfolio: assessment.report.into(),
        }
    }
}
