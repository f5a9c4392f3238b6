//! Domain Models
//!
//! Data types shared by the classifier, the aggregator and the request
//! boundary. Held quantities use `rust_decimal`; USD-denominated market
//! figures are plain `f64`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::RiskError;
use crate::taxonomy::{
    self, SymbolSet, ARBITRUM_MAJORS, AVALANCHE_MAJORS, BASE_MAJORS, BSC_MAJORS,
    ETHEREUM_MAJORS, OPTIMISM_MAJORS, POLYGON_MAJORS,
};

/// Maximum number of evidence items a consumer should display per holding
pub const MAX_DISPLAYED_EVIDENCE: usize = 3;

/// Replace NaN/infinite inputs with zero
pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

// ============================================================================
// Chains
// ============================================================================

/// EVM chain a wallet snapshot was taken on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Ethereum,
    Bsc,
    Polygon,
    Arbitrum,
    Optimism,
    Base,
    Avalanche,
}

impl Chain {
    pub const ALL: [Self; 7] = [
        Self::Ethereum,
        Self::Bsc,
        Self::Polygon,
        Self::Arbitrum,
        Self::Optimism,
        Self::Base,
        Self::Avalanche,
    ];

    /// EIP-155 chain id
    pub const fn chain_id(self) -> u64 {
        match self {
            Self::Ethereum => 1,
            Self::Bsc => 56,
            Self::Polygon => 137,
            Self::Arbitrum => 42161,
            Self::Optimism => 10,
            Self::Base => 8453,
            Self::Avalanche => 43114,
        }
    }

    /// Symbol of the gas token
    pub const fn native_symbol(self) -> &'static str {
        match self {
            Self::Ethereum | Self::Arbitrum | Self::Optimism | Self::Base => "ETH",
            Self::Bsc => "BNB",
            Self::Polygon => "POL",
            Self::Avalanche => "AVAX",
        }
    }

    pub const fn major_assets(self) -> SymbolSet {
        match self {
            Self::Ethereum => ETHEREUM_MAJORS,
            Self::Bsc => BSC_MAJORS,
            Self::Polygon => POLYGON_MAJORS,
            Self::Arbitrum => ARBITRUM_MAJORS,
            Self::Optimism => OPTIMISM_MAJORS,
            Self::Base => BASE_MAJORS,
            Self::Avalanche => AVALANCHE_MAJORS,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ethereum => "ethereum",
            Self::Bsc => "bsc",
            Self::Polygon => "polygon",
            Self::Arbitrum => "arbitrum",
            Self::Optimism => "optimism",
            Self::Base => "base",
            Self::Avalanche => "avalanche",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Chain {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        if let Ok(id) = key.parse::<u64>() {
            return Self::ALL
                .into_iter()
                .find(|c| c.chain_id() == id)
                .ok_or_else(|| RiskError::UnsupportedChain(s.to_string()));
        }

        match key.as_str() {
            "ethereum" | "eth" | "mainnet" => Ok(Self::Ethereum),
            "bsc" | "bnb" | "binance" => Ok(Self::Bsc),
            "polygon" | "matic" | "pol" => Ok(Self::Polygon),
            "arbitrum" | "arb" => Ok(Self::Arbitrum),
            "optimism" | "op" => Ok(Self::Optimism),
            "base" => Ok(Self::Base),
            "avalanche" | "avax" => Ok(Self::Avalanche),
            _ => Err(RiskError::UnsupportedChain(s.to_string())),
        }
    }
}

// ============================================================================
// Holdings
// ============================================================================

/// One token position in a wallet snapshot
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    /// Ticker symbol, unique within one snapshot
    pub symbol: String,

    /// Display name
    pub name: String,

    /// Token contract; `None` for the chain's native asset
    #[serde(default)]
    pub contract_address: Option<String>,

    /// Quantity held, in human units
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,

    #[serde(default)]
    pub value_usd: f64,

    #[serde(default)]
    pub price_usd: f64,

    #[serde(default)]
    pub change_24h_percent: f64,

    /// Share of total portfolio value (0-100)
    #[serde(default)]
    pub allocation_percent: f64,
}

impl Holding {
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        contract_address: Option<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            contract_address,
            amount,
            value_usd: 0.0,
            price_usd: 0.0,
            change_24h_percent: 0.0,
            allocation_percent: 0.0,
        }
    }

    /// Set price, value and 24h move
    #[must_use]
    pub fn with_market(mut self, price_usd: f64, value_usd: f64, change_24h_percent: f64) -> Self {
        self.price_usd = price_usd;
        self.value_usd = value_usd;
        self.change_24h_percent = change_24h_percent;
        self
    }

    #[must_use]
    pub fn with_allocation(mut self, allocation_percent: f64) -> Self {
        self.allocation_percent = allocation_percent;
        self
    }

    /// Whether this holding is the chain's native gas asset. Decided by
    /// symbol alone; a missing contract address does not make a token native.
    pub fn is_native_on(&self, chain: Chain) -> bool {
        self.symbol.trim().eq_ignore_ascii_case(chain.native_symbol())
    }

    /// Lower-cased contract address, if it names a real contract
    pub fn contract_key(&self) -> Option<String> {
        self.contract_address
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty() && !taxonomy::is_native_placeholder(a))
            .map(str::to_ascii_lowercase)
    }

    /// 24h move with NaN/infinity treated as no move
    pub fn change_24h(&self) -> f64 {
        finite_or_zero(self.change_24h_percent)
    }
}

/// A wallet's holdings on one chain, as supplied by the holdings source
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSnapshot {
    pub wallet: String,
    pub chain: Chain,
    pub holdings: Vec<Holding>,
    pub total_value_usd: f64,
}

impl PortfolioSnapshot {
    pub fn new(
        wallet: String,
        chain: Chain,
        holdings: Vec<Holding>,
        total_value_usd: f64,
    ) -> Self {
        Self {
            wallet,
            chain,
            holdings,
            total_value_usd,
        }
    }

    /// Recompute each holding's allocation from `value_usd / total_value_usd`
    #[must_use]
    pub fn with_computed_allocations(mut self) -> Self {
        let total = finite_or_zero(self.total_value_usd);
        for holding in &mut self.holdings {
            holding.allocation_percent = if total > 0.0 {
                finite_or_zero(holding.value_usd).max(0.0) / total * 100.0
            } else {
                0.0
            };
        }
        self
    }
}

// ============================================================================
// Verdicts
// ============================================================================

/// Three-tier token risk, ordered `Safe < Caution < Warning`
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Safe,
    Caution,
    Warning,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Safe => "safe",
            Self::Caution => "caution",
            Self::Warning => "warning",
        })
    }
}

/// Severity of one evidence item, ordered `Low < Medium < High`
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Low,
    Medium,
    High,
}

/// A single justification backing a verdict
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceItem {
    pub title: String,
    pub reference_url: String,
    pub importance: Importance,
    pub summary: String,
}

impl EvidenceItem {
    pub fn new(
        title: impl Into<String>,
        reference_url: impl Into<String>,
        importance: Importance,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            reference_url: reference_url.into(),
            importance,
            summary: summary.into(),
        }
    }
}

/// Classifier output for one holding
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskVerdict {
    pub risk_level: RiskLevel,

    /// Present only when `risk_level != Safe`
    pub risk_reason: Option<String>,

    /// Severity-first evidence trail
    pub evidence_sources: Vec<EvidenceItem>,
}

impl RiskVerdict {
    pub fn safe() -> Self {
        Self::default()
    }

    /// The bounded prefix of evidence a consumer should display
    pub fn top_evidence(&self) -> &[EvidenceItem] {
        let n = self.evidence_sources.len().min(MAX_DISPLAYED_EVIDENCE);
        &self.evidence_sources[..n]
    }
}

/// A holding paired with its verdict
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessedHolding {
    pub holding: Holding,
    pub verdict: RiskVerdict,
}

// ============================================================================
// Portfolio report
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskCounts {
    pub warning: usize,
    pub caution: usize,
    pub safe: usize,
}

impl RiskCounts {
    pub fn record(&mut self, level: RiskLevel) {
        match level {
            RiskLevel::Warning => self.warning += 1,
            RiskLevel::Caution => self.caution += 1,
            RiskLevel::Safe => self.safe += 1,
        }
    }

    pub const fn total(&self) -> usize {
        self.warning + self.caution + self.safe
    }
}

/// Overall portfolio risk stated in the summary
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortfolioRiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for PortfolioRiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        })
    }
}

/// One chart slice, mirroring one holding
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationSlice {
    pub symbol: String,
    pub percentage: f64,
    pub risk_level: RiskLevel,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioReport {
    pub risk_counts: RiskCounts,
    pub summary_statements: Vec<String>,
    pub allocation_chart: Vec<AllocationSlice>,

    /// `None` when there is not enough data to judge
    pub overall_risk: Option<PortfolioRiskLevel>,

    /// Combined allocation of the chain's major assets
    pub major_allocation_percent: f64,
}

impl PortfolioReport {
    /// Report for an empty or zero-value portfolio
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_insufficient_data(&self) -> bool {
        self.summary_statements.is_empty() && self.allocation_chart.is_empty()
    }
}

/// Full result of one wallet assessment
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletRiskAssessment {
    pub wallet: String,
    pub chain: Chain,
    pub total_value_usd: f64,
    pub holdings: Vec<AssessedHolding>,
    pub report: PortfolioReport,
    pub assessed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_chain_parsing() {
        assert_eq!("ETH".parse::<Chain>().unwrap(), Chain::Ethereum);
        assert_eq!("56".parse::<Chain>().unwrap(), Chain::Bsc);
        assert_eq!(" Polygon ".parse::<Chain>().unwrap(), Chain::Polygon);
        assert!("solana".parse::<Chain>().is_err());
        assert!("999".parse::<Chain>().is_err());
    }

    #[test]
    fn test_native_detection() {
        let eth = Holding::new("ETH", "Ether", None, dec!(1.5));
        assert!(eth.is_native_on(Chain::Ethereum));

        let placeholder = Holding::new(
            "BNB",
            "BNB",
            Some(taxonomy::NATIVE_PLACEHOLDER_ADDRESS.into()),
            dec!(2),
        );
        assert!(placeholder.is_native_on(Chain::Bsc));
        assert_eq!(placeholder.contract_key(), None);

        // No address is not enough to count as native
        let pepe = Holding::new("PEPE", "Pepe", None, dec!(1000));
        assert!(!pepe.is_native_on(Chain::Ethereum));
        let placeholder_pepe = Holding::new(
            "PEPE",
            "Pepe",
            Some(taxonomy::NATIVE_PLACEHOLDER_ADDRESS.into()),
            dec!(1000),
        );
        assert!(!placeholder_pepe.is_native_on(Chain::Ethereum));

        // Native symbol on another chain is an ordinary token
        assert!(!eth.is_native_on(Chain::Bsc));

        let usdc = Holding::new(
            "USDC",
            "USD Coin",
            Some("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48".into()),
            dec!(100),
        );
        assert!(!usdc.is_native_on(Chain::Ethereum));
        assert_eq!(
            usdc.contract_key().as_deref(),
            Some("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48")
        );
    }

    #[test]
    fn test_amount_keeps_precision_on_the_wire() {
        let holding = Holding::new(
            "PEPE",
            "Pepe",
            Some("0x1".into()),
            dec!(123456789.000000000000000001),
        );
        let json = serde_json::to_value(&holding).unwrap();
        assert_eq!(json["amount"], "123456789.000000000000000001");
        assert!(json.get("change24hPercent").is_some());

        let back: Holding = serde_json::from_value(json).unwrap();
        assert_eq!(back.amount, holding.amount);
    }

    #[test]
    fn test_computed_allocations_sum_to_100() {
        let snapshot = PortfolioSnapshot::new(
            "0xabc".into(),
            Chain::Ethereum,
            vec![
                Holding::new("ETH", "Ether", None, dec!(1)).with_market(3000.0, 3000.0, 1.0),
                Holding::new("USDC", "USD Coin", Some("0x1".into()), dec!(1000))
                    .with_market(1.0, 1000.0, 0.0),
            ],
            4000.0,
        )
        .with_computed_allocations();

        let sum: f64 = snapshot.holdings.iter().map(|h| h.allocation_percent).sum();
        assert!((sum - 100.0).abs() < 1e-9);
        assert!((snapshot.holdings[0].allocation_percent - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_total_allocations() {
        let snapshot = PortfolioSnapshot::new(
            "0xabc".into(),
            Chain::Ethereum,
            vec![Holding::new("ETH", "Ether", None, dec!(0)).with_market(3000.0, 0.0, 0.0)],
            0.0,
        )
        .with_computed_allocations();
        assert_eq!(snapshot.holdings[0].allocation_percent, 0.0);
    }

    #[test]
    fn test_risk_level_order() {
        assert!(RiskLevel::Safe < RiskLevel::Caution);
        assert!(RiskLevel::Caution < RiskLevel::Warning);
        assert!(Importance::High > Importance::Medium);
    }

    #[test]
    fn test_top_evidence_is_bounded() {
        let item = EvidenceItem::new("t", "https://example.org", Importance::Low, "s");
        let verdict = RiskVerdict {
            risk_level: RiskLevel::Caution,
            risk_reason: Some("x".into()),
            evidence_sources: vec![item; 5],
        };
        assert_eq!(verdict.top_evidence().len(), MAX_DISPLAYED_EVIDENCE);
        assert!(RiskVerdict::safe().top_evidence().is_empty());
    }
}
