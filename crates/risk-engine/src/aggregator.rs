//! Portfolio Risk Aggregator
//!
//! Rolls per-token verdicts and allocations into risk counts, summary
//! statements and a chart breakdown. Statement order is fixed:
//! concentration band, flagged tokens (if any), overall risk level.

use serde::{Deserialize, Serialize};

use crate::model::{
    finite_or_zero, AllocationSlice, AssessedHolding, Chain, PortfolioReport, PortfolioRiskLevel,
    RiskCounts, RiskLevel,
};
use crate::taxonomy::SymbolSet;

/// Major-asset share at or above which the portfolio reads as conservative
pub const CONSERVATIVE_MAJOR_SHARE: f64 = 50.0;

/// Major-asset share at or above which the portfolio reads as moderate
pub const MODERATE_MAJOR_SHARE: f64 = 20.0;

/// Warning-level holdings needed for an overall "high"
pub const HIGH_RISK_WARNINGS: usize = 3;

/// Warning plus caution holdings needed for an overall "medium"
pub const MEDIUM_RISK_FLAGGED: usize = 3;

/// How much of the portfolio sits in major assets
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcentrationBand {
    Conservative,
    Moderate,
    HighRisk,
}

impl ConcentrationBand {
    pub fn from_major_share(percent: f64) -> Self {
        if percent >= CONSERVATIVE_MAJOR_SHARE {
            Self::Conservative
        } else if percent >= MODERATE_MAJOR_SHARE {
            Self::Moderate
        } else {
            Self::HighRisk
        }
    }
}

/// Overall level from verdict counts
pub const fn overall_risk(counts: &RiskCounts) -> PortfolioRiskLevel {
    if counts.warning >= HIGH_RISK_WARNINGS {
        PortfolioRiskLevel::High
    } else if counts.warning + counts.caution >= MEDIUM_RISK_FLAGGED {
        PortfolioRiskLevel::Medium
    } else {
        PortfolioRiskLevel::Low
    }
}

/// Aggregates verdicts for one chain's portfolio
#[derive(Clone, Debug)]
pub struct PortfolioRiskAggregator {
    major_assets: SymbolSet,
}

impl PortfolioRiskAggregator {
    pub const fn new(chain: Chain) -> Self {
        Self {
            major_assets: chain.major_assets(),
        }
    }

    /// Replace the major-asset set
    #[must_use]
    pub const fn with_major_assets(mut self, major_assets: SymbolSet) -> Self {
        self.major_assets = major_assets;
        self
    }

    pub fn aggregate(&self, assessed: &[AssessedHolding], total_value_usd: f64) -> PortfolioReport {
        let total = finite_or_zero(total_value_usd);
        if assessed.is_empty() || total <= 0.0 {
            tracing::debug!(
                holdings = assessed.len(),
                total,
                "insufficient data for portfolio report"
            );
            return PortfolioReport::empty();
        }

        let mut risk_counts = RiskCounts::default();
        for entry in assessed {
            risk_counts.record(entry.verdict.risk_level);
        }

        let major_allocation_percent = self.major_share(assessed);
        let mut summary_statements =
            vec![self.concentration_statement(assessed, major_allocation_percent)];

        let flagged: Vec<&str> = assessed
            .iter()
            .filter(|e| e.verdict.risk_level == RiskLevel::Warning)
            .map(|e| e.holding.symbol.as_str())
            .collect();
        if !flagged.is_empty() {
            summary_statements.push(format!(
                "Tokens flagged with warnings: {}.",
                flagged.join(", ")
            ));
        }

        let overall = overall_risk(&risk_counts);
        summary_statements.push(format!("Overall portfolio risk level: {overall}."));

        let allocation_chart = assessed
            .iter()
            .map(|e| AllocationSlice {
                symbol: e.holding.symbol.clone(),
                percentage: finite_or_zero(e.holding.allocation_percent),
                risk_level: e.verdict.risk_level,
            })
            .collect();

        tracing::debug!(
            warning = risk_counts.warning,
            caution = risk_counts.caution,
            safe = risk_counts.safe,
            major_share = major_allocation_percent,
            overall = %overall,
            "aggregated portfolio"
        );

        PortfolioReport {
            risk_counts,
            summary_statements,
            allocation_chart,
            overall_risk: Some(overall),
            major_allocation_percent,
        }
    }

    fn is_major(&self, entry: &AssessedHolding) -> bool {
        self.major_assets.contains(&entry.holding.symbol)
    }

    fn major_share(&self, assessed: &[AssessedHolding]) -> f64 {
        assessed
            .iter()
            .filter(|e| self.is_major(e))
            .map(|e| finite_or_zero(e.holding.allocation_percent).max(0.0))
            .sum::<f64>()
            .min(100.0)
    }

    fn concentration_statement(&self, assessed: &[AssessedHolding], share: f64) -> String {
        match ConcentrationBand::from_major_share(share) {
            ConcentrationBand::Conservative => {
                let held: Vec<&str> = assessed
                    .iter()
                    .filter(|e| self.is_major(e))
                    .map(|e| e.holding.symbol.as_str())
                    .collect();
                format!(
                    "Conservative allocation: {share:.1}% of portfolio value is held in major assets ({}), which anchors overall risk.",
                    held.join(", ")
                )
            }
            ConcentrationBand::Moderate => format!(
                "Moderate allocation: {share:.1}% of portfolio value is held in major assets; the rest is spread across smaller tokens with higher risk."
            ),
            ConcentrationBand::HighRisk => format!(
                "High-risk allocation: only {share:.1}% of portfolio value is held in major assets; most of the portfolio is exposed to smaller, more volatile tokens."
            ),
        }
    }
}
