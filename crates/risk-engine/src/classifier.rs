//! Token Risk Classifier
//!
//! Fuses scanner flags, the 24h price move and the token's category into a
//! three-tier verdict.
//!
//! ```text
//! native gas token            -> safe, no evidence
//! any critical flag           -> warning
//! any elevated flag           -> caution
//! otherwise                   -> safe
//! ```
//!
//! The level comes from the most severe rule that fired. Reason labels and
//! evidence accumulate from every rule that fired.

use std::collections::HashMap;

use crate::model::{
    AssessedHolding, Chain, EvidenceItem, Holding, Importance, RiskLevel, RiskVerdict,
};
use crate::security::SecurityFindings;
use crate::taxonomy::{SymbolSet, MEME_TOKENS};

/// Sell tax above this forces `warning`
pub const CRITICAL_SELL_TAX_PERCENT: f64 = 10.0;

/// Buy or sell tax above this is at least `caution`
pub const ELEVATED_TAX_PERCENT: f64 = 5.0;

/// Absolute 24h move above this forces `warning`
pub const CRITICAL_PRICE_MOVE_PERCENT: f64 = 20.0;

/// Absolute 24h move above this is cited as `high` evidence
pub const HIGH_PRICE_EVIDENCE_PERCENT: f64 = 30.0;

/// Absolute 24h move above this is cited as `medium` evidence.
/// Does not change the level on its own.
pub const MEDIUM_PRICE_EVIDENCE_PERCENT: f64 = 15.0;

const MEME_CATEGORY_URL: &str = "https://www.coingecko.com/en/categories/meme-token";

/// Classifies holdings on one chain
#[derive(Clone, Debug)]
pub struct TokenRiskClassifier {
    chain: Chain,
    meme_tokens: SymbolSet,
}

impl TokenRiskClassifier {
    pub const fn new(chain: Chain) -> Self {
        Self {
            chain,
            meme_tokens: MEME_TOKENS,
        }
    }

    /// Replace the meme-token set
    #[must_use]
    pub const fn with_meme_tokens(mut self, meme_tokens: SymbolSet) -> Self {
        self.meme_tokens = meme_tokens;
        self
    }

    pub const fn chain(&self) -> Chain {
        self.chain
    }

    /// Compute the verdict for one holding
    pub fn classify(&self, holding: &Holding, findings: Option<&SecurityFindings>) -> RiskVerdict {
        if holding.is_native_on(self.chain) {
            tracing::debug!(symbol = %holding.symbol, "native asset, skipping checks");
            return RiskVerdict::safe();
        }

        let signals = Signals::read(holding, findings, &self.meme_tokens);
        let critical = signals.critical_labels();
        let elevated = signals.elevated_labels();

        let risk_level = if !critical.is_empty() {
            RiskLevel::Warning
        } else if !elevated.is_empty() {
            RiskLevel::Caution
        } else {
            RiskLevel::Safe
        };

        let risk_reason = (risk_level != RiskLevel::Safe)
            .then(|| critical.into_iter().chain(elevated).collect::<Vec<_>>().join(", "));

        let mut evidence_sources = self.evidence(holding, &signals);
        // Stable: equal importance keeps rule order
        evidence_sources.sort_by(|a, b| b.importance.cmp(&a.importance));

        tracing::debug!(
            symbol = %holding.symbol,
            level = %risk_level,
            evidence = evidence_sources.len(),
            "classified holding"
        );

        RiskVerdict {
            risk_level,
            risk_reason,
            evidence_sources,
        }
    }

    /// Classify every holding, looking findings up by lower-cased contract address
    pub fn classify_all(
        &self,
        holdings: &[Holding],
        findings: &HashMap<String, SecurityFindings>,
    ) -> Vec<AssessedHolding> {
        holdings
            .iter()
            .map(|holding| {
                let found = holding.contract_key().and_then(|key| findings.get(&key));
                AssessedHolding {
                    holding: holding.clone(),
                    verdict: self.classify(holding, found),
                }
            })
            .collect()
    }

    /// Evidence in rule order, before severity sorting
    fn evidence(&self, holding: &Holding, signals: &Signals<'_>) -> Vec<EvidenceItem> {
        let scan_url = self.scan_url(holding);
        let mut items = Vec::new();

        if let Some(f) = signals.findings {
            if f.is_honeypot {
                items.push(EvidenceItem::new(
                    "Honeypot detected",
                    &scan_url,
                    Importance::High,
                    "The security scan reports that this token cannot be sold after purchase.",
                ));
            }
            if f.cannot_sell_all {
                items.push(EvidenceItem::new(
                    "Sell restriction",
                    &scan_url,
                    Importance::High,
                    "Holders cannot sell their entire balance in a single transaction.",
                ));
            }
            if f.owner_can_change_balance {
                items.push(EvidenceItem::new(
                    "Owner can modify balances",
                    &scan_url,
                    Importance::High,
                    "The contract owner is able to change any holder's balance.",
                ));
            }
            if f.has_hidden_owner {
                items.push(EvidenceItem::new(
                    "Hidden owner",
                    &scan_url,
                    Importance::High,
                    "The contract keeps owner privileges that are not publicly visible.",
                ));
            }

            let sell_tax = f.sell_tax();
            if sell_tax > CRITICAL_SELL_TAX_PERCENT {
                items.push(EvidenceItem::new(
                    "High sell tax",
                    &scan_url,
                    Importance::High,
                    format!(
                        "Selling this token incurs a {}% tax.",
                        format_tax(sell_tax, CRITICAL_SELL_TAX_PERCENT)
                    ),
                ));
            } else if sell_tax > ELEVATED_TAX_PERCENT {
                items.push(EvidenceItem::new(
                    "Elevated sell tax",
                    &scan_url,
                    Importance::Medium,
                    format!(
                        "Selling this token incurs a {}% tax.",
                        format_tax(sell_tax, ELEVATED_TAX_PERCENT)
                    ),
                ));
            }

            let buy_tax = f.buy_tax();
            if buy_tax > ELEVATED_TAX_PERCENT {
                items.push(EvidenceItem::new(
                    "Elevated buy tax",
                    &scan_url,
                    Importance::Medium,
                    format!(
                        "Buying this token incurs a {}% tax.",
                        format_tax(buy_tax, ELEVATED_TAX_PERCENT)
                    ),
                ));
            }

            if f.is_proxy {
                items.push(EvidenceItem::new(
                    "Proxy contract",
                    &scan_url,
                    Importance::Medium,
                    "The contract is upgradeable; its logic can be replaced after deployment.",
                ));
            }
            if f.is_mintable {
                items.push(EvidenceItem::new(
                    "Mintable supply",
                    &scan_url,
                    Importance::Medium,
                    "New tokens can be minted, diluting existing holders.",
                ));
            }
            if f.transfer_pausable {
                items.push(EvidenceItem::new(
                    "Pausable transfers",
                    &scan_url,
                    Importance::Medium,
                    "Token transfers can be paused by the contract owner.",
                ));
            }
            if f.is_blacklistable {
                items.push(EvidenceItem::new(
                    "Blacklist capability",
                    &scan_url,
                    Importance::Low,
                    "The contract can block specific addresses from transferring.",
                ));
            }
        }

        let swing = signals.change_24h.abs();
        let price_importance = if swing > HIGH_PRICE_EVIDENCE_PERCENT {
            Some(Importance::High)
        } else if swing > MEDIUM_PRICE_EVIDENCE_PERCENT {
            Some(Importance::Medium)
        } else {
            None
        };
        if let Some(importance) = price_importance {
            items.push(EvidenceItem::new(
                "Large 24h price move",
                self.market_url(holding),
                importance,
                format!(
                    "The price moved {:+.1}% over the last 24 hours.",
                    signals.change_24h
                ),
            ));
        }

        if signals.findings.is_none() {
            items.push(EvidenceItem::new(
                "Security data unavailable",
                &scan_url,
                Importance::Medium,
                "No contract security scan is available for this token, so its risk is unknown.",
            ));
        }

        if signals.is_meme {
            items.push(EvidenceItem::new(
                "Meme token",
                MEME_CATEGORY_URL,
                Importance::Medium,
                format!(
                    "{} is classified as a high-volatility meme token.",
                    holding.symbol.trim().to_uppercase()
                ),
            ));
        }

        items
    }

    fn scan_url(&self, holding: &Holding) -> String {
        format!(
            "https://gopluslabs.io/token-security/{}/{}",
            self.chain.chain_id(),
            holding.contract_key().unwrap_or_default()
        )
    }

    fn market_url(&self, holding: &Holding) -> String {
        format!(
            "https://dexscreener.com/{}/{}",
            self.chain,
            holding.contract_key().unwrap_or_default()
        )
    }
}

/// Inputs the rules read, sanitized once
struct Signals<'a> {
    findings: Option<&'a SecurityFindings>,
    change_24h: f64,
    is_meme: bool,
}

impl<'a> Signals<'a> {
    fn read(
        holding: &Holding,
        findings: Option<&'a SecurityFindings>,
        meme_tokens: &SymbolSet,
    ) -> Self {
        Self {
            findings,
            change_24h: holding.change_24h(),
            is_meme: meme_tokens.contains(&holding.symbol),
        }
    }

    /// Labels for rules that force `warning`
    fn critical_labels(&self) -> Vec<String> {
        let mut labels = Vec::new();

        if let Some(f) = self.findings {
            if f.is_honeypot {
                labels.push("honeypot token".to_string());
            }
            if f.cannot_sell_all {
                labels.push("cannot sell full balance".to_string());
            }
            if f.sell_tax() > CRITICAL_SELL_TAX_PERCENT {
                labels.push(format!(
                    "high sell tax ({}%)",
                    format_tax(f.sell_tax(), CRITICAL_SELL_TAX_PERCENT)
                ));
            }
            if f.owner_can_change_balance {
                labels.push("owner can modify balances".to_string());
            }
            if f.has_hidden_owner {
                labels.push("hidden owner".to_string());
            }
        }

        if self.change_24h.abs() > CRITICAL_PRICE_MOVE_PERCENT {
            labels.push(format!("extreme 24h price swing ({:+.1}%)", self.change_24h));
        }

        labels
    }

    /// Labels for rules that force at least `caution`
    fn elevated_labels(&self) -> Vec<String> {
        let mut labels = Vec::new();

        match self.findings {
            Some(f) => {
                let sell_tax = f.sell_tax();
                if sell_tax > ELEVATED_TAX_PERCENT && sell_tax <= CRITICAL_SELL_TAX_PERCENT {
                    labels.push(format!(
                        "elevated sell tax ({}%)",
                        format_tax(sell_tax, ELEVATED_TAX_PERCENT)
                    ));
                }
                if f.buy_tax() > ELEVATED_TAX_PERCENT {
                    labels.push(format!(
                        "elevated buy tax ({}%)",
                        format_tax(f.buy_tax(), ELEVATED_TAX_PERCENT)
                    ));
                }
                if f.is_proxy {
                    labels.push("upgradeable proxy contract".to_string());
                }
                if f.is_mintable {
                    labels.push("mintable supply".to_string());
                }
                if f.transfer_pausable {
                    labels.push("pausable transfers".to_string());
                }
            }
            None => labels.push("no security data available".to_string()),
        }

        if self.is_meme {
            labels.push("high-volatility meme token".to_string());
        }

        labels
    }
}

/// `12.0 -> "12"`, `7.5 -> "7.5"`
fn format_percent(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded:.1}")
    }
}

/// A tax that cleared `threshold`, printed so it still reads as above it:
/// `10.04` against 10 gives `"10.04"`, not `"10"`.
fn format_tax(value: f64, threshold: f64) -> String {
    let short = format_percent(value);
    if value <= threshold || short.parse::<f64>().is_ok_and(|shown| shown > threshold) {
        return short;
    }

    (2..=4)
        .map(|decimals| format!("{value:.decimals$}"))
        .find(|text| text.parse::<f64>().is_ok_and(|shown| shown > threshold))
        .unwrap_or_else(|| format!("{value:.4}"))
}
