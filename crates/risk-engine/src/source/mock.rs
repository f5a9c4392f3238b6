//! Mock Data Sources
//!
//! For testing and demo purposes. Serve a fixed demo portfolio and fixed
//! scanner records.

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{HoldingsSource, SecuritySource};
use crate::error::{Result, RiskError};
use crate::model::{Chain, Holding, PortfolioSnapshot};
use crate::security::{RawSecurityRecord, RawValue};

const USDC_ADDRESS: &str = "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48";
const LINK_ADDRESS: &str = "0x514910771af9ca656af840dff83e8264ecf986ca";
const PEPE_ADDRESS: &str = "0x6982508145454ce325ddbf47a25d4ec3d2311933";
const MOONX_ADDRESS: &str = "0x1234567890abcdef1234567890abcdef12345678";

/// Holdings source with a built-in demo portfolio
#[derive(Default)]
pub struct MockHoldingsSource {
    /// Explicit portfolios keyed by (lower-cased wallet, chain)
    portfolios: HashMap<(String, Chain), Vec<Holding>>,
}

impl MockHoldingsSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `holdings` for `wallet` on `chain` instead of the demo portfolio
    #[must_use]
    pub fn with_portfolio(mut self, wallet: &str, chain: Chain, holdings: Vec<Holding>) -> Self {
        self.portfolios
            .insert((wallet.to_ascii_lowercase(), chain), holdings);
        self
    }

    /// Native price, 24h change
    const fn native_market(chain: Chain) -> (f64, f64) {
        match chain {
            Chain::Bsc => (690.0, 1.4),
            Chain::Polygon => (0.45, -2.3),
            Chain::Avalanche => (42.0, 3.8),
            Chain::Ethereum | Chain::Arbitrum | Chain::Optimism | Chain::Base => (3450.0, 2.1),
        }
    }

    /// Demo portfolio: native, a stablecoin, a blue-chip token, a meme token
    /// and a honeypot.
    pub fn demo_holdings(chain: Chain) -> Vec<Holding> {
        let (native_price, native_change) = Self::native_market(chain);
        let native_amount = dec!(1.2);

        vec![
            Holding::new(chain.native_symbol(), chain.native_symbol(), None, native_amount)
                .with_market(native_price, value(native_amount, native_price), native_change),
            Holding::new("USDC", "USD Coin", Some(USDC_ADDRESS.into()), dec!(2500))
                .with_market(1.0, 2500.0, 0.01),
            Holding::new("LINK", "Chainlink", Some(LINK_ADDRESS.into()), dec!(40))
                .with_market(24.5, 980.0, -3.2),
            Holding::new("PEPE", "Pepe", Some(PEPE_ADDRESS.into()), dec!(150000000))
                .with_market(0.000_009_8, 1470.0, 12.4),
            Holding::new("MOONX", "MoonX Inu", Some(MOONX_ADDRESS.into()), dec!(50000))
                .with_market(0.002, 100.0, -38.5),
        ]
    }
}

fn value(amount: Decimal, price: f64) -> f64 {
    amount.to_f64().unwrap_or(0.0) * price
}

#[async_trait]
impl HoldingsSource for MockHoldingsSource {
    async fn fetch_portfolio(&self, wallet: &str, chain: Chain) -> Result<PortfolioSnapshot> {
        let holdings = self
            .portfolios
            .get(&(wallet.to_ascii_lowercase(), chain))
            .cloned()
            .unwrap_or_else(|| Self::demo_holdings(chain));

        let total: f64 = holdings.iter().map(|h| h.value_usd).sum();
        Ok(PortfolioSnapshot::new(wallet.to_string(), chain, holdings, total)
            .with_computed_allocations())
    }

    fn name(&self) -> &str {
        "mock-holdings"
    }
}

/// Security source serving fixed records
pub struct MockSecuritySource {
    records: HashMap<String, RawSecurityRecord>,
    available: bool,
}

impl Default for MockSecuritySource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSecuritySource {
    /// Records for the demo portfolio. PEPE is deliberately uncovered.
    pub fn new() -> Self {
        let flag = |on: bool| Some(RawValue::Text(if on { "1" } else { "0" }.into()));
        let tax = |fraction: &str| Some(RawValue::Text(fraction.into()));

        let mut records = HashMap::new();
        records.insert(
            USDC_ADDRESS.to_string(),
            RawSecurityRecord {
                is_honeypot: flag(false),
                buy_tax: tax("0"),
                sell_tax: tax("0"),
                is_proxy: flag(true),
                is_mintable: flag(false),
                is_blacklisted: flag(true),
                ..Default::default()
            },
        );
        records.insert(
            LINK_ADDRESS.to_string(),
            RawSecurityRecord {
                is_honeypot: flag(false),
                buy_tax: tax("0"),
                sell_tax: tax("0"),
                ..Default::default()
            },
        );
        records.insert(
            MOONX_ADDRESS.to_string(),
            RawSecurityRecord {
                is_honeypot: flag(true),
                buy_tax: tax("0.08"),
                sell_tax: tax("0.15"),
                hidden_owner: flag(true),
                is_mintable: flag(true),
                ..Default::default()
            },
        );

        Self {
            records,
            available: true,
        }
    }

    /// A scanner with no records at all
    pub fn empty() -> Self {
        Self {
            records: HashMap::new(),
            available: true,
        }
    }

    /// A scanner that fails every request
    pub fn unavailable() -> Self {
        Self {
            records: HashMap::new(),
            available: false,
        }
    }

    #[must_use]
    pub fn with_record(mut self, address: &str, record: RawSecurityRecord) -> Self {
        self.records.insert(address.to_ascii_lowercase(), record);
        self
    }
}

#[async_trait]
impl SecuritySource for MockSecuritySource {
    async fn fetch_security(
        &self,
        _chain: Chain,
        addresses: &[String],
    ) -> Result<HashMap<String, RawSecurityRecord>> {
        if !self.available {
            return Err(RiskError::Upstream {
                source_name: "mock-security",
                message: "scanner offline".into(),
            });
        }

        Ok(addresses
            .iter()
            .filter_map(|addr| {
                let key = addr.to_ascii_lowercase();
                self.records.get(&key).map(|r| (key, r.clone()))
            })
            .collect())
    }

    fn name(&self) -> &str {
        "mock-security"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_demo_portfolio() {
        let source = MockHoldingsSource::new();
        let snapshot = source.fetch_portfolio("0xabc", Chain::Ethereum).await.unwrap();

        assert_eq!(snapshot.holdings.len(), 5);
        assert_eq!(snapshot.holdings[0].symbol, "ETH");
        assert!(snapshot.total_value_usd > 0.0);

        let sum: f64 = snapshot.holdings.iter().map(|h| h.allocation_percent).sum();
        assert!((sum - 100.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_registered_portfolio_wins() {
        let source = MockHoldingsSource::new().with_portfolio("0xABC", Chain::Base, Vec::new());
        let snapshot = source.fetch_portfolio("0xabc", Chain::Base).await.unwrap();
        assert!(snapshot.holdings.is_empty());
        assert_eq!(snapshot.total_value_usd, 0.0);

        let other_chain = source.fetch_portfolio("0xabc", Chain::Ethereum).await.unwrap();
        assert_eq!(other_chain.holdings.len(), 5);
    }

    #[tokio::test]
    async fn test_security_lookup_skips_unknown() {
        let source = MockSecuritySource::new();
        let addresses = vec![USDC_ADDRESS.to_uppercase().replace("0X", "0x"), PEPE_ADDRESS.into()];
        let records = source.fetch_security(Chain::Ethereum, &addresses).await.unwrap();

        assert_eq!(records.len(), 1);
        assert!(records.contains_key(USDC_ADDRESS));
    }

    #[test]
    fn test_native_value_from_decimal_amount() {
        let holdings = MockHoldingsSource::demo_holdings(Chain::Ethereum);
        assert!((holdings[0].value_usd - 4140.0).abs() < 1e-6);
        assert!((value(dec!(0.5), 3.0) - 1.5).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_empty_scanner_with_custom_record() {
        let honeypot = RawSecurityRecord {
            is_honeypot: Some(RawValue::Text("1".into())),
            ..Default::default()
        };
        let source = MockSecuritySource::empty().with_record(&PEPE_ADDRESS.to_uppercase(), honeypot);
        let addresses = vec![PEPE_ADDRESS.to_string(), USDC_ADDRESS.to_string()];
        let records = source.fetch_security(Chain::Ethereum, &addresses).await.unwrap();

        assert_eq!(records.len(), 1);
        let findings = crate::security::normalize(records.get(PEPE_ADDRESS)).unwrap();
        assert!(findings.is_honeypot);
    }

    #[tokio::test]
    async fn test_unavailable_scanner_errors() {
        let source = MockSecuritySource::unavailable();
        let err = source
            .fetch_security(Chain::Ethereum, &[USDC_ADDRESS.into()])
            .await
            .unwrap_err();
        assert!(err.is_retryable());
    }
}
