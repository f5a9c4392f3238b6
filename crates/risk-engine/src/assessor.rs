//! Risk Assessor
//!
//! Request boundary around the classification core: validates input, fetches
//! holdings and scanner records with timeout and bounded retries, then runs
//! normalizer -> classifier -> aggregator.

use std::collections::{BTreeSet, HashMap};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::aggregator::PortfolioRiskAggregator;
use crate::classifier::TokenRiskClassifier;
use crate::error::{Result, RiskError};
use crate::model::{Chain, Holding, WalletRiskAssessment};
use crate::security::{self, SecurityFindings};
use crate::source::{HoldingsSource, SecuritySource};

/// Upstream call policy
#[derive(Clone, Debug)]
pub struct AssessorConfig {
    /// Per-attempt timeout for each upstream call
    pub upstream_timeout: Duration,

    /// Extra attempts after a retryable failure
    pub max_retries: u32,

    /// Base delay, multiplied by the attempt number
    pub retry_backoff: Duration,
}

impl Default for AssessorConfig {
    fn default() -> Self {
        Self {
            upstream_timeout: Duration::from_secs(10),
            max_retries: 2,
            retry_backoff: Duration::from_millis(250),
        }
    }
}

impl AssessorConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let upstream_timeout = env_u64("RISK_UPSTREAM_TIMEOUT_SECS")
            .map_or(defaults.upstream_timeout, Duration::from_secs);
        let max_retries = std::env::var("RISK_UPSTREAM_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.max_retries);
        let retry_backoff = env_u64("RISK_RETRY_BACKOFF_MS")
            .map_or(defaults.retry_backoff, Duration::from_millis);

        Self {
            upstream_timeout,
            max_retries,
            retry_backoff,
        }
    }
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Check an EVM address (`0x` + 40 hex chars) and return it lower-cased
pub fn validate_wallet(wallet: &str) -> Result<String> {
    let trimmed = wallet.trim();
    let hex = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .ok_or_else(|| RiskError::InvalidWallet(wallet.to_string()))?;

    if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(RiskError::InvalidWallet(wallet.to_string()));
    }

    Ok(format!("0x{}", hex.to_ascii_lowercase()))
}

/// Orchestrates one wallet assessment
pub struct RiskAssessor {
    holdings: Arc<dyn HoldingsSource>,
    security: Arc<dyn SecuritySource>,
    config: AssessorConfig,
}

impl RiskAssessor {
    pub fn new(
        holdings: Arc<dyn HoldingsSource>,
        security: Arc<dyn SecuritySource>,
        config: AssessorConfig,
    ) -> Self {
        Self {
            holdings,
            security,
            config,
        }
    }

    /// Name of the configured security source
    pub fn security_source_name(&self) -> &str {
        self.security.name()
    }

    /// Parse the chain name, then assess
    pub async fn assess_on(&self, wallet: &str, chain: &str) -> Result<WalletRiskAssessment> {
        let chain: Chain = chain.parse()?;
        self.assess(wallet, chain).await
    }

    pub async fn assess(&self, wallet: &str, chain: Chain) -> Result<WalletRiskAssessment> {
        let wallet = validate_wallet(wallet)?;

        let snapshot = self
            .with_retries("holdings", || self.holdings.fetch_portfolio(&wallet, chain))
            .await?;

        tracing::info!(
            wallet = %wallet,
            chain = %chain,
            source = self.holdings.name(),
            holdings = snapshot.holdings.len(),
            total_value_usd = snapshot.total_value_usd,
            "fetched portfolio"
        );

        let findings = self.fetch_findings(chain, &snapshot.holdings).await;

        let assessed = TokenRiskClassifier::new(chain).classify_all(&snapshot.holdings, &findings);
        let report =
            PortfolioRiskAggregator::new(chain).aggregate(&assessed, snapshot.total_value_usd);

        tracing::info!(
            wallet = %wallet,
            chain = %chain,
            warning = report.risk_counts.warning,
            caution = report.risk_counts.caution,
            safe = report.risk_counts.safe,
            "assessment complete"
        );

        Ok(WalletRiskAssessment {
            wallet,
            chain,
            total_value_usd: snapshot.total_value_usd,
            holdings: assessed,
            report,
            assessed_at: Utc::now(),
        })
    }

    /// Scanner findings for every non-native contract. A scanner outage
    /// degrades to "no findings" rather than failing the request.
    async fn fetch_findings(
        &self,
        chain: Chain,
        holdings: &[Holding],
    ) -> HashMap<String, SecurityFindings> {
        let addresses: Vec<String> = holdings
            .iter()
            .filter(|h| !h.is_native_on(chain))
            .filter_map(Holding::contract_key)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        if addresses.is_empty() {
            return HashMap::new();
        }

        let raw = match self
            .with_retries("security", || self.security.fetch_security(chain, &addresses))
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(
                    chain = %chain,
                    source = self.security.name(),
                    error = %e,
                    "security data unavailable, classifying without findings"
                );
                return HashMap::new();
            }
        };

        raw.iter()
            .filter_map(|(addr, record)| {
                security::normalize(Some(record)).map(|f| (addr.to_ascii_lowercase(), f))
            })
            .collect()
    }

    async fn with_retries<T, F, Fut>(&self, source_name: &'static str, mut call: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let timeout = self.config.upstream_timeout;
        let mut attempt: u32 = 0;

        loop {
            let outcome = tokio::time::timeout(timeout, call())
                .await
                .unwrap_or_else(|_| {
                    Err(RiskError::UpstreamTimeout {
                        source_name,
                        secs: timeout.as_secs(),
                    })
                });

            match outcome {
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        source = source_name,
                        attempt,
                        error = %e,
                        "upstream call failed, retrying"
                    );
                    tokio::time::sleep(self.config.retry_backoff * attempt).await;
                }
                other => return other,
            }
        }
    }
}
