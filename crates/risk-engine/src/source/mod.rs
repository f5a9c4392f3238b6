//! Upstream Data Sources
//!
//! Collaborators that supply holdings and raw security records. The
//! classification core never calls these; the assessor fetches everything
//! up front and hands plain data to the classifier.

mod goplus;
mod mock;

pub use goplus::{GoPlusClient, GoPlusConfig};
pub use mock::{MockHoldingsSource, MockSecuritySource};

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{Chain, PortfolioSnapshot};
use crate::security::RawSecurityRecord;

/// Chain-indexing service supplying balances and prices
///
/// Implementations return amounts already in human units and prices already
/// resolved.
#[async_trait]
pub trait HoldingsSource: Send + Sync {
    /// Current holdings of `wallet` on `chain`
    async fn fetch_portfolio(&self, wallet: &str, chain: Chain) -> Result<PortfolioSnapshot>;

    /// Source name for logs
    fn name(&self) -> &str;
}

/// Token-security scanner
#[async_trait]
pub trait SecuritySource: Send + Sync {
    /// Raw records keyed by lower-cased contract address. Addresses the
    /// scanner has no data for are simply missing from the map.
    async fn fetch_security(
        &self,
        chain: Chain,
        addresses: &[String],
    ) -> Result<HashMap<String, RawSecurityRecord>>;

    /// Source name for logs
    fn name(&self) -> &str;
}
