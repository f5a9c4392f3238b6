//! # risk-engine
//!
//! Deterministic, rule-based risk classification for a crypto wallet's token
//! holdings on a single EVM chain.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │   holdings   │   │ raw scanner  │   │              │   │              │
//! │   snapshot   │   │   records    │──▶│  normalize   │──▶│   classify   │
//! └──────┬───────┘   └──────────────┘   └──────────────┘   │ (per token)  │
//!        └────────────────────────────────────────────────▶│              │
//!                                                          └──────┬───────┘
//!                                                                 ▼
//!                                                          ┌──────────────┐
//!                                                          │  aggregate   │
//!                                                          │ (portfolio)  │
//!                                                          └──────────────┘
//! ```
//!
//! The normalizer, classifier and aggregator are pure and total: they hold no
//! state, perform no I/O and never fail. [`assessor::RiskAssessor`] is the
//! thin boundary that fetches upstream data first and then runs the pipeline.
//!
//! ## Verdicts
//!
//! | Level     | Triggered by                                                       |
//! |-----------|--------------------------------------------------------------------|
//! | `warning` | honeypot, sell restriction, sell tax > 10%, owner balance control, hidden owner, 24h move > 20% |
//! | `caution` | tax > 5%, proxy, mintable, pausable, meme token, no scanner data   |
//! | `safe`    | none of the above, or the chain's native asset                     |

pub mod aggregator;
pub mod assessor;
pub mod classifier;
pub mod error;
pub mod model;
pub mod security;
pub mod source;
pub mod taxonomy;

pub use aggregator::PortfolioRiskAggregator;
pub use assessor::{AssessorConfig, RiskAssessor};
pub use classifier::TokenRiskClassifier;
pub use error::{Result, RiskError};
pub use model::{
    AllocationSlice, AssessedHolding, Chain, EvidenceItem, Holding, Importance, PortfolioReport,
    PortfolioRiskLevel, PortfolioSnapshot, RiskCounts, RiskLevel, RiskVerdict, WalletRiskAssessment,
};
pub use security::{normalize, RawSecurityRecord, SecurityFindings};
