//! Error Types for the Risk Engine
//!
//! The classification core is total and never produces these. They belong to
//! the request boundary: input validation and the upstream collaborators.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RiskError>;

#[derive(Error, Debug)]
pub enum RiskError {
    #[error("Invalid wallet address: {0}")]
    InvalidWallet(String),

    #[error("Chain not supported: {0}")]
    UnsupportedChain(String),

    #[error("Upstream error ({source_name}): {message}")]
    Upstream {
        source_name: &'static str,
        message: String,
    },

    #[error("Upstream timeout ({source_name}) after {secs}s")]
    UpstreamTimeout {
        source_name: &'static str,
        secs: u64,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RiskError {
    /// Check if the failed upstream call is worth repeating
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Upstream { .. } | Self::UpstreamTimeout { .. } | Self::Network(_)
        )
    }

    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidWallet(addr) => format!("'{addr}' is not a valid wallet address."),
            Self::UnsupportedChain(chain) => format!("Chain '{chain}' is not supported."),
            Self::Upstream { .. } | Self::Network(_) => {
                "Portfolio data is temporarily unavailable. Please try again.".into()
            }
            Self::UpstreamTimeout { .. } => {
                "Portfolio data took too long to load. Please try again.".into()
            }
            _ => "An unexpected error occurred.".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        let upstream = RiskError::Upstream {
            source_name: "holdings",
            message: "502".into(),
        };
        assert!(upstream.is_retryable());
        assert!(RiskError::UpstreamTimeout { source_name: "goplus", secs: 10 }.is_retryable());
        assert!(!RiskError::InvalidWallet("0x1".into()).is_retryable());
        assert!(!RiskError::UnsupportedChain("solana".into()).is_retryable());
    }

    #[test]
    fn test_user_message_names_input() {
        let err = RiskError::UnsupportedChain("solana".into());
        assert!(err.user_message().contains("solana"));
    }
}
