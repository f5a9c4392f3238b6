//! Server Configuration

use std::sync::Arc;

use risk_engine::source::{GoPlusClient, MockSecuritySource, SecuritySource};
use risk_engine::{AssessorConfig, RiskError};

/// Which scanner backs the assessor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SecuritySourceKind {
    GoPlus,
    Mock,
}

impl SecuritySourceKind {
    fn parse(value: &str) -> Result<Self, RiskError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "goplus" => Ok(Self::GoPlus),
            "mock" => Ok(Self::Mock),
            other => Err(RiskError::Config(format!(
                "RISK_SECURITY_SOURCE must be 'goplus' or 'mock', got '{other}'"
            ))),
        }
    }

    pub fn build(self) -> Result<Arc<dyn SecuritySource>, RiskError> {
        Ok(match self {
            Self::GoPlus => Arc::new(GoPlusClient::from_env()?),
            Self::Mock => Arc::new(MockSecuritySource::new()),
        })
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub security_source: SecuritySourceKind,
    pub assessor: AssessorConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, RiskError> {
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
        let security_source = std::env::var("RISK_SECURITY_SOURCE")
            .map_or(Ok(SecuritySourceKind::Mock), |v| SecuritySourceKind::parse(&v))?;

        Ok(Self {
            bind_addr,
            security_source,
            assessor: AssessorConfig::from_env(),
        })
    }
}
