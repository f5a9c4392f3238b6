//! Application State

use std::sync::Arc;

use risk_engine::RiskAssessor;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Wallet assessor with its upstream sources
    pub assessor: Arc<RiskAssessor>,
}
