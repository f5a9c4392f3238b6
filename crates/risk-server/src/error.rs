//! Transport Errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use risk_engine::RiskError;

#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] RiskError);

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            RiskError::InvalidWallet(_) => (StatusCode::BAD_REQUEST, "INVALID_WALLET"),
            RiskError::UnsupportedChain(_) => (StatusCode::BAD_REQUEST, "UNSUPPORTED_CHAIN"),
            RiskError::UpstreamTimeout { .. } => (StatusCode::GATEWAY_TIMEOUT, "UPSTREAM_TIMEOUT"),
            RiskError::Upstream { .. } | RiskError::Network(_) | RiskError::Serialization(_) => {
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR")
            }
            RiskError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        if status.is_server_error() {
            tracing::error!(error = %self.0, error_code = code, "Request failed");
        } else {
            tracing::warn!(error = %self.0, error_code = code, "Request rejected");
        }

        let body = Json(ErrorResponse {
            error: self.0.user_message(),
            code: code.into(),
        });

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (RiskError::InvalidWallet("x".into()), StatusCode::BAD_REQUEST),
            (RiskError::UnsupportedChain("x".into()), StatusCode::BAD_REQUEST),
            (
                RiskError::UpstreamTimeout { source_name: "holdings", secs: 10 },
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (
                RiskError::Upstream { source_name: "holdings", message: "x".into() },
                StatusCode::BAD_GATEWAY,
            ),
            (RiskError::Config("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), expected);
        }
    }
}
