//! GoPlus Token Security Client
//!
//! `GET {base}/token_security/{chain_id}?contract_addresses=a,b`

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::SecuritySource;
use crate::error::{Result, RiskError};
use crate::model::Chain;
use crate::security::RawSecurityRecord;

const SOURCE_NAME: &str = "goplus";

/// GoPlus client configuration
#[derive(Clone, Debug)]
pub struct GoPlusConfig {
    /// API base URL
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Optional bearer token for higher rate limits
    pub access_token: Option<String>,
}

impl Default for GoPlusConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.gopluslabs.io/api/v1".into(),
            timeout_secs: 10,
            access_token: None,
        }
    }
}

impl GoPlusConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let base_url = std::env::var("GOPLUS_BASE_URL").unwrap_or(defaults.base_url);
        let timeout_secs = std::env::var("GOPLUS_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.timeout_secs);
        let access_token = std::env::var("GOPLUS_ACCESS_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());

        Self {
            base_url,
            timeout_secs,
            access_token,
        }
    }
}

/// Envelope returned by the token security endpoint
#[derive(Debug, Deserialize)]
struct GoPlusResponse {
    code: i64,
    #[serde(default)]
    message: String,
    #[serde(default)]
    result: Option<HashMap<String, RawSecurityRecord>>,
}

/// 1 = complete, 2 = partially obtained
const fn is_success_code(code: i64) -> bool {
    matches!(code, 1 | 2)
}

fn into_records(response: GoPlusResponse) -> Result<HashMap<String, RawSecurityRecord>> {
    if !is_success_code(response.code) {
        return Err(RiskError::Upstream {
            source_name: SOURCE_NAME,
            message: format!("code {}: {}", response.code, response.message),
        });
    }

    Ok(response
        .result
        .unwrap_or_default()
        .into_iter()
        .map(|(addr, record)| (addr.to_ascii_lowercase(), record))
        .collect())
}

/// Decode a raw response body into lower-cased address records
fn parse_records(body: &str) -> Result<HashMap<String, RawSecurityRecord>> {
    let response: GoPlusResponse = serde_json::from_str(body)?;
    into_records(response)
}

/// Security source backed by the GoPlus public API
pub struct GoPlusClient {
    http: reqwest::Client,
    config: GoPlusConfig,
}

impl GoPlusClient {
    pub fn new(config: GoPlusConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(GoPlusConfig::from_env())
    }

    fn endpoint(&self, chain: Chain) -> String {
        format!(
            "{}/token_security/{}",
            self.config.base_url.trim_end_matches('/'),
            chain.chain_id()
        )
    }
}

#[async_trait]
impl SecuritySource for GoPlusClient {
    async fn fetch_security(
        &self,
        chain: Chain,
        addresses: &[String],
    ) -> Result<HashMap<String, RawSecurityRecord>> {
        if addresses.is_empty() {
            return Ok(HashMap::new());
        }

        let mut request = self
            .http
            .get(self.endpoint(chain))
            .query(&[("contract_addresses", addresses.join(","))]);
        if let Some(token) = &self.config.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RiskError::Upstream {
                source_name: SOURCE_NAME,
                message: format!("HTTP {status}"),
            });
        }

        let body = response.text().await?;
        let records = parse_records(&body)?;

        tracing::debug!(
            chain = %chain,
            requested = addresses.len(),
            returned = records.len(),
            "fetched token security records"
        );

        Ok(records)
    }

    fn name(&self) -> &str {
        SOURCE_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::normalize;

    #[test]
    fn test_parse_scanner_payload() {
        let body = serde_json::json!({
            "code": 1,
            "message": "OK",
            "result": {
                "0xABCDEFabcdefABCDEFabcdefABCDEFabcdefABCD": {
                    "is_honeypot": "1",
                    "sell_tax": "0.15",
                    "buy_tax": "0",
                    "is_open_source": "1",
                    "holders": [{"address": "0x1", "percent": "0.5"}]
                }
            }
        });
        let response: GoPlusResponse = serde_json::from_value(body).unwrap();
        let records = into_records(response).unwrap();

        let record = records
            .get("0xabcdefabcdefabcdefabcdefabcdefabcdefabcd")
            .expect("keys are lower-cased");
        let findings = normalize(Some(record)).unwrap();
        assert!(findings.is_honeypot);
        assert!((findings.sell_tax_percent - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_error_code_is_upstream_error() {
        let body = serde_json::json!({
            "code": 4029,
            "message": "too many requests",
            "result": null
        });
        let response: GoPlusResponse = serde_json::from_value(body).unwrap();
        let err = into_records(response).unwrap_err();
        assert!(err.is_retryable());
        assert!(err.to_string().contains("4029"));
    }

    #[test]
    fn test_malformed_body_is_serialization_error() {
        let err = parse_records("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, RiskError::Serialization(_)));
        assert!(!err.is_retryable());

        let records = parse_records(r#"{"code": 1, "result": {"0xAB": {"is_proxy": "1"}}}"#).unwrap();
        assert!(records.contains_key("0xab"));
    }

    #[test]
    fn test_partial_result_accepted() {
        let body = serde_json::json!({ "code": 2, "message": "partial", "result": {} });
        let response: GoPlusResponse = serde_json::from_value(body).unwrap();
        assert!(into_records(response).unwrap().is_empty());
    }

    #[test]
    fn test_endpoint_uses_chain_id() {
        let client = GoPlusClient::new(GoPlusConfig {
            base_url: "https://scanner.test/api/v1/".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(client.endpoint(Chain::Bsc), "https://scanner.test/api/v1/token_security/56");
    }

    #[tokio::test]
    async fn test_no_addresses_skips_request() {
        let client = GoPlusClient::new(GoPlusConfig {
            base_url: "http://127.0.0.1:9".into(),
            timeout_secs: 1,
            access_token: None,
        })
        .unwrap();
        let records = client.fetch_security(Chain::Ethereum, &[]).await.unwrap();
        assert!(records.is_empty());
    }
}
