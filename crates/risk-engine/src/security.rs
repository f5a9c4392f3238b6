//! Security Signal Normalization
//!
//! Maps the scanner's loosely typed per-contract payload onto a uniform flag
//! set. The scanner encodes flags as `"0"`/`"1"` strings and taxes as
//! fractions (`"0.12"` is 12%), but booleans and numbers are accepted too.
//! Missing numbers become 0 and missing flags become `false`; an absent
//! payload stays absent so the classifier can treat it as its own signal.

use serde::{Deserialize, Serialize};

use crate::model::finite_or_zero;

/// One scalar as the scanner sent it
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl RawValue {
    fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Number(n) => n.is_finite() && *n != 0.0,
            Self::Text(s) => {
                let s = s.trim();
                s == "1" || s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("yes")
            }
        }
    }

    fn as_number(&self) -> f64 {
        let n = match self {
            Self::Bool(true) => 1.0,
            Self::Bool(false) => 0.0,
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        };
        finite_or_zero(n)
    }
}

/// Raw per-contract scanner record
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawSecurityRecord {
    #[serde(default)]
    pub is_honeypot: Option<RawValue>,
    #[serde(default)]
    pub cannot_sell_all: Option<RawValue>,
    /// Fraction, e.g. `"0.05"`
    #[serde(default)]
    pub buy_tax: Option<RawValue>,
    /// Fraction, e.g. `"0.05"`
    #[serde(default)]
    pub sell_tax: Option<RawValue>,
    #[serde(default)]
    pub is_proxy: Option<RawValue>,
    #[serde(default)]
    pub is_mintable: Option<RawValue>,
    #[serde(default)]
    pub owner_change_balance: Option<RawValue>,
    #[serde(default)]
    pub hidden_owner: Option<RawValue>,
    #[serde(default)]
    pub transfer_pausable: Option<RawValue>,
    #[serde(default)]
    pub is_blacklisted: Option<RawValue>,
    #[serde(default, alias = "riskScore")]
    pub risk_score: Option<RawValue>,
    #[serde(default, alias = "riskLevel")]
    pub risk_level: Option<String>,
}

/// Normalized contract-safety flags for one contract
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityFindings {
    pub is_honeypot: bool,
    pub cannot_sell_all: bool,
    /// 0-100
    pub buy_tax_percent: f64,
    /// 0-100
    pub sell_tax_percent: f64,
    pub is_proxy: bool,
    pub is_mintable: bool,
    pub owner_can_change_balance: bool,
    pub has_hidden_owner: bool,
    pub transfer_pausable: bool,
    pub is_blacklistable: bool,
    /// Scanner's own score, 0-100
    pub risk_score: Option<f64>,
    /// Scanner's own label
    pub risk_level: Option<String>,
}

impl SecurityFindings {
    /// Findings with every flag cleared
    pub fn clean() -> Self {
        Self::default()
    }

    /// Tax with NaN and out-of-range values clamped into 0-100
    pub fn buy_tax(&self) -> f64 {
        clamp_percent(self.buy_tax_percent)
    }

    pub fn sell_tax(&self) -> f64 {
        clamp_percent(self.sell_tax_percent)
    }
}

fn clamp_percent(value: f64) -> f64 {
    finite_or_zero(value).clamp(0.0, 100.0)
}

fn flag(value: Option<&RawValue>) -> bool {
    value.is_some_and(RawValue::is_truthy)
}

fn tax_percent(value: Option<&RawValue>) -> f64 {
    value.map_or(0.0, |v| clamp_percent(v.as_number() * 100.0))
}

/// Convert a raw scanner record into findings. Never fails.
pub fn normalize(raw: Option<&RawSecurityRecord>) -> Option<SecurityFindings> {
    let raw = raw?;

    Some(SecurityFindings {
        is_honeypot: flag(raw.is_honeypot.as_ref()),
        cannot_sell_all: flag(raw.cannot_sell_all.as_ref()),
        buy_tax_percent: tax_percent(raw.buy_tax.as_ref()),
        sell_tax_percent: tax_percent(raw.sell_tax.as_ref()),
        is_proxy: flag(raw.is_proxy.as_ref()),
        is_mintable: flag(raw.is_mintable.as_ref()),
        owner_can_change_balance: flag(raw.owner_change_balance.as_ref()),
        has_hidden_owner: flag(raw.hidden_owner.as_ref()),
        transfer_pausable: flag(raw.transfer_pausable.as_ref()),
        is_blacklistable: flag(raw.is_blacklisted.as_ref()),
        risk_score: raw
            .risk_score
            .as_ref()
            .map(|v| clamp_percent(v.as_number())),
        risk_level: raw
            .risk_level
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(json: serde_json::Value) -> RawSecurityRecord {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_absent_stays_absent() {
        assert!(normalize(None).is_none());
    }

    #[test]
    fn test_empty_record_defaults() {
        let findings = normalize(Some(&RawSecurityRecord::default())).unwrap();
        assert_eq!(findings, SecurityFindings::clean());
    }

    #[test]
    fn test_scanner_string_encoding() {
        let raw = record(serde_json::json!({
            "is_honeypot": "1",
            "cannot_sell_all": "0",
            "buy_tax": "0.05",
            "sell_tax": "0.12",
            "is_proxy": "1",
            "hidden_owner": "0",
            "is_blacklisted": "1",
            "holder_count": "1234"
        }));
        let findings = normalize(Some(&raw)).unwrap();

        assert!(findings.is_honeypot);
        assert!(!findings.cannot_sell_all);
        assert!((findings.buy_tax_percent - 5.0).abs() < 1e-9);
        assert!((findings.sell_tax_percent - 12.0).abs() < 1e-9);
        assert!(findings.is_proxy);
        assert!(findings.is_blacklistable);
        assert!(!findings.is_mintable);
    }

    #[test]
    fn test_booleans_and_numbers_accepted() {
        let raw = record(serde_json::json!({
            "is_mintable": true,
            "transfer_pausable": 1,
            "owner_change_balance": false,
            "sell_tax": 0.2,
            "riskScore": 72,
            "riskLevel": " high "
        }));
        let findings = normalize(Some(&raw)).unwrap();

        assert!(findings.is_mintable);
        assert!(findings.transfer_pausable);
        assert!(!findings.owner_can_change_balance);
        assert!((findings.sell_tax_percent - 20.0).abs() < 1e-9);
        assert_eq!(findings.risk_score, Some(72.0));
        assert_eq!(findings.risk_level.as_deref(), Some("high"));
    }

    #[test]
    fn test_malformed_numbers_clamped() {
        let raw = record(serde_json::json!({
            "buy_tax": "",
            "sell_tax": "-0.3",
            "riskScore": "not a number"
        }));
        let findings = normalize(Some(&raw)).unwrap();
        assert_eq!(findings.buy_tax_percent, 0.0);
        assert_eq!(findings.sell_tax_percent, 0.0);
        assert_eq!(findings.risk_score, Some(0.0));

        let over = record(serde_json::json!({ "sell_tax": "3" }));
        assert_eq!(normalize(Some(&over)).unwrap().sell_tax_percent, 100.0);
    }

    #[test]
    fn test_accessors_guard_hand_built_values() {
        let findings = SecurityFindings {
            buy_tax_percent: f64::NAN,
            sell_tax_percent: -4.0,
            ..SecurityFindings::clean()
        };
        assert_eq!(findings.buy_tax(), 0.0);
        assert_eq!(findings.sell_tax(), 0.0);
    }
}
