use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Body of an inbound `invoice` (credit) request.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InvoiceRequest {
    pub wallet_id: i32,
    pub ticker: String,
    pub amount: f64,
}

/// Body of an inbound `withdraw` (debit) request.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WithdrawRequest {
    pub wallet_id: i32,
    pub ticker: String,
    pub amount: f64,
}

/// Body of an inbound `balance` request.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GetBalanceRequest {
    pub wallet_id: i32,
}

/// Body of a successful `balance` reply, JSON-encoded into `ReplyEnvelope::body`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct GetBalanceResponse {
    pub actual_balance: HashMap<String, f64>,
    pub frozen_balance: HashMap<String, f64>,
}

/// The envelope published to `reply_to` for every inbound delivery.
///
/// `Success` carries an optional JSON-encoded-as-string `body` (used only by
/// `balance`); `Error` always carries a human-readable `reason`. Serializes
/// as a flat JSON object either way (`#[serde(untagged)]`); deserializing
/// needs a manual impl below because untagged matching alone can't tell the
/// variants apart — a `Success` with no `body` and an `Error` share every
/// field name except `reason`, so trying variants in order would silently
/// parse a real `Error` payload as a bodyless `Success` and drop `reason`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ReplyEnvelope {
    Success {
        operation: String,
        code: u16,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        body: Option<String>,
    },
    Error {
        operation: String,
        code: u16,
        reason: String,
    },
}

impl<'de> Deserialize<'de> for ReplyEnvelope {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            operation: String,
            code: u16,
            #[serde(default)]
            body: Option<String>,
            #[serde(default)]
            reason: Option<String>,
        }

        let raw = Raw::deserialize(deserializer)?;
        Ok(match raw.reason {
            Some(reason) => ReplyEnvelope::Error {
                operation: raw.operation,
                code: raw.code,
                reason,
            },
            None => ReplyEnvelope::Success {
                operation: raw.operation,
                code: raw.code,
                body: raw.body,
            },
        })
    }
}

impl ReplyEnvelope {
    pub fn success(operation: impl Into<String>) -> Self {
        ReplyEnvelope::Success {
            operation: operation.into(),
            code: 200,
            body: None,
        }
    }

    pub fn success_with_body(operation: impl Into<String>, body: String) -> Self {
        ReplyEnvelope::Success {
            operation: operation.into(),
            code: 200,
            body: Some(body),
        }
    }

    pub fn error(operation: impl Into<String>, code: u16, reason: impl Into<String>) -> Self {
        ReplyEnvelope::Error {
            operation: operation.into(),
            code,
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> u16 {
        match self {
            ReplyEnvelope::Success { code, .. } => *code,
            ReplyEnvelope::Error { code, .. } => *code,
        }
    }

    pub fn operation(&self) -> &str {
        match self {
            ReplyEnvelope::Success { operation, .. } => operation,
            ReplyEnvelope::Error { operation, .. } => operation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_without_body_serializes_without_the_body_key() {
        let envelope = ReplyEnvelope::success("invoice");
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json, serde_json::json!({"operation": "invoice", "code": 200}));
    }

    #[test]
    fn balance_success_embeds_body_as_a_json_string() {
        let balance = GetBalanceResponse {
            actual_balance: HashMap::from([("USD".to_string(), 4.0)]),
            frozen_balance: HashMap::new(),
        };
        let envelope = ReplyEnvelope::success_with_body(
            "balance",
            serde_json::to_string(&balance).unwrap(),
        );
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["code"], 200);
        assert!(json["body"].as_str().unwrap().contains("\"USD\":4.0"));
    }

    #[test]
    fn error_round_trips() {
        let envelope = ReplyEnvelope::error("withdraw", 400, "insufficient funds");
        let json = serde_json::to_string(&envelope).unwrap();
        let back: ReplyEnvelope = serde_json::from_str(&json).unwrap();
        assert_eq!(back, envelope);
    }
}
