//! Indexer Response Types
//!
//! Wire formats of the block-explorer `topholders` endpoint and the graph
//! token API `/v1/evm/holders` endpoint.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Etherscan-family response envelope.
///
/// `result` is an array on success and an error string otherwise.
#[derive(Debug, Clone, Deserialize)]
pub struct ExplorerEnvelope {
  /// "1" on success.
  pub status: String,
  /// Short status text ("OK", "NOTOK").
  #[serde(default)]
  pub message: String,
  /// Payload or error detail.
  pub result: serde_json::Value,
}

impl ExplorerEnvelope {
  /// Upstream error detail: `result` when it is a string, else `message`.
  pub fn error_detail(&self) -> String {
    match &self.result {
      serde_json::Value::String(s) if !s.is_empty() => s.clone(),
      _ => self.message.clone(),
    }
  }
}

/// One `topholders` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ExplorerHolder {
  /// Holder address.
  #[serde(rename = "TokenHolderAddress", alias = "HolderAddress")]
  pub address: String,
  /// Raw integer balance as a decimal string.
  #[serde(rename = "TokenHolderQuantity", alias = "Balance")]
  pub quantity: String,
}

/// Graph token API holders page.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphHoldersPage {
  /// Holders, largest first.
  pub data: Vec<GraphHolder>,
}

/// One graph holder entry.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphHolder {
  /// Holder address.
  pub address: String,
  /// Balance already scaled by the token decimals.
  #[serde(deserialize_with = "number_or_string")]
  pub value: f64,
  /// Token symbol.
  #[serde(default)]
  pub symbol: Option<String>,
  /// Last balance change.
  #[serde(default)]
  pub last_update: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
  Number(f64),
  String(String),
}

fn number_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
  let value = match NumberOrString::deserialize(deserializer)? {
    NumberOrString::Number(v) => v,
    NumberOrString::String(s) => s.trim().parse().map_err(serde::de::Error::custom)?,
  };
  if !value.is_finite() {
    return Err(serde::de::Error::custom(format!("non-finite holder value {value}")));
  }
  Ok(value)
}

/// Parse an indexer timestamp: RFC 3339, `YYYY-MM-DD HH:MM:SS` (UTC) or
/// unix seconds.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
  let raw = raw.trim();
  if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
    return Some(ts.with_timezone(&Utc));
  }
  if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
    return Some(naive.and_utc());
  }
  raw.parse::<i64>()
    .ok()
    .and_then(|secs| DateTime::from_timestamp(secs, 0))
}
