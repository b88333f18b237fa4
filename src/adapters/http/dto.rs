//! Request and response bodies.
//!
//! Amounts leave the service as JSON numbers; this is the only place the
//! exact `TokenAmount` is narrowed to `f64`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{BalanceRecord, EvmAddress, HolderRecord, TokenMetadata};

/// `POST /balances` body.
///
/// Items are kept as raw JSON so a non-string entry only blanks its own
/// slot. A missing list is an empty batch.
#[derive(Debug, Deserialize)]
pub struct BalancesRequest {
  /// Addresses to look up, in order.
  #[serde(default)]
  pub addresses: Vec<Value>,
}

impl BalancesRequest {
  /// String entries, in order; other JSON types are skipped.
  pub fn candidates(&self) -> Vec<String> {
    self.addresses.iter().filter_map(Value::as_str).map(str::to_owned).collect()
  }

  /// Spread per-candidate results back over every requested slot.
  pub fn align<T>(&self, looked_up: Vec<Option<T>>) -> Vec<Option<T>> {
    let mut looked_up = looked_up.into_iter();
    self
      .addresses
      .iter()
      .map(|item| if item.is_string() { looked_up.next().flatten() } else { None })
      .collect()
  }
}

/// `GET /balance/:address` response.
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
  pub address: EvmAddress,
  pub balance: f64,
  pub symbol: String,
}

impl From<BalanceRecord> for BalanceResponse {
  fn from(record: BalanceRecord) -> Self {
    Self {
      address: record.address,
      balance: record.balance.to_f64(),
      symbol: record.symbol,
    }
  }
}

/// `POST /balances` response, aligned with the request.
#[derive(Debug, Serialize)]
pub struct BalancesResponse {
  pub balances: Vec<Option<f64>>,
}

/// `GET /getinfo/token/:address` response.
#[derive(Debug, Serialize)]
pub struct TokenInfoResponse {
  pub name: String,
  pub symbol: String,
  #[serde(rename = "totalSupply")]
  pub total_supply: f64,
  pub decimals: u8,
}

impl From<TokenMetadata> for TokenInfoResponse {
  fn from(meta: TokenMetadata) -> Self {
    Self {
      name: meta.name,
      symbol: meta.symbol,
      total_supply: meta.total_supply.to_f64(),
      decimals: meta.decimals,
    }
  }
}

/// `[address, balance]` ranking row.
pub type HolderRow = (String, f64);

/// `[address, balance, last_tx]` ranking row.
pub type HolderActivityRow = (String, f64, Option<String>);

/// `/top*` response.
#[derive(Debug, Serialize)]
pub struct TopHoldersResponse<R> {
  pub top_holders: Vec<R>,
}

pub fn holder_rows(holders: Vec<HolderRecord>) -> Vec<HolderRow> {
  holders.into_iter().map(|h| (h.address, h.balance)).collect()
}

pub fn holder_activity_rows(holders: Vec<HolderRecord>) -> Vec<HolderActivityRow> {
  holders
    .into_iter()
    .map(|h| (h.address, h.balance, h.last_activity.map(|t| t.to_rfc3339())))
    .collect()
}
