//! Graph Token API Backend - `/v1/evm/holders`
//!
//! Balances arrive already scaled. `last_update` is surfaced only when the
//! query asks for activity.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use super::client::{IndexerClient, IndexerClientConfig};
use super::types::{GraphHolder, GraphHoldersPage, parse_timestamp};
use crate::config::GraphConfig;
use crate::domain::error::provider;
use crate::domain::{HolderRecord, LookupError, token::rank_holders};
use crate::ports::holder_index::{HolderIndex, HolderQuery};

const CALL: &str = "holders";

/// `HolderIndex` over the graph token API.
pub struct GraphIndex {
  client: IndexerClient,
  holders_url: String,
  network: String,
  jwt: String,
}

impl GraphIndex {
  /// Build the backend from its config section.
  pub fn new(config: &GraphConfig) -> Result<Self> {
    let client = IndexerClient::new(
      provider::GRAPH,
      IndexerClientConfig {
        timeout: Duration::from_millis(config.timeout_ms),
        ..IndexerClientConfig::default()
      },
    )?;

    Ok(Self {
      client,
      holders_url: format!("{}/v1/evm/holders", config.base_url.trim_end_matches('/')),
      network: config.network.clone(),
      jwt: config.jwt.clone(),
    })
  }

  fn holder(raw: GraphHolder, with_activity: bool) -> HolderRecord {
    let last_activity = if with_activity {
      raw.last_update.as_deref().and_then(|ts| {
        let parsed = parse_timestamp(ts);
        if parsed.is_none() {
          warn!(address = %raw.address, last_update = ts, "Unparsable last_update");
        }
        parsed
      })
    } else {
      None
    };

    HolderRecord {
      address: raw.address,
      balance: raw.value,
      symbol: raw.symbol,
      last_activity,
    }
  }
}

#[async_trait]
impl HolderIndex for GraphIndex {
  fn name(&self) -> &'static str {
    provider::GRAPH
  }

  fn needs_scale(&self) -> bool {
    false
  }

  #[instrument(skip(self), fields(token = %query.token, limit = query.limit))]
  async fn top_holders(&self, query: &HolderQuery) -> Result<Vec<HolderRecord>, LookupError> {
    let params = [
      ("network", self.network.clone()),
      ("contract", query.token.to_string()),
      ("limit", query.limit.to_string()),
      ("page", "1".to_string()),
    ];

    let page: GraphHoldersPage = self
      .client
      .get_json(&self.holders_url, &params, Some(&self.jwt), CALL)
      .await?;

    let mut holders: Vec<HolderRecord> = page
      .data
      .into_iter()
      .map(|h| Self::holder(h, query.with_activity))
      .collect();
    rank_holders(&mut holders);

    debug!(count = holders.len(), "Graph holders fetched");
    Ok(holders)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::EvmAddress;
  use mockito::{Matcher, Server};

  const BODY: &str = r#"{"data":[
    {"address":"0xaaa","value":"3.5","symbol":"TKN","last_update":"2025-05-01 10:00:00"},
    {"address":"0xbbb","value":12.25,"symbol":"TKN","last_update":"not a date"}
  ]}"#;

  fn index(base_url: String) -> GraphIndex {
    let config = GraphConfig {
      base_url,
      jwt: "jwt-token".into(),
      ..GraphConfig::default()
    };
    GraphIndex::new(&config).unwrap()
  }

  fn query(with_activity: bool) -> HolderQuery {
    HolderQuery {
      token: EvmAddress::parse("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").unwrap(),
      limit: 10,
      scale: None,
      with_activity,
    }
  }

  async fn serve(server: &mut mockito::ServerGuard) -> mockito::Mock {
    server
      .mock("GET", "/v1/evm/holders")
      .match_header("authorization", "Bearer jwt-token")
      .match_query(Matcher::AllOf(vec![
        Matcher::UrlEncoded("network".into(), "matic".into()),
        Matcher::UrlEncoded("limit".into(), "10".into()),
        Matcher::UrlEncoded("page".into(), "1".into()),
      ]))
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(BODY)
      .create_async()
      .await
  }

  #[tokio::test]
  async fn test_plain_variant_drops_activity() {
    let mut server = Server::new_async().await;
    let mock = serve(&mut server).await;

    let holders = index(server.url()).top_holders(&query(false)).await.unwrap();

    mock.assert_async().await;
    assert_eq!(holders[0].address, "0xbbb");
    assert!((holders[0].balance - 12.25).abs() < f64::EPSILON);
    assert!(holders.iter().all(|h| h.last_activity.is_none()));
  }

  #[tokio::test]
  async fn test_activity_variant_parses_timestamps() {
    let mut server = Server::new_async().await;
    serve(&mut server).await;

    let holders = index(server.url()).top_holders(&query(true)).await.unwrap();

    // Unparsable timestamp becomes absent, the holder is kept.
    assert_eq!(holders.len(), 2);
    assert!(holders[0].last_activity.is_none());
    assert_eq!(
      holders[1].last_activity.map(|t| t.timestamp()),
      Some(1_746_093_600)
    );
  }

  #[tokio::test]
  async fn test_missing_data_is_provider_error() {
    let mut server = Server::new_async().await;
    server
      .mock("GET", "/v1/evm/holders")
      .match_query(Matcher::Any)
      .with_status(200)
      .with_body(r#"{"error":"bad token"}"#)
      .create_async()
      .await;

    let err = index(server.url()).top_holders(&query(false)).await.unwrap_err();
    assert!(matches!(err, LookupError::Provider { provider: "graph", .. }));
  }

  #[tokio::test]
  async fn test_non_finite_value_is_provider_error() {
    let mut server = Server::new_async().await;
    server
      .mock("GET", "/v1/evm/holders")
      .match_query(Matcher::Any)
      .with_status(200)
      .with_body(r#"{"data":[{"address":"0xaaa","value":"NaN"},{"address":"0xbbb","value":"2"}]}"#)
      .create_async()
      .await;

    let err = index(server.url()).top_holders(&query(false)).await.unwrap_err();
    assert!(matches!(err, LookupError::Provider { provider: "graph", .. }));
  }
}
