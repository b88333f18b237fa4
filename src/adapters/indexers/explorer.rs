//! Block Explorer Backend - Etherscan-family `topholders`
//!
//! Balances come back as raw integer strings and are scaled with the
//! decimals supplied in the query. Quantities some explorer deployments
//! pre-format as decimals are read back at the same scale.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, instrument};

use super::client::{IndexerClient, IndexerClientConfig};
use super::types::{ExplorerEnvelope, ExplorerHolder};
use crate::config::ExplorerConfig;
use crate::domain::error::provider;
use crate::domain::{HolderRecord, LookupError, TokenAmount, token::rank_holders};
use crate::ports::holder_index::{HolderIndex, HolderQuery};

const CALL: &str = "topholders";

/// `HolderIndex` over a block-explorer API.
pub struct ExplorerIndex {
  client: IndexerClient,
  base_url: String,
  chain_id: u64,
  api_key: String,
}

impl ExplorerIndex {
  /// Build the backend from its config section.
  pub fn new(config: &ExplorerConfig) -> Result<Self> {
    let client = IndexerClient::new(
      provider::EXPLORER,
      IndexerClientConfig {
        timeout: Duration::from_millis(config.timeout_ms),
        ..IndexerClientConfig::default()
      },
    )?;

    Ok(Self {
      client,
      base_url: config.base_url.clone(),
      chain_id: config.chain_id,
      api_key: config.api_key.clone(),
    })
  }

  fn holder(raw: ExplorerHolder, scale: u8) -> Result<HolderRecord, LookupError> {
    let parsed = if raw.quantity.contains('.') {
      TokenAmount::from_display(&raw.quantity, scale)
    } else {
      TokenAmount::parse_raw(&raw.quantity, scale)
    };
    let amount = parsed.map_err(|e| {
      LookupError::provider(provider::EXPLORER, CALL, format!("bad quantity for {}: {e}", raw.address))
    })?;

    Ok(HolderRecord {
      address: raw.address,
      balance: amount.to_f64(),
      symbol: None,
      last_activity: None,
    })
  }
}

#[async_trait]
impl HolderIndex for ExplorerIndex {
  fn name(&self) -> &'static str {
    provider::EXPLORER
  }

  fn needs_scale(&self) -> bool {
    true
  }

  #[instrument(skip(self), fields(token = %query.token, limit = query.limit))]
  async fn top_holders(&self, query: &HolderQuery) -> Result<Vec<HolderRecord>, LookupError> {
    let scale = query
      .scale
      .ok_or_else(|| LookupError::Validation("explorer lookup requires token decimals".into()))?;

    let params = [
      ("module", "token".to_string()),
      ("action", "topholders".to_string()),
      ("contractaddress", query.token.to_string()),
      ("page", "1".to_string()),
      ("offset", query.limit.to_string()),
      ("chainid", self.chain_id.to_string()),
      ("apikey", self.api_key.clone()),
    ];

    let envelope: ExplorerEnvelope = self.client.get_json(&self.base_url, &params, None, CALL).await?;

    if envelope.status != "1" {
      return Err(LookupError::provider(
        provider::EXPLORER,
        CALL,
        format!("status {}: {}", envelope.status, envelope.error_detail()),
      ));
    }

    let raw: Vec<ExplorerHolder> = serde_json::from_value(envelope.result)
      .map_err(|e| LookupError::provider(provider::EXPLORER, CALL, format!("malformed result: {e}")))?;

    let mut holders = raw
      .into_iter()
      .map(|h| Self::holder(h, scale))
      .collect::<Result<Vec<_>, _>>()?;
    rank_holders(&mut holders);

    debug!(count = holders.len(), "Explorer holders fetched");
    Ok(holders)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::EvmAddress;
  use mockito::{Matcher, Server};

  fn index(base_url: String) -> ExplorerIndex {
    let config = ExplorerConfig {
      base_url,
      api_key: "test-key".into(),
      ..ExplorerConfig::default()
    };
    ExplorerIndex::new(&config).unwrap()
  }

  fn query(limit: u32) -> HolderQuery {
    HolderQuery {
      token: EvmAddress::parse("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").unwrap(),
      limit,
      scale: Some(6),
      with_activity: false,
    }
  }

  #[tokio::test]
  async fn test_scales_and_ranks_holders() {
    let mut server = Server::new_async().await;
    let mock = server
      .mock("GET", "/api")
      .match_query(Matcher::AllOf(vec![
        Matcher::UrlEncoded("module".into(), "token".into()),
        Matcher::UrlEncoded("action".into(), "topholders".into()),
        Matcher::UrlEncoded("offset".into(), "2".into()),
        Matcher::UrlEncoded("apikey".into(), "test-key".into()),
      ]))
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(
        r#"{"status":"1","message":"OK","result":[
          {"TokenHolderAddress":"0xaaa","TokenHolderQuantity":"250000"},
          {"TokenHolderAddress":"0xbbb","TokenHolderQuantity":"1500000"}
        ]}"#,
      )
      .create_async()
      .await;

    let holders = index(format!("{}/api", server.url())).top_holders(&query(2)).await.unwrap();

    mock.assert_async().await;
    assert_eq!(holders.len(), 2);
    assert_eq!(holders[0].address, "0xbbb");
    assert!((holders[0].balance - 1.5).abs() < f64::EPSILON);
    assert!((holders[1].balance - 0.25).abs() < f64::EPSILON);
  }

  async fn preformatted(body: &str, limit: u32) -> Result<Vec<HolderRecord>, LookupError> {
    let mut server = Server::new_async().await;
    server
      .mock("GET", "/api")
      .match_query(Matcher::Any)
      .with_status(200)
      .with_body(body)
      .create_async()
      .await;

    index(format!("{}/api", server.url())).top_holders(&query(limit)).await
  }

  #[tokio::test]
  async fn test_preformatted_quantity_read_at_token_scale() {
    let holders = preformatted(
      r#"{"status":"1","message":"OK","result":[{"HolderAddress":"0xaaa","Balance":"12.345"}]}"#,
      1,
    )
    .await
    .unwrap();

    assert!((holders[0].balance - 12.345).abs() < 1e-9);
  }

  #[tokio::test]
  async fn test_preformatted_quantity_beyond_decimals_rejected() {
    let err = preformatted(
      r#"{"status":"1","message":"OK","result":[{"HolderAddress":"0xbbb","Balance":"1.0000001"}]}"#,
      1,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, LookupError::Provider { provider: "explorer", .. }));
    assert!(err.to_string().contains("0xbbb"));
  }

  #[tokio::test]
  async fn test_status_zero_carries_upstream_message() {
    let mut server = Server::new_async().await;
    server
      .mock("GET", "/api")
      .match_query(Matcher::Any)
      .with_status(200)
      .with_body(r#"{"status":"0","message":"NOTOK","result":"Invalid API Key"}"#)
      .create_async()
      .await;

    let err = index(format!("{}/api", server.url())).top_holders(&query(5)).await.unwrap_err();

    assert!(matches!(err, LookupError::Provider { provider: "explorer", .. }));
    assert!(err.to_string().contains("Invalid API Key"));
  }

  #[tokio::test]
  async fn test_http_error_is_provider_error() {
    let mut server = Server::new_async().await;
    server
      .mock("GET", "/api")
      .match_query(Matcher::Any)
      .with_status(503)
      .with_body("upstream down")
      .create_async()
      .await;

    let err = index(format!("{}/api", server.url())).top_holders(&query(5)).await.unwrap_err();

    assert!(err.to_string().contains("HTTP 503"));
  }

  #[tokio::test]
  async fn test_requires_scale() {
    let index = index("http://127.0.0.1:9".into());
    let mut q = query(5);
    q.scale = None;

    assert!(matches!(index.top_holders(&q).await, Err(LookupError::Validation(_))));
  }
}
