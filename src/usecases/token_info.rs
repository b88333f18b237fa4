//! Token Metadata Lookup
//!
//! `name`, `symbol`, `decimals` and `totalSupply` of any ERC20 contract,
//! read in parallel. All four succeed or the lookup fails.

use std::sync::Arc;
use std::time::Instant;

use tracing::instrument;

use crate::adapters::metrics::MetricsRegistry;
use crate::domain::{EvmAddress, LookupError, TokenAmount, TokenMetadata};
use crate::ports::chain_client::ChainClient;

/// Metadata lookups for arbitrary token contracts.
pub struct TokenInfoService {
  chain: Arc<dyn ChainClient>,
  metrics: Arc<MetricsRegistry>,
}

impl TokenInfoService {
  /// Create a metadata service.
  pub fn new(chain: Arc<dyn ChainClient>, metrics: Arc<MetricsRegistry>) -> Self {
    Self { chain, metrics }
  }

  /// Metadata of the contract at `address`.
  #[instrument(skip(self))]
  pub async fn token_info(&self, address: &str) -> Result<TokenMetadata, LookupError> {
    let started = Instant::now();
    let result = self.lookup(address).await;
    self.metrics.observe("token_info", started, &result);
    result
  }

  async fn lookup(&self, address: &str) -> Result<TokenMetadata, LookupError> {
    let token = EvmAddress::parse(address)?;

    let (name, symbol, decimals, supply) = tokio::try_join!(
      self.chain.name(token),
      self.chain.symbol(token),
      self.chain.decimals(token),
      self.chain.total_supply(token),
    )?;

    Ok(TokenMetadata {
      address: token,
      name,
      symbol,
      decimals,
      total_supply: TokenAmount::new(supply, decimals)?,
    })
  }
}
