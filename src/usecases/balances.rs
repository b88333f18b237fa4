//! Balance Lookups - Single and Batch
//!
//! Reads the configured token's balances through the `ChainClient` port:
//! - Single lookup: `balanceOf`, `decimals` and `symbol` in parallel
//! - Batch lookup: one `decimals` per batch, then per-address balances via
//!   Multicall3 or bounded concurrent `balanceOf` calls
//!
//! Batch items fail independently; a batch always answers with one slot per
//! requested address.

use std::sync::Arc;
use std::time::Instant;

use alloy::primitives::U256;
use futures_util::stream::{self, StreamExt};
use tracing::{debug, instrument, warn};

use crate::adapters::metrics::MetricsRegistry;
use crate::config::ChainConfig;
use crate::domain::{BalanceRecord, EvmAddress, LookupError, TokenAmount};
use crate::ports::chain_client::ChainClient;

/// Strategy used for the per-address part of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStrategy {
  /// One `balanceOf` per address, `max_concurrency` in flight.
  Naive,
  /// One Multicall3 `aggregate3`, falling back to `Naive` on failure.
  Multicall,
}

/// Balance lookups against the configured token.
pub struct BalanceService {
  /// Chain access port.
  chain: Arc<dyn ChainClient>,
  /// Token contract every lookup reads.
  token: EvmAddress,
  /// In-flight limit for naive batches.
  max_concurrency: usize,
  /// Batch strategy.
  strategy: BatchStrategy,
  /// Lookup metrics.
  metrics: Arc<MetricsRegistry>,
}

impl BalanceService {
  /// Create a balance service for `token`.
  pub fn new(
    chain: Arc<dyn ChainClient>,
    token: EvmAddress,
    config: &ChainConfig,
    metrics: Arc<MetricsRegistry>,
  ) -> Self {
    let strategy = if config.use_multicall {
      BatchStrategy::Multicall
    } else {
      BatchStrategy::Naive
    };

    Self {
      chain,
      token,
      max_concurrency: config.max_concurrency.max(1),
      strategy,
      metrics,
    }
  }

  /// Override the batch strategy.
  #[must_use]
  pub const fn with_strategy(mut self, strategy: BatchStrategy) -> Self {
    self.strategy = strategy;
    self
  }

  /// Balance of one address.
  ///
  /// Fails with `InvalidAddress` before any chain call, or with the first
  /// failing call among `balanceOf`, `decimals` and `symbol`.
  #[instrument(skip(self))]
  pub async fn balance(&self, address: &str) -> Result<BalanceRecord, LookupError> {
    let started = Instant::now();
    let result = self.lookup_balance(address).await;
    self.metrics.observe("balance", started, &result);
    result
  }

  async fn lookup_balance(&self, address: &str) -> Result<BalanceRecord, LookupError> {
    let owner = EvmAddress::parse(address)?;

    let (raw, decimals, symbol) = tokio::try_join!(
      self.chain.balance_of(self.token, owner),
      self.chain.decimals(self.token),
      self.chain.symbol(self.token),
    )?;

    Ok(BalanceRecord {
      address: owner,
      balance: TokenAmount::new(raw, decimals)?,
      symbol,
    })
  }

  /// Balances of many addresses, positionally aligned with the input.
  ///
  /// Malformed addresses and failed lookups yield `None` in their slot.
  #[instrument(skip(self, addresses), fields(batch_size = addresses.len(), strategy = ?self.strategy))]
  pub async fn balances(&self, addresses: &[String]) -> Vec<Option<TokenAmount>> {
    if addresses.is_empty() {
      return Vec::new();
    }
    let started = Instant::now();

    let owners: Vec<Option<EvmAddress>> = addresses
      .iter()
      .map(|raw| {
        EvmAddress::parse(raw)
          .inspect_err(|e| debug!(error = %e, "Skipping malformed address"))
          .ok()
      })
      .collect();

    let scale = match self.batch_scale().await {
      Ok(scale) => scale,
      Err(e) => {
        warn!(error = %e, "Batch decimals lookup failed, every item absent");
        self.metrics.observe("balances", started, &Err::<(), _>(e));
        return vec![None; owners.len()];
      }
    };

    let raw = match self.strategy {
      BatchStrategy::Naive => self.naive_balances(&owners).await,
      BatchStrategy::Multicall => self.multicall_balances(&owners).await,
    };

    let result: Vec<Option<TokenAmount>> = raw
      .into_iter()
      .map(|value| value.and_then(|v| TokenAmount::new(v, scale).ok()))
      .collect();

    let absent = result.iter().filter(|v| v.is_none()).count();
    debug!(absent, "Batch complete");
    self.metrics.observe("balances", started, &Ok::<(), LookupError>(()));
    result
  }

  /// Token decimals, fetched once per batch and range-checked.
  async fn batch_scale(&self) -> Result<u8, LookupError> {
    let decimals = self.chain.decimals(self.token).await?;
    Ok(TokenAmount::new(U256::ZERO, decimals)?.scale())
  }

  /// Concurrent per-address `balanceOf`, order preserved.
  async fn naive_balances(&self, owners: &[Option<EvmAddress>]) -> Vec<Option<U256>> {
    stream::iter(owners.iter().copied())
      .map(|owner| async move {
        let owner = owner?;
        match self.chain.balance_of(self.token, owner).await {
          Ok(value) => Some(value),
          Err(e) => {
            warn!(owner = %owner, error = %e, "balanceOf failed");
            self.metrics.record_provider_error(&e);
            None
          }
        }
      })
      .buffered(self.max_concurrency)
      .collect()
      .await
  }

  /// One multicall for every valid address; naive on outright failure.
  async fn multicall_balances(&self, owners: &[Option<EvmAddress>]) -> Vec<Option<U256>> {
    let valid: Vec<EvmAddress> = owners.iter().flatten().copied().collect();
    if valid.is_empty() {
      return vec![None; owners.len()];
    }

    let values = match self.chain.batch_balance_of(self.token, &valid).await {
      Ok(values) if values.len() == valid.len() => values,
      Ok(values) => {
        warn!(expected = valid.len(), got = values.len(), "Multicall result count mismatch, falling back");
        self.metrics.multicall_fallbacks.inc();
        return self.naive_balances(owners).await;
      }
      Err(e) => {
        warn!(error = %e, "Multicall failed, falling back to per-address calls");
        self.metrics.record_provider_error(&e);
        self.metrics.multicall_fallbacks.inc();
        return self.naive_balances(owners).await;
      }
    };

    let mut values = values.into_iter();
    owners
      .iter()
      .map(|owner| if owner.is_some() { values.next().flatten() } else { None })
      .collect()
  }
}
