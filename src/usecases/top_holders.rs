//! Top-Holder Lookup
//!
//! Validates `top_n`, resolves the token and, for explorer lookups, its
//! decimals, then asks the chosen `HolderIndex` backend for a ranking.

use std::sync::Arc;
use std::time::Instant;

use alloy::primitives::U256;
use tracing::{debug, instrument, warn};

use crate::adapters::metrics::MetricsRegistry;
use crate::domain::{EvmAddress, HolderRecord, LookupError, TokenAmount};
use crate::ports::chain_client::ChainClient;
use crate::ports::holder_index::{HolderIndex, HolderQuery};

/// Which indexing backend serves a ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HolderSource {
  /// Block explorer, raw balances scaled by token decimals.
  Explorer,
  /// Graph token API.
  Graph,
  /// Graph token API with `last_activity` surfaced.
  GraphWithActivity,
}

impl HolderSource {
  const fn operation(self) -> &'static str {
    match self {
      Self::Explorer => "top_explorer",
      Self::Graph => "top",
      Self::GraphWithActivity => "top_with_tx",
    }
  }
}

/// Check a transport-supplied `top_n` against `max`.
pub fn validate_top_n(top_n: i64, max: u32) -> Result<u32, LookupError> {
  if top_n < 0 {
    return Err(LookupError::Validation(format!("top_n must be non-negative, got {top_n}")));
  }
  match u32::try_from(top_n) {
    Ok(n) if n <= max => Ok(n),
    _ => Err(LookupError::Validation(format!("top_n must be at most {max}, got {top_n}"))),
  }
}

/// Top-holder rankings from the explorer and graph backends.
pub struct TopHoldersService {
  chain: Arc<dyn ChainClient>,
  explorer: Arc<dyn HolderIndex>,
  graph: Arc<dyn HolderIndex>,
  default_token: EvmAddress,
  max_top_n: u32,
  /// Pins the explorer divisor instead of reading `decimals()`.
  scale_override: Option<u8>,
  metrics: Arc<MetricsRegistry>,
}

impl TopHoldersService {
  /// Create the service. `default_token` is used when no token is given.
  pub fn new(
    chain: Arc<dyn ChainClient>,
    explorer: Arc<dyn HolderIndex>,
    graph: Arc<dyn HolderIndex>,
    default_token: EvmAddress,
    max_top_n: u32,
    metrics: Arc<MetricsRegistry>,
  ) -> Self {
    Self {
      chain,
      explorer,
      graph,
      default_token,
      max_top_n,
      scale_override: None,
      metrics,
    }
  }

  /// Pin the explorer balance divisor.
  #[must_use]
  pub const fn with_scale_override(mut self, scale: Option<u8>) -> Self {
    self.scale_override = scale;
    self
  }

  /// Up to `top_n` largest holders of `token` (default token if `None`).
  #[instrument(skip(self))]
  pub async fn top_holders(
    &self,
    source: HolderSource,
    token: Option<&str>,
    top_n: i64,
  ) -> Result<Vec<HolderRecord>, LookupError> {
    let started = Instant::now();
    let result = self.lookup(source, token, top_n).await;
    self.metrics.observe(source.operation(), started, &result);
    result
  }

  async fn lookup(
    &self,
    source: HolderSource,
    token: Option<&str>,
    top_n: i64,
  ) -> Result<Vec<HolderRecord>, LookupError> {
    let limit = validate_top_n(top_n, self.max_top_n)?;
    let token = match token {
      Some(raw) => EvmAddress::parse(raw)?,
      None => self.default_token,
    };

    if limit == 0 {
      debug!("top_n is zero, nothing to fetch");
      return Ok(Vec::new());
    }

    let index = match source {
      HolderSource::Explorer => &self.explorer,
      HolderSource::Graph | HolderSource::GraphWithActivity => &self.graph,
    };

    let scale = if index.needs_scale() {
      Some(self.scale_for(token).await?)
    } else {
      None
    };

    let query = HolderQuery {
      token,
      limit,
      scale,
      with_activity: source == HolderSource::GraphWithActivity,
    };

    let mut holders = index.top_holders(&query).await.inspect_err(|e| {
      warn!(backend = index.name(), token = %token, error = %e, "Holder index lookup failed");
    })?;
    holders.truncate(limit as usize);
    debug!(backend = index.name(), count = holders.len(), "Ranking served");
    Ok(holders)
  }

  async fn scale_for(&self, token: EvmAddress) -> Result<u8, LookupError> {
    let decimals = match self.scale_override {
      Some(scale) => scale,
      None => self.chain.decimals(token).await?,
    };
    Ok(TokenAmount::new(U256::ZERO, decimals)?.scale())
  }
}
