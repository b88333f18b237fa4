//! Holder Index Port - Top-Holder Rankings from Indexing Services
//!
//! Block explorers and graph indexers both answer "who holds the most of
//! this token". Each backend implements this trait; the use case picks one
//! per call. There is no negotiated fallback between them.

use async_trait::async_trait;

use crate::domain::{EvmAddress, HolderRecord, LookupError};

/// Parameters of a single top-holder query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HolderQuery {
  /// Token contract.
  pub token: EvmAddress,
  /// Page size (number of holders requested).
  pub limit: u32,
  /// Token decimals, for backends that return raw integer balances.
  pub scale: Option<u8>,
  /// Whether to surface the holder's last activity timestamp.
  pub with_activity: bool,
}

/// Trait for external top-holder providers.
///
/// Implementors do not retry; a failed request surfaces as
/// [`LookupError::Provider`] or [`LookupError::Timeout`].
#[async_trait]
pub trait HolderIndex: Send + Sync + 'static {
  /// Provider label for logs and metrics (`explorer`, `graph`).
  fn name(&self) -> &'static str;

  /// Whether balances come back as raw integers needing `query.scale`.
  fn needs_scale(&self) -> bool;

  /// Fetch up to `query.limit` holders, largest first.
  async fn top_holders(&self, query: &HolderQuery) -> Result<Vec<HolderRecord>, LookupError>;
}
