//! Chain Client Port - Read-only ERC20 Contract Calls
//!
//! Defines the capability the lookups need from a remote node: evaluate
//! read-only ERC20 functions against a token contract, plus a batched
//! `balanceOf` for many owners in one round trip. The concrete adapter is
//! built once at startup (after a liveness check) and injected.

use alloy::primitives::U256;
use async_trait::async_trait;

use crate::domain::{EvmAddress, LookupError};

/// Trait for read-only contract calls via alloy-rs.
///
/// Every method is bounded by the adapter's timeout and maps failures to
/// [`LookupError::Provider`] / [`LookupError::Timeout`] naming the call.
#[async_trait]
pub trait ChainClient: Send + Sync + 'static {
  /// `balanceOf(owner)` on `token`, in raw units.
  async fn balance_of(&self, token: EvmAddress, owner: EvmAddress) -> Result<U256, LookupError>;

  /// `decimals()` on `token`.
  async fn decimals(&self, token: EvmAddress) -> Result<u8, LookupError>;

  /// `symbol()` on `token`.
  async fn symbol(&self, token: EvmAddress) -> Result<String, LookupError>;

  /// `name()` on `token`.
  async fn name(&self, token: EvmAddress) -> Result<String, LookupError>;

  /// `totalSupply()` on `token`, in raw units.
  async fn total_supply(&self, token: EvmAddress) -> Result<U256, LookupError>;

  /// `balanceOf` for every owner bundled into a single multi-call.
  ///
  /// The outer `Err` means the bundle itself failed (transport, decode);
  /// an inner `None` means that one sub-call reverted. The returned vector
  /// has the same length and order as `owners`.
  async fn batch_balance_of(
    &self,
    token: EvmAddress,
    owners: &[EvmAddress],
  ) -> Result<Vec<Option<U256>>, LookupError>;

  /// Check if the node answers a lightweight call.
  async fn is_healthy(&self) -> bool;
}
