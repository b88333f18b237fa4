//! RPC Provider - alloy-rs 0.9 Connection Management
//!
//! Manages the connection to the configured EVM node via alloy-rs.
//! Validates RPC connectivity at startup (and the chain ID when one is
//! configured) and exposes a shared provider instance for all read-only
//! contract calls. The service refuses to start without it.

use std::sync::Arc;
use std::time::Duration;

use alloy::providers::{Provider, ProviderBuilder};
use tracing::{info, instrument};

use crate::config::ChainConfig;
use crate::domain::LookupError;

/// Shared RPC provider backed by alloy-rs 0.9.
///
/// Uses `dyn Provider` for type erasure because alloy 0.9's builder returns
/// a deeply-nested generic filler type that would leak into every adapter.
pub struct RpcProvider {
    /// The alloy provider (type-erased, boxed transport).
    provider: Arc<dyn Provider + Send + Sync>,
    /// Bound applied to every call made through this provider.
    timeout: Duration,
}

impl RpcProvider {
    /// Connect to the RPC endpoint and run the liveness check.
    ///
    /// Fails with [`LookupError::Connection`] if the endpoint does not
    /// answer `eth_chainId` within the timeout, or reports a chain other
    /// than `expected_chain_id`.
    #[instrument(skip_all)]
    pub async fn connect(config: &ChainConfig) -> Result<Self, LookupError> {
        let timeout = Duration::from_millis(config.timeout_ms);

        let provider = tokio::time::timeout(
            timeout,
            ProviderBuilder::new().on_builtin(&config.rpc_url),
        )
        .await
        .map_err(|_| LookupError::Connection(format!("connect timed out after {}ms", config.timeout_ms)))?
        .map_err(|e| LookupError::Connection(e.to_string()))?;

        let provider: Arc<dyn Provider + Send + Sync> = Arc::new(provider);

        let chain_id = tokio::time::timeout(timeout, provider.get_chain_id())
            .await
            .map_err(|_| LookupError::Connection("eth_chainId timed out".to_string()))?
            .map_err(|e| LookupError::Connection(format!("eth_chainId failed: {e}")))?;

        if let Some(expected) = config.expected_chain_id {
            if chain_id != expected {
                return Err(LookupError::Connection(format!(
                    "expected chain_id={expected}, node reports {chain_id}"
                )));
            }
        }

        info!(chain_id, "Connected to RPC node");

        Ok(Self { provider, timeout })
    }

    /// Get a shared reference to the alloy provider (type-erased).
    pub fn inner(&self) -> Arc<dyn Provider + Send + Sync> {
        Arc::clone(&self.provider)
    }

    /// Per-call timeout.
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Check if the RPC connection is healthy via a lightweight call.
    pub async fn is_healthy(&self) -> bool {
        matches!(
            tokio::time::timeout(self.timeout, self.provider.get_block_number()).await,
            Ok(Ok(_))
        )
    }
}
