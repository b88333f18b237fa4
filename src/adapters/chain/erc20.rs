//! ERC20 Contract Reads - `ChainClient` over alloy-rs
//!
//! Implements the `ChainClient` port by ABI-encoding read-only ERC20 calls,
//! dispatching them as `eth_call` through the shared provider and decoding
//! the returns. Every call is bounded by the provider timeout and any
//! failure names the offending function.

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, Bytes, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use tracing::{debug, instrument};

use super::multicall;
use super::provider::RpcProvider;
use crate::domain::error::provider;
use crate::domain::{EvmAddress, LookupError};
use crate::ports::chain_client::ChainClient;

/// Minimal ERC20 ABI fragments for balance and metadata reads.
pub mod abi {
    alloy::sol! {
        function balanceOf(address owner) external view returns (uint256 balance);
        function decimals() external view returns (uint8 value);
        function symbol() external view returns (string value);
        function name() external view returns (string value);
        function totalSupply() external view returns (uint256 supply);
    }
}

/// Read-only ERC20 client bound to one node.
pub struct Erc20Reader {
    /// Shared RPC provider.
    rpc: Arc<RpcProvider>,
    /// Multicall3 deployment used by `batch_balance_of`.
    multicall: Address,
}

impl Erc20Reader {
    /// Create a reader using `multicall` for batched balance reads.
    pub fn new(rpc: Arc<RpcProvider>, multicall: EvmAddress) -> Self {
        Self {
            rpc,
            multicall: multicall.inner(),
        }
    }

    fn timeout(&self) -> Duration {
        self.rpc.timeout()
    }

    /// `eth_call` `call` against `to` and decode its return tuple.
    async fn eth_call<C: SolCall + Send + Sync>(
        &self,
        to: Address,
        call: &C,
        label: &'static str,
    ) -> Result<C::Return, LookupError> {
        let tx = TransactionRequest::default()
            .to(to)
            .input(Bytes::from(call.abi_encode()).into());

        let timeout = self.timeout();
        let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        let inner = self.rpc.inner();

        let output = tokio::time::timeout(timeout, inner.call(&tx))
            .await
            .map_err(|_| LookupError::timeout(provider::RPC, label, timeout_ms))?
            .map_err(|e| LookupError::provider(provider::RPC, label, e))?;

        debug!(call = label, to = %to, bytes = output.len(), "eth_call ok");

        C::abi_decode_returns(&output, true)
            .map_err(|e| LookupError::provider(provider::RPC, label, format!("undecodable return: {e}")))
    }
}

#[async_trait]
impl ChainClient for Erc20Reader {
    #[instrument(skip(self), fields(token = %token, owner = %owner))]
    async fn balance_of(&self, token: EvmAddress, owner: EvmAddress) -> Result<U256, LookupError> {
        let call = abi::balanceOfCall {
            owner: owner.inner(),
        };
        Ok(self.eth_call(token.inner(), &call, "balanceOf").await?.balance)
    }

    #[instrument(skip(self), fields(token = %token))]
    async fn decimals(&self, token: EvmAddress) -> Result<u8, LookupError> {
        Ok(self.eth_call(token.inner(), &abi::decimalsCall {}, "decimals").await?.value)
    }

    #[instrument(skip(self), fields(token = %token))]
    async fn symbol(&self, token: EvmAddress) -> Result<String, LookupError> {
        Ok(self.eth_call(token.inner(), &abi::symbolCall {}, "symbol").await?.value)
    }

    #[instrument(skip(self), fields(token = %token))]
    async fn name(&self, token: EvmAddress) -> Result<String, LookupError> {
        Ok(self.eth_call(token.inner(), &abi::nameCall {}, "name").await?.value)
    }

    #[instrument(skip(self), fields(token = %token))]
    async fn total_supply(&self, token: EvmAddress) -> Result<U256, LookupError> {
        Ok(self
            .eth_call(token.inner(), &abi::totalSupplyCall {}, "totalSupply")
            .await?
            .supply)
    }

    #[instrument(skip(self, owners), fields(token = %token, batch_size = owners.len()))]
    async fn batch_balance_of(
        &self,
        token: EvmAddress,
        owners: &[EvmAddress],
    ) -> Result<Vec<Option<U256>>, LookupError> {
        if owners.is_empty() {
            return Ok(Vec::new());
        }

        let call = multicall::encode_balance_calls(token.inner(), owners);
        let ret = self.eth_call(self.multicall, &call, "aggregate3").await?;

        multicall::decode_balances(ret.returnData, owners.len())
    }

    async fn is_healthy(&self) -> bool {
        self.rpc.is_healthy().await
    }
}
