//! Chain Adapters - EVM Node Interaction Layer
//!
//! Provides on-chain access via alloy-rs 0.9 for:
//! - RPC provider management with a startup liveness check
//! - ERC20 reads (`balanceOf`, `decimals`, `symbol`, `name`, `totalSupply`)
//! - Multicall3 batching of `balanceOf` for many owners

pub mod erc20;
pub mod multicall;
pub mod provider;

pub use erc20::Erc20Reader;
pub use provider::RpcProvider;
