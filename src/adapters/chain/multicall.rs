//! Multicall3 batching for `balanceOf`.
//!
//! Bundles one `balanceOf` per owner into a single `aggregate3` call with
//! `allowFailure = true`, so a reverting sub-call only blanks its own slot.

use alloy::primitives::{Address, U256};
use alloy::sol_types::SolCall;

use super::erc20::abi::balanceOfCall;
use crate::domain::error::provider;
use crate::domain::{EvmAddress, LookupError};

pub mod abi {
    alloy::sol! {
        struct Call3 {
            address target;
            bool allowFailure;
            bytes callData;
        }

        struct Result3 {
            bool success;
            bytes returnData;
        }

        function aggregate3(Call3[] calldata calls) external payable returns (Result3[] memory returnData);
    }
}

/// Build the `aggregate3` call for `owners`' balances of `token`.
pub fn encode_balance_calls(token: Address, owners: &[EvmAddress]) -> abi::aggregate3Call {
    let calls = owners
        .iter()
        .map(|owner| abi::Call3 {
            target: token,
            allowFailure: true,
            callData: balanceOfCall {
                owner: owner.inner(),
            }
            .abi_encode()
            .into(),
        })
        .collect();

    abi::aggregate3Call { calls }
}

/// Decode per-owner balances from `aggregate3` results.
///
/// A failed or undecodable sub-call yields `None` for that slot; a result
/// count that does not match `expected` fails the whole bundle.
pub fn decode_balances(
    results: Vec<abi::Result3>,
    expected: usize,
) -> Result<Vec<Option<U256>>, LookupError> {
    if results.len() != expected {
        return Err(LookupError::provider(
            provider::RPC,
            "aggregate3",
            format!("returned {} results for {expected} calls", results.len()),
        ));
    }

    Ok(results
        .into_iter()
        .map(|r| {
            if !r.success {
                return None;
            }
            balanceOfCall::abi_decode_returns(&r.returnData, true)
                .ok()
                .map(|ret| ret.balance)
        })
        .collect())
}
