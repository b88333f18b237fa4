//! Token lookup records.
//!
//! Request-scoped results of the balance, metadata and holder lookups.
//! Built from a live upstream response, handed to the transport layer,
//! then dropped.

use chrono::{DateTime, Utc};

use super::address::EvmAddress;
use super::amount::TokenAmount;

/// One address's balance of the configured token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceRecord {
    /// Holder address (checksummed).
    pub address: EvmAddress,
    /// Scaled balance.
    pub balance: TokenAmount,
    /// Token symbol, e.g. "USDC".
    pub symbol: String,
}

/// Descriptive facts about an ERC20 contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMetadata {
    /// Contract address (checksummed).
    pub address: EvmAddress,
    /// Token name.
    pub name: String,
    /// Token symbol.
    pub symbol: String,
    /// Decimal places.
    pub decimals: u8,
    /// Total supply scaled by `decimals`.
    pub total_supply: TokenAmount,
}

/// One entry of a top-holder ranking.
///
/// Which optional fields are set depends on the backend that served it.
#[derive(Debug, Clone, PartialEq)]
pub struct HolderRecord {
    /// Holder address as reported upstream.
    pub address: String,
    /// Human-readable balance.
    pub balance: f64,
    /// Token symbol, when the backend reports it.
    pub symbol: Option<String>,
    /// Last balance change, when requested and reported.
    pub last_activity: Option<DateTime<Utc>>,
}

/// Sort holders by balance, largest first. Stable for equal balances.
pub fn rank_holders(holders: &mut [HolderRecord]) {
    holders.sort_by(|a, b| b.balance.total_cmp(&a.balance));
}
