//! Use Cases Layer - Lookup Orchestration
//!
//! Combines domain types with the `ChainClient` and `HolderIndex` ports to
//! serve each lookup the API exposes.
//!
//! Use cases:
//! - `BalanceService`: single and batch balances of the configured token
//! - `TokenInfoService`: ERC20 metadata of any contract
//! - `TopHoldersService`: ranked holders from the explorer or graph backend

pub mod balances;
pub mod token_info;
pub mod top_holders;

pub use balances::{BalanceService, BatchStrategy};
pub use token_info::TokenInfoService;
pub use top_holders::{HolderSource, TopHoldersService};
