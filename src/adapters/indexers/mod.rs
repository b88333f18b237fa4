//! Indexer Adapters - Top-Holder Backends
//!
//! HTTP implementations of the `HolderIndex` port:
//! - `ExplorerIndex`: Etherscan-family `topholders`, raw integer balances
//! - `GraphIndex`: graph token API holders, pre-scaled balances

pub mod client;
pub mod explorer;
pub mod graph;
pub mod types;

pub use explorer::ExplorerIndex;
pub use graph::GraphIndex;
