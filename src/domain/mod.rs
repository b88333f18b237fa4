//! Domain layer - Token amounts, addresses and lookup records.
//!
//! Pure types shared by the use cases and adapters. Nothing here performs
//! I/O; everything is constructible and testable in isolation.

pub mod address;
pub mod amount;
pub mod error;
pub mod token;

// Re-export core types for convenience
pub use address::EvmAddress;
pub use amount::{MAX_SCALE, TokenAmount};
pub use error::LookupError;
pub use token::{BalanceRecord, HolderRecord, TokenMetadata};
