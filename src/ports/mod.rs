//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the use cases require from the
//! outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `ChainClient`: Read-only ERC20 calls against a remote node
//! - `HolderIndex`: Top-holder rankings from indexing services

pub mod chain_client;
pub mod holder_index;
