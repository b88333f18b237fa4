//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies (JSON-RPC node, indexer REST APIs) and hosts the
//! inbound HTTP surface.
//!
//! Adapter categories:
//! - `chain`: ERC20 reads and Multicall3 batching via alloy-rs
//! - `indexers`: Block-explorer and graph top-holder backends
//! - `http`: axum routes, DTOs and error mapping
//! - `metrics`: Prometheus metrics export and health checks

pub mod chain;
pub mod http;
pub mod indexers;
pub mod metrics;
