//! Configuration Module - TOML-based Service Configuration
//!
//! Loads and validates configuration from `config.toml`. API credentials
//! come from environment variables, never from the file. Everything here
//! is read once at startup and is immutable afterwards; request handlers
//! share it through `Arc` without locking.

pub mod loader;

use serde::Deserialize;

/// Canonical Multicall3 deployment (same address on every major EVM chain).
pub const MULTICALL3_ADDRESS: &str = "0xcA11bde05977b3631167028862bE2a173976CA11";

/// Top-level service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  /// HTTP API server settings.
  pub server: ServerConfig,
  /// Remote node and token contract.
  pub chain: ChainConfig,
  /// Block-explorer top-holder backend.
  #[serde(default)]
  pub explorer: ExplorerConfig,
  /// Graph-indexer top-holder backend.
  #[serde(default)]
  pub graph: GraphConfig,
  /// Metrics and health endpoints.
  #[serde(default)]
  pub metrics: MetricsConfig,
}

/// HTTP API server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  /// Human-readable service name.
  #[serde(default = "default_name")]
  pub name: String,
  /// API bind address.
  #[serde(default = "default_bind_address")]
  pub bind_address: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
  /// Emit JSON log lines.
  #[serde(default = "default_true")]
  pub log_json: bool,
  /// Largest accepted `top_n`.
  #[serde(default = "default_max_top_n")]
  pub max_top_n: u32,
}

/// Chain RPC configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
  /// JSON-RPC endpoint.
  pub rpc_url: String,
  /// Expected chain ID, checked at startup when set (137 = Polygon).
  pub expected_chain_id: Option<u64>,
  /// Default ERC20 token contract.
  pub token_address: String,
  /// Multicall3 contract used by the aggregated batch strategy.
  #[serde(default = "default_multicall_address")]
  pub multicall_address: String,
  /// Per-call timeout in milliseconds.
  #[serde(default = "default_timeout_ms")]
  pub timeout_ms: u64,
  /// Fan-out limit for concurrent per-address calls.
  #[serde(default = "default_max_concurrency")]
  pub max_concurrency: usize,
  /// Use the single-round-trip multi-call path for batch balances.
  #[serde(default = "default_true")]
  pub use_multicall: bool,
}

/// Block-explorer API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ExplorerConfig {
  /// REST endpoint (Etherscan-family API).
  #[serde(default = "default_explorer_url")]
  pub base_url: String,
  /// Chain ID sent as `chainid`.
  #[serde(default = "default_chain_id")]
  pub chain_id: u64,
  /// Request timeout in milliseconds.
  #[serde(default = "default_timeout_ms")]
  pub timeout_ms: u64,
  /// Pin the balance divisor instead of reading `decimals()` on-chain.
  pub scale_override: Option<u8>,
  /// API key, from `EXPLORER_API_KEY`.
  #[serde(skip)]
  pub api_key: String,
}

/// Graph token API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphConfig {
  /// Token API base URL.
  #[serde(default = "default_graph_url")]
  pub base_url: String,
  /// Network identifier, e.g. "matic" or "mainnet".
  #[serde(default = "default_network")]
  pub network: String,
  /// Request timeout in milliseconds.
  #[serde(default = "default_timeout_ms")]
  pub timeout_ms: u64,
  /// Bearer token, from `GRAPH_JWT`.
  #[serde(skip)]
  pub jwt: String,
}

/// Metrics and health configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
  /// Serve `/metrics`, `/live` and `/ready`.
  #[serde(default = "default_true")]
  pub enabled: bool,
  /// Bind address of the metrics/health server.
  #[serde(default = "default_metrics_addr")]
  pub bind_address: String,
  /// Chain liveness probe interval (seconds).
  #[serde(default = "default_probe_interval")]
  pub probe_interval_seconds: u64,
}

impl Default for ExplorerConfig {
  fn default() -> Self {
    Self {
      base_url: default_explorer_url(),
      chain_id: default_chain_id(),
      timeout_ms: default_timeout_ms(),
      scale_override: None,
      api_key: String::new(),
    }
  }
}

impl Default for GraphConfig {
  fn default() -> Self {
    Self {
      base_url: default_graph_url(),
      network: default_network(),
      timeout_ms: default_timeout_ms(),
      jwt: String::new(),
    }
  }
}

impl Default for MetricsConfig {
  fn default() -> Self {
    Self {
      enabled: true,
      bind_address: default_metrics_addr(),
      probe_interval_seconds: default_probe_interval(),
    }
  }
}

// Default value functions for serde

fn default_name() -> String {
  "token-holders-api".to_string()
}

fn default_bind_address() -> String {
  "0.0.0.0:8000".to_string()
}

fn default_log_level() -> String {
  "info".to_string()
}

const fn default_true() -> bool {
  true
}

const fn default_max_top_n() -> u32 {
  1000
}

fn default_multicall_address() -> String {
  MULTICALL3_ADDRESS.to_string()
}

const fn default_timeout_ms() -> u64 {
  10_000
}

const fn default_max_concurrency() -> usize {
  16
}

fn default_explorer_url() -> String {
  "https://api.polygonscan.com/api".to_string()
}

const fn default_chain_id() -> u64 {
  137
}

fn default_graph_url() -> String {
  "https://token-api.thegraph.com".to_string()
}

fn default_network() -> String {
  "matic".to_string()
}

fn default_metrics_addr() -> String {
  "0.0.0.0:9090".to_string()
}

const fn default_probe_interval() -> u64 {
  30
}
