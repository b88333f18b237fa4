//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, injecting credentials from the
//! environment, validating all parameters, and providing clear error
//! messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;
use crate::domain::{EvmAddress, MAX_SCALE};

/// Env var overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "TOKEN_API_CONFIG";
/// Env var holding the block-explorer API key.
pub const EXPLORER_API_KEY_ENV: &str = "EXPLORER_API_KEY";
/// Env var holding the graph API bearer token.
pub const GRAPH_JWT_ENV: &str = "GRAPH_JWT";

/// Config file path: `$TOKEN_API_CONFIG` or `config.toml`.
pub fn config_path() -> String {
  std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config.toml".to_string())
}

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let mut config = parse_config(&content)?;

  config.explorer.api_key = std::env::var(EXPLORER_API_KEY_ENV).unwrap_or_default();
  config.graph.jwt = std::env::var(GRAPH_JWT_ENV).unwrap_or_default();

  info!(
    token = %config.chain.token_address,
    multicall = config.chain.use_multicall,
    explorer_key = !config.explorer.api_key.is_empty(),
    graph_jwt = !config.graph.jwt.is_empty(),
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Parse and validate TOML content.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  let config: AppConfig = toml::from_str(content)
    .with_context(|| "Failed to parse config.toml")?;

  validate_config(&config)?;
  Ok(config)
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - Parseable URLs and addresses
/// - Positive timeouts and fan-out limits
/// - Sensible page-size and scale bounds
fn validate_config(config: &AppConfig) -> Result<()> {
  // Chain validation
  reqwest::Url::parse(&config.chain.rpc_url)
    .with_context(|| format!("Invalid chain.rpc_url: {}", config.chain.rpc_url))?;

  EvmAddress::parse(&config.chain.token_address)
    .context("Invalid chain.token_address")?;
  EvmAddress::parse(&config.chain.multicall_address)
    .context("Invalid chain.multicall_address")?;

  anyhow::ensure!(
    config.chain.timeout_ms > 0,
    "chain.timeout_ms must be positive"
  );
  anyhow::ensure!(
    (1..=256).contains(&config.chain.max_concurrency),
    "chain.max_concurrency must be in [1, 256], got {}",
    config.chain.max_concurrency
  );

  // Server validation
  anyhow::ensure!(
    config.server.max_top_n > 0,
    "server.max_top_n must be positive"
  );

  // Indexer validation
  reqwest::Url::parse(&config.explorer.base_url)
    .with_context(|| format!("Invalid explorer.base_url: {}", config.explorer.base_url))?;
  reqwest::Url::parse(&config.graph.base_url)
    .with_context(|| format!("Invalid graph.base_url: {}", config.graph.base_url))?;

  anyhow::ensure!(
    config.explorer.timeout_ms > 0 && config.graph.timeout_ms > 0,
    "Indexer timeouts must be positive"
  );
  if let Some(scale) = config.explorer.scale_override {
    anyhow::ensure!(
      scale <= MAX_SCALE,
      "explorer.scale_override must be <= {MAX_SCALE}, got {scale}"
    );
  }
  anyhow::ensure!(
    !config.graph.network.is_empty(),
    "graph.network must not be empty"
  );

  Ok(())
}
