//! Token Holders API - Entry Point
//!
//! Initializes configuration, logging and the chain connection, then serves
//! the lookup API until SIGINT.
//!
//! Wiring sequence:
//! 1. Load config.toml (or $TOKEN_API_CONFIG) + validate
//! 2. Init tracing (JSON structured logging)
//! 3. Connect to the RPC node (fails fast if unreachable)
//! 4. Create ERC20 reader and indexer backends
//! 5. Create lookup use cases
//! 6. Spawn health/metrics server + chain probe
//! 7. Spawn API server
//! 8. Wait for SIGINT → readiness 503 → graceful shutdown

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info};

use token_holders_api::adapters::chain::{Erc20Reader, RpcProvider};
use token_holders_api::adapters::http::{self, AppState};
use token_holders_api::adapters::indexers::{ExplorerIndex, GraphIndex};
use token_holders_api::adapters::metrics::health::run_chain_probe;
use token_holders_api::adapters::metrics::{HealthServer, HealthState, MetricsRegistry};
use token_holders_api::config::{self, AppConfig};
use token_holders_api::domain::EvmAddress;
use token_holders_api::ports::chain_client::ChainClient;
use token_holders_api::ports::holder_index::HolderIndex;
use token_holders_api::usecases::{BalanceService, TokenInfoService, TopHoldersService};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration ───────────────────────────────
    let config = config::loader::load_config(&config::loader::config_path())
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured logging ────────────────────
    init_tracing(&config);

    info!(
        name = %config.server.name,
        version = env!("CARGO_PKG_VERSION"),
        token = %config.chain.token_address,
        multicall = config.chain.use_multicall,
        "Starting token holders API"
    );

    // ── 3. Connect to the RPC node ──────────────────────────
    let rpc = Arc::new(
        RpcProvider::connect(&config.chain)
            .await
            .context("Chain endpoint unreachable")?,
    );

    // ── 4. Adapters ─────────────────────────────────────────
    let token = EvmAddress::parse(&config.chain.token_address).context("Invalid chain.token_address")?;
    let multicall =
        EvmAddress::parse(&config.chain.multicall_address).context("Invalid chain.multicall_address")?;

    let chain: Arc<dyn ChainClient> = Arc::new(Erc20Reader::new(Arc::clone(&rpc), multicall));
    let explorer: Arc<dyn HolderIndex> =
        Arc::new(ExplorerIndex::new(&config.explorer).context("Failed to create explorer client")?);
    let graph: Arc<dyn HolderIndex> =
        Arc::new(GraphIndex::new(&config.graph).context("Failed to create graph client")?);

    let metrics = Arc::new(MetricsRegistry::new().context("Failed to register metrics")?);
    metrics.chain_up.set(1);

    // ── 5. Use cases ────────────────────────────────────────
    let state = AppState {
        balances: Arc::new(BalanceService::new(
            Arc::clone(&chain),
            token,
            &config.chain,
            Arc::clone(&metrics),
        )),
        token_info: Arc::new(TokenInfoService::new(Arc::clone(&chain), Arc::clone(&metrics))),
        top_holders: Arc::new(
            TopHoldersService::new(
                Arc::clone(&chain),
                explorer,
                graph,
                token,
                config.server.max_top_n,
                Arc::clone(&metrics),
            )
            .with_scale_override(config.explorer.scale_override),
        ),
    };

    let (shutdown_tx, _shutdown_rx) = broadcast::channel::<()>(1);
    let health = Arc::new(HealthState::new());

    // ── 6. Health/metrics server + chain probe ──────────────
    let health_handle = if config.metrics.enabled {
        let server = HealthServer::new(
            Arc::clone(&health),
            Arc::clone(&metrics),
            config.metrics.bind_address.clone(),
        );
        let health_shutdown = shutdown_tx.subscribe();
        Some(tokio::spawn(async move {
            if let Err(e) = server.run(health_shutdown).await {
                error!(error = %e, "Health server failed");
            }
        }))
    } else {
        None
    };

    let probe_handle = tokio::spawn(run_chain_probe(
        Arc::clone(&chain),
        Arc::clone(&health),
        Arc::clone(&metrics),
        Duration::from_secs(config.metrics.probe_interval_seconds.max(1)),
        shutdown_tx.subscribe(),
    ));

    // ── 7. API server ───────────────────────────────────────
    let api_shutdown = shutdown_tx.subscribe();
    let api_bind = config.server.bind_address.clone();
    let api_handle = tokio::spawn(async move {
        if let Err(e) = http::serve(http::router(state), api_bind, api_shutdown).await {
            error!(error = %e, "API server failed");
        }
    });

    info!("All tasks spawned - API is serving");

    // ── 8. Wait for SIGINT ──────────────────────────────────
    signal::ctrl_c().await.context("Failed to listen for SIGINT")?;
    info!("SIGINT received, initiating graceful shutdown");

    health.shutting_down.store(true, Ordering::Relaxed);
    let _ = shutdown_tx.send(());

    let _ = tokio::time::timeout(Duration::from_secs(10), api_handle).await;
    let _ = tokio::time::timeout(Duration::from_secs(2), probe_handle).await;
    if let Some(handle) = health_handle {
        let _ = tokio::time::timeout(Duration::from_secs(2), handle).await;
    }

    info!("Shutdown complete");
    Ok(())
}

/// Install the global subscriber: `RUST_LOG`, else `server.log_level`.
fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.server.log_level));

    if config.server.log_json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
