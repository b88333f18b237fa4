//! Health Check Server - Liveness, Readiness and Metrics
//!
//! Exposes /live, /ready and /metrics via axum 0.7 for container health
//! checks and scraping. Readiness follows a periodic chain liveness probe
//! and flips off on shutdown.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use tokio::sync::broadcast;
use tracing::{info, instrument, warn};

use super::prometheus::MetricsRegistry;
use crate::ports::chain_client::ChainClient;

/// Shared health state polled by readiness probes.
#[derive(Debug)]
pub struct HealthState {
    /// Whether the last chain probe succeeded.
    pub chain_healthy: AtomicBool,
    /// Set once shutdown starts.
    pub shutting_down: AtomicBool,
}

impl HealthState {
    /// Create a new health state. The chain passed its startup check.
    pub fn new() -> Self {
        Self {
            chain_healthy: AtomicBool::new(true),
            shutting_down: AtomicBool::new(false),
        }
    }

    /// Check if the service is ready to serve traffic.
    pub fn is_ready(&self) -> bool {
        self.chain_healthy.load(Ordering::Relaxed) && !self.shutting_down.load(Ordering::Relaxed)
    }
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
struct HealthContext {
    state: Arc<HealthState>,
    metrics: Arc<MetricsRegistry>,
}

/// Axum-based health and metrics HTTP server.
pub struct HealthServer {
    /// Health state shared with the probe task.
    state: Arc<HealthState>,
    /// Metrics rendered on /metrics.
    metrics: Arc<MetricsRegistry>,
    /// Bind address (`metrics.bind_address`).
    bind_address: String,
}

impl HealthServer {
    /// Create a new health server.
    pub fn new(state: Arc<HealthState>, metrics: Arc<MetricsRegistry>, bind_address: String) -> Self {
        Self {
            state,
            metrics,
            bind_address,
        }
    }

    /// Routes served by this server.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/live", get(Self::liveness))
            .route("/ready", get(Self::readiness))
            .route("/metrics", get(Self::metrics))
            .with_state(HealthContext {
                state: Arc::clone(&self.state),
                metrics: Arc::clone(&self.metrics),
            })
    }

    /// Serve until shutdown is signalled.
    #[instrument(skip(self, shutdown_rx), fields(address = %self.bind_address))]
    pub async fn run(self, mut shutdown_rx: broadcast::Receiver<()>) -> anyhow::Result<()> {
        let app = self.router();
        let listener = tokio::net::TcpListener::bind(&self.bind_address).await?;

        info!("Health server started");

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await?;

        Ok(())
    }

    /// Liveness probe: always returns 200 if the process is running.
    async fn liveness() -> impl IntoResponse {
        (StatusCode::OK, "OK")
    }

    /// Readiness probe: returns 200 only while the chain is reachable.
    async fn readiness(State(ctx): State<HealthContext>) -> impl IntoResponse {
        if ctx.state.is_ready() {
            (StatusCode::OK, "READY")
        } else {
            (StatusCode::SERVICE_UNAVAILABLE, "NOT READY")
        }
    }

    async fn metrics(State(ctx): State<HealthContext>) -> impl IntoResponse {
        ctx.metrics.render()
    }
}

/// Probe the chain every `interval` and publish the result.
pub async fn run_chain_probe(
    chain: Arc<dyn ChainClient>,
    state: Arc<HealthState>,
    metrics: Arc<MetricsRegistry>,
    interval: Duration,
    mut shutdown_rx: broadcast::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let healthy = chain.is_healthy().await;
                let was = state.chain_healthy.swap(healthy, Ordering::Relaxed);
                metrics.chain_up.set(i64::from(healthy));
                if was != healthy {
                    if healthy {
                        info!("Chain endpoint reachable again");
                    } else {
                        warn!("Chain endpoint unreachable");
                    }
                }
            }
            _ = shutdown_rx.recv() => break,
        }
    }
}
