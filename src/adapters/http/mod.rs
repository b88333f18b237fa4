//! HTTP API Adapter - axum 0.7
//!
//! Routes:
//! - `GET  /balance/:address`
//! - `POST /balances`
//! - `GET  /top/:top_n`, `/top_with_tx/:top_n`, `/top_explorer/:top_n`
//! - `GET  /top_holders/:token/:top_n`
//! - `GET  /getinfo/token/:address`

pub mod dto;
pub mod error;
pub mod handlers;

use axum::Router;
use axum::routing::{get, post};
use tokio::sync::broadcast;
use tracing::{info, instrument};

pub use error::ApiError;
pub use handlers::AppState;

/// Build the API router.
pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/balance/:address", get(handlers::balance))
    .route("/balances", post(handlers::balances))
    .route("/top/:top_n", get(handlers::top))
    .route("/top_with_tx/:top_n", get(handlers::top_with_tx))
    .route("/top_explorer/:top_n", get(handlers::top_explorer))
    .route("/top_holders/:token/:top_n", get(handlers::top_for_token))
    .route("/getinfo/token/:address", get(handlers::token_info))
    .with_state(state)
}

/// Serve the API until shutdown is signalled.
#[instrument(skip(app, shutdown_rx))]
pub async fn serve(
  app: Router,
  bind_address: String,
  mut shutdown_rx: broadcast::Receiver<()>,
) -> anyhow::Result<()> {
  let listener = tokio::net::TcpListener::bind(&bind_address).await?;
  info!(address = %bind_address, "API server started");

  axum::serve(listener, app)
    .with_graceful_shutdown(async move {
      let _ = shutdown_rx.recv().await;
    })
    .await?;

  Ok(())
}
