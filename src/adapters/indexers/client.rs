//! Indexer HTTP Client - Bounded JSON GETs
//!
//! Wraps reqwest with a per-request timeout, a concurrency limit and
//! error mapping into `LookupError` for the explorer and graph backends.
//! Never retries: a failed request surfaces immediately to the caller.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::domain::LookupError;

/// Longest upstream body excerpt carried in an error message.
const MAX_ERROR_BODY: usize = 200;

/// Configuration for an indexer HTTP client.
#[derive(Debug, Clone)]
pub struct IndexerClientConfig {
  /// Request timeout (connect + body).
  pub timeout: Duration,
  /// Maximum concurrent requests.
  pub max_concurrent: usize,
}

impl Default for IndexerClientConfig {
  fn default() -> Self {
    Self {
      timeout: Duration::from_secs(10),
      max_concurrent: 10,
    }
  }
}

/// JSON-over-HTTP client for one indexing provider.
pub struct IndexerClient {
  /// Underlying HTTP client.
  http: Client,
  /// Provider label used in errors.
  provider: &'static str,
  /// Client configuration.
  config: IndexerClientConfig,
  /// Concurrency limiter.
  semaphore: Arc<Semaphore>,
}

impl IndexerClient {
  /// Create a new client for `provider`.
  pub fn new(provider: &'static str, config: IndexerClientConfig) -> Result<Self> {
    let http = Client::builder()
      .timeout(config.timeout)
      .pool_max_idle_per_host(5)
      .build()
      .context("Failed to build HTTP client")?;

    let semaphore = Arc::new(Semaphore::new(config.max_concurrent));

    Ok(Self {
      http,
      provider,
      config,
      semaphore,
    })
  }

  fn timeout_ms(&self) -> u64 {
    u64::try_from(self.config.timeout.as_millis()).unwrap_or(u64::MAX)
  }

  /// Map a reqwest failure, stripping the URL (it may carry an API key).
  fn map_error(&self, err: reqwest::Error, call: &str) -> LookupError {
    if err.is_timeout() {
      LookupError::timeout(self.provider, call, self.timeout_ms())
    } else {
      LookupError::provider(self.provider, call, err.without_url())
    }
  }

  /// GET `url?query` and decode a JSON body.
  ///
  /// Non-2xx statuses, transport errors and undecodable bodies all map to
  /// `LookupError::Provider` naming `call`; timeouts map to
  /// `LookupError::Timeout`.
  pub async fn get_json<T: DeserializeOwned>(
    &self,
    url: &str,
    query: &[(&str, String)],
    bearer: Option<&str>,
    call: &str,
  ) -> Result<T, LookupError> {
    let _permit = self
      .semaphore
      .acquire()
      .await
      .map_err(|e| LookupError::provider(self.provider, call, e))?;

    let mut request = self.http.get(url).query(query);
    if let Some(token) = bearer {
      request = request.bearer_auth(token);
    }

    let response = request.send().await.map_err(|e| {
      let err = self.map_error(e, call);
      warn!(provider = self.provider, call, error = %err, "Request failed");
      err
    })?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      let excerpt: String = body.chars().take(MAX_ERROR_BODY).collect();
      return Err(LookupError::provider(
        self.provider,
        call,
        format!("HTTP {status}: {excerpt}"),
      ));
    }

    let body = response
      .json::<T>()
      .await
      .map_err(|e| self.map_error(e, call))?;

    debug!(provider = self.provider, call, status = %status, "Indexer response decoded");
    Ok(body)
  }
}
