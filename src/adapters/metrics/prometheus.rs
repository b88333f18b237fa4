//! Prometheus Metrics Registry - Lookup Observability
//!
//! Registers the `token_api_*` metrics: lookup counts and latency per
//! operation, upstream failures per provider, and multicall fallbacks.
//! Exposed as text on `/metrics` by the health server.

use std::time::Instant;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

use crate::domain::LookupError;

/// Centralized Prometheus metrics for the token API.
///
/// Each instance owns its own registry, so tests can build one freely.
pub struct MetricsRegistry {
    /// Prometheus registry.
    registry: Registry,
    /// Lookups by operation and outcome (`ok` or an error kind).
    pub lookups: IntCounterVec,
    /// Lookup latency histogram (milliseconds).
    pub lookup_latency_ms: HistogramVec,
    /// Upstream failures by provider and error kind.
    pub provider_errors: IntCounterVec,
    /// Batches that fell back from multicall to per-address calls.
    pub multicall_fallbacks: IntCounter,
    /// Chain probe status (1 = reachable).
    pub chain_up: IntGauge,
}

impl MetricsRegistry {
    /// Create and register all Prometheus metrics.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let lookups = IntCounterVec::new(
            Opts::new("token_api_lookups_total", "Total lookups served"),
            &["operation", "outcome"],
        )?;

        let lookup_latency_ms = HistogramVec::new(
            HistogramOpts::new(
                "token_api_lookup_latency_ms",
                "Lookup latency in milliseconds",
            )
            .buckets(vec![
                5.0, 25.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 10000.0,
            ]),
            &["operation"],
        )?;

        let provider_errors = IntCounterVec::new(
            Opts::new(
                "token_api_provider_errors_total",
                "Upstream provider failures",
            ),
            &["provider", "kind"],
        )?;

        let multicall_fallbacks = IntCounter::new(
            "token_api_multicall_fallbacks_total",
            "Batches retried per address after a multicall failure",
        )?;

        let chain_up = IntGauge::new(
            "token_api_chain_up",
            "Chain endpoint status (1=reachable, 0=unreachable)",
        )?;

        registry.register(Box::new(lookups.clone()))?;
        registry.register(Box::new(lookup_latency_ms.clone()))?;
        registry.register(Box::new(provider_errors.clone()))?;
        registry.register(Box::new(multicall_fallbacks.clone()))?;
        registry.register(Box::new(chain_up.clone()))?;

        Ok(Self {
            registry,
            lookups,
            lookup_latency_ms,
            provider_errors,
            multicall_fallbacks,
            chain_up,
        })
    }

    /// Record the outcome and latency of one lookup.
    pub fn observe<T>(&self, operation: &str, started: Instant, result: &Result<T, LookupError>) {
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        self.lookup_latency_ms
            .with_label_values(&[operation])
            .observe(elapsed_ms);

        match result {
            Ok(_) => self.lookups.with_label_values(&[operation, "ok"]).inc(),
            Err(err) => {
                self.lookups.with_label_values(&[operation, err.kind()]).inc();
                self.record_provider_error(err);
            }
        }
    }

    /// Count an upstream failure; client faults are ignored.
    pub fn record_provider_error(&self, err: &LookupError) {
        if let Some(provider) = err.source_provider() {
            self.provider_errors
                .with_label_values(&[provider, err.kind()])
                .inc();
        }
    }

    /// Encode all metrics in the Prometheus text format.
    pub fn render(&self) -> String {
        let mut buffer = Vec::new();
        if let Err(e) = TextEncoder::new().encode(&self.registry.gather(), &mut buffer) {
            tracing::warn!(error = %e, "Failed to encode metrics");
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}
