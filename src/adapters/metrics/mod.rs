//! Metrics and Monitoring Adapters
//!
//! Prometheus metrics export plus liveness and readiness endpoints
//! (/live, /ready, /metrics) via axum 0.7 on `metrics.bind_address`.

pub mod health;
pub mod prometheus;

pub use health::{HealthServer, HealthState};
pub use prometheus::MetricsRegistry;
