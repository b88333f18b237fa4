//! Lookup error taxonomy.
//!
//! Every lookup returns a tagged [`LookupError`] so callers branch on the
//! kind (bad input vs. upstream outage) instead of matching on messages.

use thiserror::Error;

/// Upstream provider identifiers used in error and metric labels.
pub mod provider {
    /// Remote JSON-RPC node.
    pub const RPC: &str = "rpc";
    /// Block-explorer REST API.
    pub const EXPLORER: &str = "explorer";
    /// Graph-indexing token API.
    pub const GRAPH: &str = "graph";
}

/// Failure of a balance, metadata or holder lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// Malformed address. Never reaches a provider.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Token decimals outside the supported range.
    #[error("token decimals {scale} outside supported range 0..={max}")]
    InvalidScale {
        /// Scale reported by the contract.
        scale: u8,
        /// Largest supported scale.
        max: u8,
    },

    /// Request parameter rejected before any provider call.
    #[error("invalid request: {0}")]
    Validation(String),

    /// Upstream answered but with an error or an unexpected shape.
    #[error("{provider} {call} failed: {message}")]
    Provider {
        /// Provider label (`rpc`, `explorer`, `graph`).
        provider: &'static str,
        /// Offending call, e.g. `balanceOf` or `topholders`.
        call: String,
        /// Upstream status or message.
        message: String,
    },

    /// Upstream did not answer within the configured bound.
    #[error("{provider} {call} timed out after {timeout_ms}ms")]
    Timeout {
        /// Provider label.
        provider: &'static str,
        /// Offending call.
        call: String,
        /// Configured timeout.
        timeout_ms: u64,
    },

    /// Chain endpoint unreachable.
    #[error("chain endpoint unreachable: {0}")]
    Connection(String),
}

impl LookupError {
    /// Build a [`LookupError::Provider`].
    pub fn provider(
        provider: &'static str,
        call: impl Into<String>,
        message: impl std::fmt::Display,
    ) -> Self {
        Self::Provider {
            provider,
            call: call.into(),
            message: message.to_string(),
        }
    }

    /// Build a [`LookupError::Timeout`].
    pub fn timeout(provider: &'static str, call: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            provider,
            call: call.into(),
            timeout_ms,
        }
    }

    /// Whether the caller sent bad input (as opposed to an upstream fault).
    pub const fn is_client_fault(&self) -> bool {
        matches!(self, Self::InvalidAddress(_) | Self::Validation(_))
    }

    /// Stable machine-readable kind, used for metrics and error bodies.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidAddress(_) => "INVALID_ADDRESS",
            Self::InvalidScale { .. } => "INVALID_SCALE",
            Self::Validation(_) => "VALIDATION",
            Self::Provider { .. } => "PROVIDER_ERROR",
            Self::Timeout { .. } => "PROVIDER_TIMEOUT",
            Self::Connection(_) => "CONNECTION_ERROR",
        }
    }

    /// Upstream provider at fault, if any.
    pub const fn source_provider(&self) -> Option<&'static str> {
        match self {
            Self::Provider { provider, .. } | Self::Timeout { provider, .. } => Some(*provider),
            Self::Connection(_) => Some(provider::RPC),
            _ => None,
        }
    }
}
