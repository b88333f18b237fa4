//! HTTP error mapping.
//!
//! Every failure leaves the API as `{"error": message, "code": KIND}` with a
//! status derived from the `LookupError` variant.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::domain::LookupError;

/// Error returned by API handlers.
#[derive(Debug, Error)]
pub enum ApiError {
  /// Lookup failure.
  #[error(transparent)]
  Lookup(#[from] LookupError),

  /// Request body or path could not be decoded.
  #[error("{0}")]
  BadRequest(String),
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    Self::BadRequest(rejection.body_text())
  }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self {
    Self::BadRequest(rejection.body_text())
  }
}

#[derive(Serialize)]
struct ErrorBody {
  error: String,
  code: &'static str,
}

impl ApiError {
  /// Status and machine-readable code for this error.
  pub const fn status(&self) -> (StatusCode, &'static str) {
    match self {
      Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
      Self::Lookup(err) => {
        let status = match err {
          _ if err.is_client_fault() => StatusCode::BAD_REQUEST,
          LookupError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
          LookupError::Connection(_) => StatusCode::SERVICE_UNAVAILABLE,
          _ => StatusCode::BAD_GATEWAY,
        };
        (status, err.kind())
      }
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, code) = self.status();
    if status.is_server_error() {
      warn!(status = status.as_u16(), code, error = %self, "Lookup failed upstream");
    }

    let body = ErrorBody {
      error: self.to_string(),
      code,
    };
    (status, Json(body)).into_response()
  }
}
