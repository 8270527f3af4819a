//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Bodies are plain text; clients only ever see a status and a short message.

use axum::{
  extract::rejection::QueryRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<QueryRejection> for ApiError {
  fn from(rejection: QueryRejection) -> Self {
    ApiError::BadRequest(rejection.body_text())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::BadRequest(msg) => {
        tracing::debug!(%msg, "rejected request");
        (StatusCode::BAD_REQUEST, msg).into_response()
      }
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store query failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
      }
    }
  }
}
