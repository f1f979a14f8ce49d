//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use leads_core::store::LeadStoreError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler. Every variant renders as
/// `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  BadRequest(String),

  #[error("{0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Translate a backend error, using `not_found` as the message when the
  /// store reports an unknown id.
  pub fn from_store<E: LeadStoreError>(e: E, not_found: &str) -> Self {
    match e.as_domain() {
      Some(leads_core::Error::Validation(m)) => Self::BadRequest(m.clone()),
      Some(leads_core::Error::DuplicateEmail(_)) => {
        Self::Conflict("Email already exists".into())
      }
      Some(leads_core::Error::NotFound(_)) => Self::NotFound(not_found.into()),
      None => Self::Store(Box::new(e)),
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    Self::BadRequest(rejection.body_text())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
