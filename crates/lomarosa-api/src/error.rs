//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error renders as `{"success": false, "message": …}` so the
//! frontend has a single failure shape to handle.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  BadRequest(String),

  #[error("{0}")]
  Config(String),

  #[error("error al procesar archivos: {0}")]
  Ingest(#[from] lomarosa_ingest::IngestError),

  #[error("{0}")]
  Internal(String),
}

impl From<lomarosa_core::Error> for ApiError {
  fn from(err: lomarosa_core::Error) -> Self {
    match err {
      // Role-detection failures are the user's upload, not our bug.
      lomarosa_core::Error::AmbiguousSources { .. }
      | lomarosa_core::Error::MissingColumns { .. } => {
        ApiError::BadRequest(err.to_string())
      }
      other => ApiError::Internal(other.to_string()),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::BadRequest(_) | ApiError::Ingest(_) => {
        StatusCode::BAD_REQUEST
      }
      ApiError::Config(_) | ApiError::Internal(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    };
    let body = json!({ "success": false, "message": self.to_string() });
    (status, Json(body)).into_response()
  }
}
