// storefront/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::models::LineError;
use crate::store::StoreError;
use crate::workflow::WorkflowError;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication Required: {0}")]
  Unauthorized(String),

  #[error("Forbidden: {0}")]
  Forbidden(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Store Error: {0}")]
  Store(StoreError),

  #[error("Workflow Error: {source}")]
  Workflow {
    #[from]
    source: WorkflowError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl AppError {
  /// The message shown to clients. Server-side failures are reduced to a
  /// generic message; their detail only goes to the log.
  pub fn public_message(&self) -> String {
    match self {
      AppError::Validation(m)
      | AppError::Unauthorized(m)
      | AppError::Forbidden(m)
      | AppError::NotFound(m) => m.clone(),
      AppError::Config(_) | AppError::Store(_) | AppError::Workflow { .. } | AppError::Internal(_) => {
        "An internal error occurred".to_string()
      }
    }
  }
}

// Business-rule failures detected by a store are client errors, not 500s.
impl From<StoreError> for AppError {
  fn from(err: StoreError) -> Self {
    match err {
      StoreError::InsufficientStock { .. } | StoreError::DuplicateEmail(_) => AppError::Validation(err.to_string()),
      other => AppError::Store(other),
    }
  }
}

impl From<LineError> for AppError {
  fn from(err: LineError) -> Self {
    match err {
      LineError::ItemNotFound => AppError::NotFound(err.to_string()),
      LineError::InvalidQuantity | LineError::QuantityOverflow => AppError::Validation(err.to_string()),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
      AppError::Forbidden(_) => StatusCode::FORBIDDEN,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Config(_) | AppError::Store(_) | AppError::Workflow { .. } | AppError::Internal(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::warn!(application_error = %self, "Responding with error");
    }
    HttpResponse::build(status).json(json!({
      "success": false,
      "message": self.public_message(),
    }))
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::Size;

  #[test]
  fn status_codes_follow_the_error_taxonomy() {
    assert_eq!(AppError::Validation("x".into()).status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(AppError::Unauthorized("x".into()).status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(AppError::Forbidden("x".into()).status_code(), StatusCode::FORBIDDEN);
    assert_eq!(AppError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
    assert_eq!(AppError::Internal("x".into()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
  }

  #[test]
  fn stock_conflicts_become_validation_errors() {
    let err: AppError = StoreError::InsufficientStock {
      product_name: "Denim Jacket".to_string(),
      size: Size::L,
      available: 1,
      requested: 2,
    }
    .into();
    assert!(
      matches!(err, AppError::Validation(ref m) if m == "Insufficient stock for Denim Jacket (Size: L). Available: 1, Requested: 2")
    );
  }

  #[test]
  fn internal_detail_is_not_exposed() {
    let err: AppError = StoreError::Corrupt("row 42 is broken".into()).into();
    assert_eq!(err.public_message(), "An internal error occurred");
  }
}
