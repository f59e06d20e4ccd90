//! Error handling
//!
//! `StoreError` is what the data access layer returns. `AppError` wraps it
//! for the HTTP layer and renders the JSON error envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::geometry::InvalidGeometry;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failures of a store operation. A missing row is not one of them: lookups
/// return `Option` instead.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    InvalidGeometry(#[from] InvalidGeometry),

    #[error("constraint violation in {operation} ({entity}): {message}")]
    ConstraintViolation {
        operation: &'static str,
        entity: String,
        message: String,
    },

    #[error("store fault in {operation} ({entity}): {source}")]
    StoreFault {
        operation: &'static str,
        entity: String,
        #[source]
        source: BoxError,
    },

    #[error("{operation} was cancelled")]
    Cancelled { operation: &'static str },

    #[error("{operation} exceeded its deadline")]
    DeadlineExceeded { operation: &'static str },
}

impl StoreError {
    pub fn constraint(
        operation: &'static str,
        entity: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        StoreError::ConstraintViolation {
            operation,
            entity: entity.into(),
            message: message.into(),
        }
    }

    pub fn fault(
        operation: &'static str,
        entity: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        StoreError::StoreFault {
            operation,
            entity: entity.into(),
            source: source.into(),
        }
    }

    /// Name of the operation that failed, when the error carries one
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            StoreError::InvalidGeometry(_) => None,
            StoreError::ConstraintViolation { operation, .. }
            | StoreError::StoreFault { operation, .. }
            | StoreError::Cancelled { operation }
            | StoreError::DeadlineExceeded { operation } => Some(*operation),
        }
    }
}

/// Errors surfaced by the HTTP handlers
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// JSON error envelope
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl ErrorResponse {
    fn new(error: &str, message: String, code: &str) -> Self {
        Self {
            error: error.to_string(),
            message,
            details: None,
            code: Some(code.to_string()),
        }
    }

    fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Store(StoreError::InvalidGeometry(e)) => {
                warn!("⚠️ Rejected geometry: {}", e.reason);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new("Invalid Geometry", e.reason, "INVALID_GEOMETRY"),
                )
            }

            AppError::Store(StoreError::ConstraintViolation {
                operation,
                entity,
                message,
            }) => {
                warn!("⚠️ Constraint violation in {} ({}): {}", operation, entity, message);
                (
                    StatusCode::CONFLICT,
                    ErrorResponse::new("Conflict", message, "CONSTRAINT_VIOLATION")
                        .with_details(json!({ "entity": entity })),
                )
            }

            AppError::Store(StoreError::Cancelled { operation }) => {
                warn!("🛑 {} cancelled", operation);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorResponse::new(
                        "Service Unavailable",
                        "The request was cancelled".to_string(),
                        "CANCELLED",
                    ),
                )
            }

            AppError::Store(StoreError::DeadlineExceeded { operation }) => {
                warn!("⏱️ {} exceeded its deadline", operation);
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    ErrorResponse::new(
                        "Timeout",
                        "The store did not answer in time".to_string(),
                        "DEADLINE_EXCEEDED",
                    ),
                )
            }

            AppError::Store(StoreError::StoreFault {
                operation,
                entity,
                source,
            }) => {
                error!("❌ Store fault in {} ({}): {}", operation, entity, source);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        "Database Error",
                        "An error occurred while accessing the database".to_string(),
                        "DB_ERROR",
                    )
                    .with_details(json!({ "operation": operation, "entity": entity })),
                )
            }

            AppError::Validation(e) => {
                warn!("⚠️ Validation error: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new(
                        "Validation Error",
                        "The provided data is invalid".to_string(),
                        "VALIDATION_ERROR",
                    )
                    .with_details(json!(e)),
                )
            }

            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new("Not Found", msg, "NOT_FOUND"),
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for HTTP handlers
pub type AppResult<T> = Result<T, AppError>;

/// Not-found response for a lookup by id
pub fn not_found_error(resource: &str, id: i64) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}
