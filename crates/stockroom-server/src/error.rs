use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

use stockroom_core::{AppError, ValidationErrors};

/// API error type that maps to HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// A single rejected field.
#[derive(Debug, Serialize, ToSchema)]
pub struct FieldError {
    /// Name of the offending field
    pub field: String,
    /// Human-readable constraint message
    pub message: String,
}

/// JSON error response body
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    /// Every field violation, for validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message, details) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Validation(errors) => {
                let details = errors
                    .violations()
                    .iter()
                    .map(|v| FieldError {
                        field: v.field.to_string(),
                        message: v.message.clone(),
                    })
                    .collect();
                (
                    StatusCode::BAD_REQUEST,
                    "validation_failed",
                    "Request body failed validation".to_string(),
                    Some(details),
                )
            }
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                msg,
                None,
            ),
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        if err.is_not_found() {
            return match err {
                AppError::ItemNotFound(id) => ApiError::NotFound(format!("Item not found: {}", id)),
                _ => ApiError::NotFound("Item not found".to_string()),
            };
        }

        match err {
            AppError::Validation(errors) => ApiError::Validation(errors),
            AppError::DatabaseError(e) => {
                error!(error = %e, "Database error while handling request");
                ApiError::Internal("Database error".to_string())
            }
            AppError::WorkerPool(e) => {
                error!(error = %e, "Worker pool error while handling request");
                ApiError::Internal(format!("Worker pool error: {}", e))
            }
            AppError::ConfigError(msg) => {
                ApiError::Internal(format!("Configuration error: {}", msg))
            }
            other => {
                error!(error = %other, "Request failed");
                ApiError::Internal(other.to_string())
            }
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
