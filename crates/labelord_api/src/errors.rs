//! Error handling and HTTP error conversion
//!
//! Webhook replies are plain text and produced by `labelord_core::webhook`.
//! Everything else that goes wrong at the HTTP boundary is reported with a
//! JSON [`ErrorResponse`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Standard error response for all API errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Error details
    pub error: ErrorDetails,
}

/// Error details structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetails {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Additional context (optional, type varies by error)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Errors returned by handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No route matches the request.
    #[error("No route for {method} {path}")]
    NotFound { method: String, path: String },

    /// The server produced something it cannot send.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound { .. } => "NotFound",
            ApiError::Internal(_) => "InternalError",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        log_error(&self, status);

        // Internal details stay in the server log.
        let message = match &self {
            ApiError::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        let error_response = ErrorResponse {
            error: ErrorDetails {
                code: self.code().to_string(),
                message,
                details: None,
            },
        };

        (status, Json(error_response)).into_response()
    }
}

/// Log error with appropriate level based on HTTP status
fn log_error(error: &ApiError, status: StatusCode) {
    match status {
        StatusCode::INTERNAL_SERVER_ERROR => {
            tracing::error!("API error: {} - {}", status, error);
        }
        _ => {
            tracing::warn!("API error: {} - {}", status, error);
        }
    }
}
