//! HTTP request handlers
//!
//! Handlers translate HTTP requests into `labelord_core` calls and the results
//! back into HTTP responses.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use labelord_core::webhook::{self, WebhookContext, WebhookRequest};
use serde::{Deserialize, Serialize};

use crate::{errors::ApiError, AppState};

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;

/// Repositories the server propagates label changes between.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RepositoriesResponse {
    pub repositories: Vec<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckResponse {
    /// Service status: "healthy" or "unhealthy"
    pub status: String,

    /// Service version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Current timestamp (ISO 8601)
    pub timestamp: String,

    /// Error message (if unhealthy)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /
///
/// Lists the configured repositories.
pub async fn index(State(state): State<AppState>) -> Json<RepositoriesResponse> {
    Json(RepositoriesResponse {
        repositories: state.repositories.to_vec(),
    })
}

/// POST /
///
/// Receives a GitHub webhook delivery. The raw body is kept intact so the
/// signature can be checked against it. Other methods on `/` get a 405 from
/// the router.
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request = WebhookRequest::new(
        headers.iter().filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        }),
        body.to_vec(),
    );

    let ctx = WebhookContext {
        secret: &state.webhook_secret,
        repositories: &state.repositories,
        client: state.client.as_ref(),
    };

    let response = {
        let mut guard = state.guard.lock().await;
        webhook::handle(&ctx, &mut guard, &request).await
    };

    let status = StatusCode::from_u16(response.status)
        .map_err(|e| ApiError::Internal(format!("Invalid webhook status: {}", e)))?;

    Ok((status, response.body).into_response())
}

/// GET /health
///
/// Returns service health status with version and timestamp.
pub async fn health_check() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
        timestamp: chrono::Utc::now().to_rfc3339(),
        error: None,
    })
}

/// Fallback for unknown routes.
pub async fn not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::NotFound {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
}
