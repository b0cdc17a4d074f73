//! HTTP routing configuration
//!
//! # Route Structure
//!
//! - GET    / - Configured repositories
//! - POST   / - GitHub webhook deliveries
//! - GET    /health - Health check
//!
//! Anything else falls through to a JSON 404.

use axum::{middleware, routing::get, Router};
use std::time::Duration;
use tower_http::{
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

use crate::{handlers, middleware as api_middleware, AppState};

/// Upper bound for handling one request, fan-out included.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Create the complete API router with all routes configured.
pub fn create_router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().include_headers(true))
        .on_response(DefaultOnResponse::new().include_headers(true));

    let timeout_layer = TimeoutLayer::new(REQUEST_TIMEOUT);

    Router::new()
        .route("/", get(handlers::index).post(handlers::webhook))
        .route("/health", get(handlers::health_check))
        .fallback(handlers::not_found)
        .layer(middleware::from_fn(api_middleware::tracing_middleware))
        .layer(timeout_layer)
        .layer(trace_layer)
        .with_state(state)
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
