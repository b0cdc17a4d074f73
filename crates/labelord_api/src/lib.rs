//! labelord webhook API
//!
//! This crate exposes the HTTP surface of labelord: the GitHub webhook endpoint
//! that propagates label changes between the configured repositories, an index
//! listing those repositories, and a health check.
//!
//! # Architecture
//!
//! This crate only translates HTTP to and from the framework-free webhook
//! handling in `labelord_core::webhook`. The dependency flows
//! HTTP API → business logic, never the reverse.
//!
//! Routes:
//!
//! - `GET  /`       - configured repositories as JSON
//! - `POST /`       - GitHub webhook deliveries
//! - `GET  /health` - health check

use std::sync::Arc;

use github_client::LabelClient;
use labelord_core::{DeliveryGuard, LabelordConfig, LabelordError, LabelordResult};
use tokio::sync::Mutex;

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;

pub use errors::{ApiError, ErrorResponse};
pub use server::{ApiConfig, ApiServer};

/// Default host the server binds to.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default API port
pub const DEFAULT_PORT: u16 = 5000;

/// Application state shared across handlers
///
/// Cloning is cheap; every clone refers to the same client and delivery guard.
#[derive(Clone)]
pub struct AppState {
    /// Secret shared with GitHub for signing deliveries
    pub webhook_secret: Arc<str>,

    /// Enabled repositories, in configuration order
    pub repositories: Arc<[String]>,

    /// Label client used to propagate changes
    pub client: Arc<dyn LabelClient>,

    /// Last processed delivery. Held for the whole handling of a delivery, so
    /// deliveries are processed one at a time.
    pub guard: Arc<Mutex<DeliveryGuard>>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        webhook_secret: impl Into<Arc<str>>,
        repositories: Vec<String>,
        client: Arc<dyn LabelClient>,
    ) -> Self {
        Self {
            webhook_secret: webhook_secret.into(),
            repositories: repositories.into(),
            client,
            guard: Arc::new(Mutex::new(DeliveryGuard::new())),
        }
    }

    /// Builds the state from a loaded configuration.
    ///
    /// # Errors
    ///
    /// `MissingWebhookSecret` or `MissingRepositories` when the configuration
    /// lacks what the server needs.
    pub fn from_config(
        config: &LabelordConfig,
        client: Arc<dyn LabelClient>,
    ) -> LabelordResult<Self> {
        let secret = config
            .webhook_secret()
            .ok_or(LabelordError::MissingWebhookSecret)?;
        let repositories = config
            .enabled_repositories()
            .ok_or(LabelordError::MissingRepositories)?;

        Ok(Self::new(secret, repositories, client))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use github_client::{create_token_client, GitHubClient};
    use wiremock::MockServer;

    use crate::AppState;

    pub const SECRET: &str = "s3cr3t";

    /// State whose client talks to `mock_server`.
    pub fn state(mock_server: &MockServer, repositories: &[&str]) -> AppState {
        let octocrab = create_token_client("ghp_test_token", Some(&mock_server.uri()))
            .expect("Failed to build test client");
        AppState::new(
            SECRET,
            repositories.iter().map(|r| r.to_string()).collect(),
            Arc::new(GitHubClient::new(octocrab)),
        )
    }
}
