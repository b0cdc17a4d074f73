//! labelord webhook server
//!
//! Standalone binary for the webhook API. The `labelord run-server` command
//! starts the same server from the command line.
//!
//! # Environment Variables
//!
//! - `LABELORD_CONFIG`: Configuration file (default: config.toml)
//! - `GITHUB_TOKEN`: GitHub token, overrides the configuration file
//! - `API_HOST`: Host to bind to (default: 127.0.0.1)
//! - `API_PORT`: Port to listen on (default: 5000)
//! - `RUST_LOG`: Log level (default: info)

use std::{env, path::PathBuf, sync::Arc};

use github_client::{create_token_client, GitHubClient};
use labelord_api::{ApiConfig, ApiServer, AppState, DEFAULT_HOST, DEFAULT_PORT};
use labelord_core::config::{LabelordConfig, CONFIG_ENV_VAR, DEFAULT_CONFIG_FILENAME};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();

    let api_config = ApiConfig {
        port: match env::var("API_PORT") {
            Ok(port) => port
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid API_PORT '{}': {}", port, e))?,
            Err(_) => DEFAULT_PORT,
        },
        host: env::var("API_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
    };

    let config_path = env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILENAME));
    let config = LabelordConfig::load(&config_path)?;

    let explicit_token = env::var("GITHUB_TOKEN").ok();
    config.validate_for_server(explicit_token.as_deref())?;
    let token = config.resolve_token(explicit_token.as_deref())?;

    let octocrab = create_token_client(&token, None)?;
    let state = AppState::from_config(&config, Arc::new(GitHubClient::new(octocrab)))?;

    tracing::info!(config = %config_path.display(), "Starting labelord API server");

    ApiServer::new(api_config, state).serve().await
}
