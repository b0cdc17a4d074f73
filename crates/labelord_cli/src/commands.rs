//! Command modules for the labelord CLI.
//!
//! - `list_repos_cmd`: repositories accessible to the token
//! - `list_labels_cmd`: labels of a single repository
//! - `run_cmd`: label reconciliation across repositories
//! - `server_cmd`: the webhook server

use std::path::Path;

use github_client::{create_token_client, GitHubClient};
use labelord_core::LabelordConfig;
use tracing::debug;

use crate::errors::Error;

pub mod list_labels_cmd;
pub mod list_repos_cmd;
pub mod run_cmd;
pub mod server_cmd;

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;

/// State shared by every command: the loaded configuration and the token
/// given on the command line or through `GITHUB_TOKEN`.
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    pub config: LabelordConfig,
    pub explicit_token: Option<String>,
    api_uri: Option<String>,
}

impl CommandContext {
    pub fn new(config: LabelordConfig, explicit_token: Option<String>) -> Self {
        Self {
            config,
            explicit_token,
            api_uri: None,
        }
    }

    /// Loads the configuration file. A missing file yields an empty configuration.
    ///
    /// # Errors
    ///
    /// `LabelordError::Config` when the file exists but cannot be read or parsed.
    pub fn load(config_path: &Path, explicit_token: Option<String>) -> Result<Self, Error> {
        debug!("Using configuration file {:?}", config_path);
        let config = LabelordConfig::load(config_path)?;
        Ok(Self::new(config, explicit_token))
    }

    /// Sends GitHub requests to `uri` instead of the public API.
    pub fn with_api_uri(mut self, uri: impl Into<String>) -> Self {
        self.api_uri = Some(uri.into());
        self
    }

    /// The token to authenticate with: explicit token first, then the
    /// configuration file.
    pub fn token(&self) -> Result<String, Error> {
        Ok(self.config.resolve_token(self.explicit_token.as_deref())?)
    }

    /// Builds an authenticated GitHub client.
    ///
    /// # Errors
    ///
    /// `LabelordError::MissingToken` when no token is available.
    pub fn client(&self) -> Result<GitHubClient, Error> {
        let token = self.token()?;
        let octocrab = create_token_client(&token, self.api_uri.as_deref())?;
        Ok(GitHubClient::new(octocrab))
    }
}
