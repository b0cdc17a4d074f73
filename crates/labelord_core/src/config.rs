//! Configuration file loading.
//!
//! The configuration is a TOML file, parsed and validated once at startup.
//! Every accessor returns typed values; sections that are absent come back as
//! `None` so callers can tell "not configured" from "configured but empty".
//!
//! # Example
//!
//! ```toml
//! [github]
//! token = "ghp_..."
//! webhook_secret = "s3cr3t"
//!
//! [labels]
//! bug = "ff0000"
//! "good first issue" = "#7057ff"
//!
//! [repos]
//! "octocat/hello" = true
//! "octocat/archived" = false
//!
//! [others]
//! template_repo = "octocat/template"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use github_client::Label;
use serde::Deserialize;
use tracing::{debug, info};

use crate::errors::{LabelordError, LabelordResult};
use crate::label_set::LabelSet;

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILENAME: &str = "config.toml";

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "LABELORD_CONFIG";

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    github: GitHubSection,
    labels: Option<BTreeMap<String, String>>,
    repos: Option<toml::Table>,
    #[serde(default)]
    others: OthersSection,
}

#[derive(Debug, Default, Deserialize)]
struct GitHubSection {
    token: Option<String>,
    webhook_secret: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OthersSection {
    #[serde(alias = "template-repo")]
    template_repo: Option<String>,
}

/// Validated labelord configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelordConfig {
    token: Option<String>,
    webhook_secret: Option<String>,
    labels: Option<LabelSet>,
    repositories: Option<Vec<(String, bool)>>,
    template_repo: Option<String>,
}

impl LabelordConfig {
    /// Loads the configuration from `path`.
    ///
    /// A file that does not exist yields an empty configuration; everything can
    /// still come from the command line.
    ///
    /// # Errors
    ///
    /// `LabelordError::Config` if the file cannot be read, is not valid TOML, or
    /// holds invalid values.
    pub fn load(path: &Path) -> LabelordResult<Self> {
        debug!("Loading configuration from {:?}", path);

        if !path.exists() {
            info!(
                "Configuration file {:?} not found, using empty configuration",
                path
            );
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            LabelordError::Config(format!("Failed to read configuration file: {}", e))
        })?;

        Self::from_toml_str(&content)
    }

    /// Parses and validates configuration text.
    pub fn from_toml_str(content: &str) -> LabelordResult<Self> {
        let raw: RawConfig = toml::from_str(content).map_err(|e| {
            LabelordError::Config(format!("Failed to parse configuration file: {}", e))
        })?;

        let labels = raw.labels.map(parse_labels).transpose()?;
        let repositories = raw.repos.map(parse_repositories).transpose()?;

        Ok(Self {
            token: non_empty(raw.github.token),
            webhook_secret: non_empty(raw.github.webhook_secret),
            labels,
            repositories,
            template_repo: non_empty(raw.others.template_repo),
        })
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Picks the token to use: the explicit one (command line or `GITHUB_TOKEN`)
    /// when non-empty, otherwise the configured one.
    ///
    /// # Errors
    ///
    /// `LabelordError::MissingToken` when neither is set.
    pub fn resolve_token(&self, explicit: Option<&str>) -> LabelordResult<String> {
        explicit
            .filter(|t| !t.is_empty())
            .or(self.token())
            .map(str::to_string)
            .ok_or(LabelordError::MissingToken)
    }

    pub fn webhook_secret(&self) -> Option<&str> {
        self.webhook_secret.as_deref()
    }

    /// The `[labels]` section, when present.
    pub fn labels(&self) -> Option<&LabelSet> {
        self.labels.as_ref()
    }

    pub fn template_repo(&self) -> Option<&str> {
        self.template_repo.as_deref()
    }

    /// Repositories of the `[repos]` section set to `true`, in file order.
    /// `None` when the section is absent.
    pub fn enabled_repositories(&self) -> Option<Vec<String>> {
        self.repositories.as_ref().map(|repos| {
            repos
                .iter()
                .filter(|(_, enabled)| *enabled)
                .map(|(slug, _)| slug.clone())
                .collect()
        })
    }

    /// Checks what the webhook server needs before it starts: a webhook secret,
    /// then a `[repos]` section, then a token.
    pub fn validate_for_server(&self, explicit_token: Option<&str>) -> LabelordResult<()> {
        if self.webhook_secret.is_none() {
            return Err(LabelordError::MissingWebhookSecret);
        }
        if self.repositories.is_none() {
            return Err(LabelordError::MissingRepositories);
        }
        self.resolve_token(explicit_token).map(|_| ())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_labels(raw: BTreeMap<String, String>) -> LabelordResult<LabelSet> {
    let mut labels = LabelSet::new();

    for (name, color) in raw {
        let color = color.trim_start_matches('#').to_string();
        if !Label::is_valid_color(&color) {
            return Err(LabelordError::Config(format!(
                "Invalid color '{}' for label '{}': expected six hex digits",
                color, name
            )));
        }
        if let Some((existing, _)) = labels.find_ignore_case(&name) {
            return Err(LabelordError::Config(format!(
                "Labels '{}' and '{}' differ only in case",
                existing, name
            )));
        }
        labels.insert(name, color);
    }

    Ok(labels)
}

fn parse_repositories(raw: toml::Table) -> LabelordResult<Vec<(String, bool)>> {
    raw.into_iter()
        .map(|(slug, value)| match value {
            toml::Value::Boolean(enabled) => Ok((slug, enabled)),
            other => Err(LabelordError::Config(format!(
                "Repository '{}' must be set to true or false, found {}",
                slug, other
            ))),
        })
        .collect()
}
