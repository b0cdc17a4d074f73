//! Error types for labelord.
//!
//! Every fatal condition of a run maps to its own process exit code so scripts
//! calling labelord can tell them apart. Per-operation failures are not errors
//! at this level; they are recorded in the run summary instead.

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Process exit code for a fully successful run.
pub const EXIT_SUCCESS: i32 = 0;

/// Process exit code for an unreadable or invalid configuration file.
pub const EXIT_CONFIG: i32 = 1;

/// Process exit code when no GitHub token is available.
pub const EXIT_MISSING_TOKEN: i32 = 3;

/// Process exit code when GitHub rejects the token.
pub const EXIT_UNAUTHORIZED: i32 = 4;

/// Process exit code when a repository does not exist or is not accessible.
pub const EXIT_NOT_FOUND: i32 = 5;

/// Process exit code when no label specification is found.
pub const EXIT_MISSING_LABELS: i32 = 6;

/// Process exit code when no repository specification is found.
pub const EXIT_MISSING_REPOSITORIES: i32 = 7;

/// Process exit code when the webhook server has no secret.
pub const EXIT_MISSING_WEBHOOK_SECRET: i32 = 8;

/// Process exit code when one or more operations failed or a remote fetch failed.
pub const EXIT_OPERATION_FAILURE: i32 = 10;

/// Errors that stop a labelord command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LabelordError {
    /// The configuration file could not be read or is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// No GitHub token was given on the command line, in the environment or in the config file.
    #[error("No GitHub token has been provided")]
    MissingToken,

    /// GitHub rejected the token. Fatal for the whole run.
    #[error("GitHub: ERROR 401 - {message}")]
    Unauthorized { message: String },

    /// The repository does not exist or the token cannot see it.
    #[error("GitHub: ERROR 404 - {message}")]
    RepositoryNotFound { repo: String, message: String },

    /// Neither a template repository nor a `[labels]` section is configured.
    #[error("No labels specification has been found")]
    MissingLabels,

    /// Neither `--all-repos` nor a `[repos]` section is given.
    #[error("No repositories specification has been found")]
    MissingRepositories,

    /// The webhook server cannot verify deliveries without a secret.
    #[error("No webhook secret has been provided")]
    MissingWebhookSecret,

    /// The labels of the template repository could not be fetched.
    #[error("Failed to fetch labels of template repository {repo}: {source}")]
    TemplateFetch {
        repo: String,
        source: github_client::Error,
    },

    /// The repositories accessible to the token could not be listed.
    #[error("Failed to list accessible repositories: {0}")]
    RepositoryListing(github_client::Error),

    /// Any other GitHub failure that prevents the command from continuing.
    #[error("GitHub request failed: {0}")]
    Remote(github_client::Error),
}

impl LabelordError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            LabelordError::Config(_) => EXIT_CONFIG,
            LabelordError::MissingToken => EXIT_MISSING_TOKEN,
            LabelordError::Unauthorized { .. } => EXIT_UNAUTHORIZED,
            LabelordError::RepositoryNotFound { .. } => EXIT_NOT_FOUND,
            LabelordError::MissingLabels => EXIT_MISSING_LABELS,
            LabelordError::MissingRepositories => EXIT_MISSING_REPOSITORIES,
            LabelordError::MissingWebhookSecret => EXIT_MISSING_WEBHOOK_SECRET,
            LabelordError::TemplateFetch { .. }
            | LabelordError::RepositoryListing(_)
            | LabelordError::Remote(_) => EXIT_OPERATION_FAILURE,
        }
    }

    /// Converts a transport error into a command error, promoting a rejected
    /// credential to `Unauthorized`.
    pub fn from_remote(error: github_client::Error) -> Self {
        match error {
            github_client::Error::Unauthorized { message } => {
                LabelordError::Unauthorized { message }
            }
            other => LabelordError::Remote(other),
        }
    }
}

impl From<github_client::Error> for LabelordError {
    fn from(error: github_client::Error) -> Self {
        LabelordError::from_remote(error)
    }
}

/// Result type used throughout labelord_core.
pub type LabelordResult<T> = Result<T, LabelordError>;
