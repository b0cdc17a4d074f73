//! Error types for GitHub client operations.
//!
//! This module defines the error types that can occur when interacting with the GitHub API
//! through the github_client crate. Every variant that originates from an HTTP response
//! keeps the status code and the message GitHub put in the error body, so callers can
//! report `<code> - <message>` exactly as the API returned it.

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur during GitHub client operations.
///
/// ## Examples
///
/// ```rust,ignore
/// use github_client::Error;
///
/// match client.list_labels("octocat/hello-world").await {
///     Ok(labels) => println!("{} labels", labels.len()),
///     Err(Error::Unauthorized { message }) => eprintln!("Bad credentials: {}", message),
///     Err(Error::NotFound { .. }) => eprintln!("No such repository"),
///     Err(err) => eprintln!("Other error: {}", err),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// GitHub rejected the credential (HTTP 401).
    ///
    /// A bad token cannot succeed on any later call either, so callers treat this
    /// as fatal for the whole run.
    #[error("Authentication failed: {message}")]
    Unauthorized { message: String },

    /// The repository or label does not exist or is not visible to the token (HTTP 404).
    #[error("Resource not found: {message}")]
    NotFound { message: String },

    /// GitHub answered with a non-success status.
    ///
    /// The message is taken from the `message` field of the error body and is empty
    /// when GitHub did not send one.
    #[error("GitHub API error {status}: {message}")]
    Api { status: u16, message: String },

    /// GitHub answered with a success status other than the one the operation expects,
    /// for example `200` where a label creation should return `201`.
    #[error("Unexpected response status {status}")]
    UnexpectedStatus { status: u16 },

    /// The request never produced an HTTP status: connection, URI or decoding failure.
    #[error("Failed to communicate with GitHub: {0}")]
    Transport(String),
}

impl Error {
    /// Returns the HTTP status code associated with the error, when there is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Unauthorized { .. } => Some(401),
            Error::NotFound { .. } => Some(404),
            Error::Api { status, .. } => Some(*status),
            Error::UnexpectedStatus { status } => Some(*status),
            Error::Transport(_) => None,
        }
    }

    /// Returns the message reported by GitHub (or the transport failure description).
    pub fn message(&self) -> &str {
        match self {
            Error::Unauthorized { message }
            | Error::NotFound { message }
            | Error::Api { message, .. }
            | Error::Transport(message) => message,
            Error::UnexpectedStatus { .. } => "",
        }
    }

    /// Returns true when the error means the credential itself was rejected.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Unauthorized { .. })
    }

    /// Builds an error from a status code and GitHub error message.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 => Error::Unauthorized { message },
            404 => Error::NotFound { message },
            _ => Error::Api { status, message },
        }
    }
}

impl From<octocrab::Error> for Error {
    fn from(e: octocrab::Error) -> Self {
        match e {
            octocrab::Error::GitHub { source, .. } => {
                Error::from_status(source.status_code.as_u16(), source.message.clone())
            }
            other => Error::Transport(other.to_string()),
        }
    }
}
