use std::io;

use labelord_core::errors::{LabelordError, EXIT_OPERATION_FAILURE};
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that stop a labelord command.
///
/// The message of every variant is what the user sees on standard error; the
/// exit code tells scripts which condition occurred.
#[derive(Error, Debug)]
pub enum Error {
    /// A condition detected by the label logic, with its own exit code.
    #[error(transparent)]
    Labelord(#[from] LabelordError),

    /// Command output could not be written.
    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),

    /// The webhook server could not start or stopped with an error.
    #[error("Webhook server failed: {0}")]
    Server(String),
}

impl Error {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Labelord(e) => e.exit_code(),
            Error::Output(_) | Error::Server(_) => EXIT_OPERATION_FAILURE,
        }
    }
}

impl From<github_client::Error> for Error {
    fn from(error: github_client::Error) -> Self {
        Error::Labelord(LabelordError::from_remote(error))
    }
}
