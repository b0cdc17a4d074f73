//! `labelord list-labels REPOSITORY`

use std::io::{self, Write};

use github_client::LabelClient;
use labelord_core::LabelordError;
use tracing::instrument;

use crate::commands::CommandContext;
use crate::errors::Error;

#[cfg(test)]
#[path = "list_labels_cmd_tests.rs"]
mod tests;

/// Writes every label of `repo` as `#<color> <name>`, in the order GitHub
/// returns them.
///
/// # Errors
///
/// `RepositoryNotFound` when GitHub answers 404, `Unauthorized` for a rejected
/// token, `Remote` otherwise.
#[instrument(skip(client, out))]
pub async fn list_labels(
    client: &dyn LabelClient,
    repo: &str,
    out: &mut dyn Write,
) -> Result<(), Error> {
    let labels = client.list_labels(repo).await.map_err(|e| match e {
        github_client::Error::NotFound { message } => LabelordError::RepositoryNotFound {
            repo: repo.to_string(),
            message,
        },
        other => LabelordError::from_remote(other),
    })?;

    for label in labels {
        writeln!(out, "#{} {}", label.color, label.name)?;
    }
    out.flush()?;

    Ok(())
}

pub async fn execute(ctx: &CommandContext, repo: &str) -> Result<(), Error> {
    let client = ctx.client()?;
    list_labels(&client, repo, &mut io::stdout()).await
}
