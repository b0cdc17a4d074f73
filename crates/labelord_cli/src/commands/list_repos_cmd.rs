//! `labelord list-repos`

use std::io::{self, Write};

use github_client::LabelClient;
use labelord_core::RepositorySource;
use tracing::instrument;

use crate::commands::CommandContext;
use crate::errors::Error;

#[cfg(test)]
#[path = "list_repos_cmd_tests.rs"]
mod tests;

/// Writes the full name of every repository accessible to the token, one per line.
///
/// # Errors
///
/// `Unauthorized` for a rejected token, `RepositoryListing` for any other
/// listing failure.
#[instrument(skip(client, out))]
pub async fn list_repositories(client: &dyn LabelClient, out: &mut dyn Write) -> Result<(), Error> {
    let repositories = RepositorySource::AllAccessible.resolve(client).await?;

    for repository in repositories {
        writeln!(out, "{}", repository)?;
    }
    out.flush()?;

    Ok(())
}

pub async fn execute(ctx: &CommandContext) -> Result<(), Error> {
    let client = ctx.client()?;
    list_repositories(&client, &mut io::stdout()).await
}
