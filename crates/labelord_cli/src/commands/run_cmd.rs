//! `labelord run <update|replace>`
//!
//! Resolves the desired labels and the target repositories, then reconciles
//! every repository in turn.

use clap::{Args, ValueEnum};
use github_client::LabelClient;
use labelord_core::{
    DesiredLabelSource, ExitStatus, LabelordConfig, Mode, Reporter, RepositorySource,
    RunOrchestrator, Verbosity,
};
use tracing::instrument;

use crate::commands::CommandContext;
use crate::errors::Error;

#[cfg(test)]
#[path = "run_cmd_tests.rs"]
mod tests;

/// How labels missing from the desired set are treated.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    /// Add and update labels, keep the others.
    Update,
    /// Add and update labels, delete the others.
    Replace,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Update => Mode::Update,
            ModeArg::Replace => Mode::Replace,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[arg(value_enum, value_name = "update|replace")]
    pub mode: ModeArg,

    /// Use all accessible repositories.
    #[arg(short, long)]
    pub all_repos: bool,

    /// Don't make any changes to GitHub, just print them.
    #[arg(short, long)]
    pub dry_run: bool,

    /// Print every operation on standard output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Print nothing.
    #[arg(short, long)]
    pub quiet: bool,

    /// Repository to use as a template.
    #[arg(short = 'r', long, value_name = "REPOSITORY")]
    pub template_repo: Option<String>,
}

impl RunArgs {
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.verbose, self.quiet)
    }
}

/// Runs the reconciliation and returns its final status.
///
/// Both sources are selected before anything is fetched, so precondition errors
/// abort the run without a remote call. A missing label specification is
/// reported even when repositories are missing too.
///
/// # Errors
///
/// `MissingLabels`, `TemplateFetch`, `MissingRepositories`, `RepositoryListing`
/// or `Unauthorized`. Failed operations are not errors; they turn the returned
/// status into `ExitStatus::Failure`.
#[instrument(skip(client, config, reporter))]
pub async fn run_labels(
    client: &dyn LabelClient,
    config: &LabelordConfig,
    args: &RunArgs,
    reporter: &mut Reporter,
) -> Result<ExitStatus, Error> {
    let label_source = DesiredLabelSource::select(args.template_repo.as_deref(), config)?;
    let repository_source = RepositorySource::select(args.all_repos, config)?;

    let desired = label_source.resolve(client).await?;
    let repositories = repository_source.resolve(client).await?;

    let summary = RunOrchestrator::new(client, args.mode.into(), args.dry_run, reporter)
        .run(&repositories, &desired)
        .await?;

    Ok(summary.exit_status())
}

pub async fn execute(ctx: &CommandContext, args: &RunArgs) -> Result<ExitStatus, Error> {
    let client = ctx.client()?;
    let mut reporter = Reporter::stdio(args.verbosity());
    run_labels(&client, &ctx.config, args, &mut reporter).await
}
