//! Whole-run orchestration.
//!
//! A run resolves the desired labels and the target repositories once, then
//! reconciles the repositories one after the other in list order, feeding each
//! repository's report to the [`Reporter`] and into the [`RunSummary`].

use github_client::LabelClient;
use tracing::{error, info, instrument, warn};

use crate::config::LabelordConfig;
use crate::errors::{LabelordError, LabelordResult, EXIT_OPERATION_FAILURE, EXIT_SUCCESS};
use crate::label_set::LabelSet;
use crate::operation::Mode;
use crate::reconciler::{Reconciler, RepositoryReport};
use crate::report::Reporter;

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;

/// Where the desired labels come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DesiredLabelSource {
    /// The labels currently defined on a template repository, fetched live.
    TemplateRepository(String),
    /// Labels listed in the configuration file.
    Static(LabelSet),
}

impl DesiredLabelSource {
    /// Picks the label source: the command-line template repository, then the
    /// configured template repository, then the `[labels]` section.
    ///
    /// # Errors
    ///
    /// `LabelordError::MissingLabels` when none of them is set.
    pub fn select(
        template_override: Option<&str>,
        config: &LabelordConfig,
    ) -> LabelordResult<Self> {
        if let Some(repo) = template_override.filter(|r| !r.is_empty()) {
            return Ok(DesiredLabelSource::TemplateRepository(repo.to_string()));
        }
        if let Some(repo) = config.template_repo() {
            return Ok(DesiredLabelSource::TemplateRepository(repo.to_string()));
        }
        match config.labels() {
            Some(labels) => Ok(DesiredLabelSource::Static(labels.clone())),
            None => Err(LabelordError::MissingLabels),
        }
    }

    /// Produces the label set, fetching the template repository if needed.
    #[instrument(skip(self, client))]
    pub async fn resolve(self, client: &dyn LabelClient) -> LabelordResult<LabelSet> {
        match self {
            DesiredLabelSource::Static(labels) => Ok(labels),
            DesiredLabelSource::TemplateRepository(repo) => {
                match client.list_labels(&repo).await {
                    Ok(labels) => {
                        info!(
                            repo = repo.as_str(),
                            count = labels.len(),
                            "Loaded template labels"
                        );
                        Ok(labels.into_iter().collect())
                    }
                    Err(e) if e.is_unauthorized() => Err(LabelordError::from_remote(e)),
                    Err(e) => {
                        error!(
                            repo = repo.as_str(),
                            error_message = e.message(),
                            "Failed to fetch template labels"
                        );
                        Err(LabelordError::TemplateFetch { repo, source: e })
                    }
                }
            }
        }
    }
}

/// Where the target repositories come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositorySource {
    /// Every repository the credential can access.
    AllAccessible,
    /// The enabled entries of the `[repos]` section, in file order.
    Static(Vec<String>),
}

impl RepositorySource {
    /// # Errors
    ///
    /// `LabelordError::MissingRepositories` when `all_repos` is false and the
    /// configuration has no `[repos]` section.
    pub fn select(all_repos: bool, config: &LabelordConfig) -> LabelordResult<Self> {
        if all_repos {
            return Ok(RepositorySource::AllAccessible);
        }
        config
            .enabled_repositories()
            .map(RepositorySource::Static)
            .ok_or(LabelordError::MissingRepositories)
    }

    #[instrument(skip(self, client))]
    pub async fn resolve(self, client: &dyn LabelClient) -> LabelordResult<Vec<String>> {
        match self {
            RepositorySource::Static(repos) => Ok(repos),
            RepositorySource::AllAccessible => match client.list_repositories().await {
                Ok(repos) => Ok(repos),
                Err(e) if e.is_unauthorized() => Err(LabelordError::from_remote(e)),
                Err(e) => {
                    error!(
                        error_message = e.message(),
                        "Failed to list accessible repositories"
                    );
                    Err(LabelordError::RepositoryListing(e))
                }
            },
        }
    }
}

/// Final state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
}

impl ExitStatus {
    pub fn code(&self) -> i32 {
        match self {
            ExitStatus::Success => EXIT_SUCCESS,
            ExitStatus::Failure => EXIT_OPERATION_FAILURE,
        }
    }
}

/// Aggregate outcome of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Repositories whose labels could be fetched.
    pub repositories_succeeded: usize,

    /// Failed fetches plus failed operations, across all repositories.
    pub failures: usize,

    /// Per-repository reports in processing order.
    pub reports: Vec<RepositoryReport>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, report: RepositoryReport) {
        if report.was_fetched() {
            self.repositories_succeeded += 1;
        }
        self.failures += report.failures();
        self.reports.push(report);
    }

    /// Total number of operation records, including dry-run ones.
    pub fn operations(&self) -> usize {
        self.reports.iter().map(|r| r.records.len()).sum()
    }

    pub fn exit_status(&self) -> ExitStatus {
        if self.failures == 0 {
            ExitStatus::Success
        } else {
            ExitStatus::Failure
        }
    }
}

/// Drives a full reconciliation run.
pub struct RunOrchestrator<'a> {
    reconciler: Reconciler<'a>,
    reporter: &'a mut Reporter,
}

impl<'a> RunOrchestrator<'a> {
    pub fn new(
        client: &'a dyn LabelClient,
        mode: Mode,
        dry_run: bool,
        reporter: &'a mut Reporter,
    ) -> Self {
        Self {
            reconciler: Reconciler::new(client, mode, dry_run),
            reporter,
        }
    }

    /// Reconciles every repository against `desired`, sequentially, then prints
    /// the summary line.
    ///
    /// # Errors
    ///
    /// Returns `LabelordError::Unauthorized` if the credential is rejected at any
    /// point; the remaining repositories are not processed.
    #[instrument(
        skip(self, repos, desired),
        fields(repositories = repos.len(), labels = desired.len())
    )]
    pub async fn run(
        &mut self,
        repos: &[String],
        desired: &LabelSet,
    ) -> LabelordResult<RunSummary> {
        info!(
            mode = %self.reconciler.mode(),
            dry_run = self.reconciler.is_dry_run(),
            "Starting label run"
        );

        let mut summary = RunSummary::new();

        for repo in repos {
            let report = self.reconciler.reconcile(repo, desired).await?;
            self.reporter.repository(&report);
            summary.record(report);
        }

        self.reporter.summary(&summary);

        if summary.failures > 0 {
            warn!(failures = summary.failures, "Label run finished with failures");
        } else {
            info!(
                repositories = summary.repositories_succeeded,
                operations = summary.operations(),
                "Label run finished"
            );
        }

        Ok(summary)
    }
}
