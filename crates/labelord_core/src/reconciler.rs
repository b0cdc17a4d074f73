//! Per-repository label reconciliation.
//!
//! The [`Reconciler`] brings one repository in line with a desired [`LabelSet`]:
//! it fetches the current labels, computes the operations with [`plan`], and
//! executes them one at a time, recording an outcome for each. A failed
//! operation is recorded and processing moves on; only a rejected credential
//! stops the reconciliation.

use github_client::{Label, LabelClient};
use tracing::{debug, error, info, instrument, warn};

use crate::errors::{LabelordError, LabelordResult};
use crate::label_set::LabelSet;
use crate::operation::{
    Mode, OperationKind, OperationOutcome, OperationRecord, PlannedOperation,
};

#[cfg(test)]
#[path = "reconciler_tests.rs"]
mod tests;

/// Computes the operations that turn `current` into `desired`.
///
/// Desired labels are visited in lexical order. A desired label matching a
/// current one case-insensitively is left alone when name and color are
/// identical, and updated otherwise, targeting the name as currently stored so
/// a casing difference gets corrected. A desired label with no match is added.
///
/// In [`Mode::Replace`] every current label that no desired label matches
/// (ignoring case) is deleted. Deletes always come after adds and updates.
pub fn plan(current: &LabelSet, desired: &LabelSet, mode: Mode) -> Vec<PlannedOperation> {
    let mut operations = Vec::new();

    for (name, color) in desired.iter() {
        match current.find_ignore_case(name) {
            Some((stored, stored_color)) if stored == name && stored_color == color => {}
            Some((stored, _)) => {
                operations.push(PlannedOperation::update(stored, Label::new(name, color)));
            }
            None => operations.push(PlannedOperation::add(Label::new(name, color))),
        }
    }

    if mode == Mode::Replace {
        for (name, color) in current.iter() {
            if !desired.contains_ignore_case(name) {
                operations.push(PlannedOperation::delete(Label::new(name, color)));
            }
        }
    }

    operations
}

/// Repository-level failure: the current labels could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub code: Option<u16>,
    pub message: String,
}

/// Everything that happened to one repository during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryReport {
    pub repo: String,

    /// Set when the labels could not be fetched; no operation was attempted.
    pub fetch_error: Option<FetchFailure>,

    /// One record per planned operation, in execution order.
    pub records: Vec<OperationRecord>,

    /// Number of desired labels that already matched.
    pub unchanged: usize,
}

impl RepositoryReport {
    fn new(repo: &str) -> Self {
        Self {
            repo: repo.to_string(),
            fetch_error: None,
            records: Vec::new(),
            unchanged: 0,
        }
    }

    fn fetch_failed(repo: &str, error: &github_client::Error) -> Self {
        Self {
            fetch_error: Some(FetchFailure {
                code: error.status(),
                message: error.message().to_string(),
            }),
            ..Self::new(repo)
        }
    }

    /// Number of failures charged to this repository: the fetch failure, or
    /// every failed operation.
    pub fn failures(&self) -> usize {
        if self.fetch_error.is_some() {
            return 1;
        }
        self.records
            .iter()
            .filter(|r| r.outcome.is_failure())
            .count()
    }

    /// Returns true if the labels were fetched, whatever the operation outcomes.
    pub fn was_fetched(&self) -> bool {
        self.fetch_error.is_none()
    }

    pub fn is_success(&self) -> bool {
        self.failures() == 0
    }
}

/// Reconciles repositories against a desired label set.
///
/// Borrows the label client for the lifetime of a run; the mode and the dry-run
/// flag are fixed at construction.
pub struct Reconciler<'a> {
    client: &'a dyn LabelClient,
    mode: Mode,
    dry_run: bool,
}

impl<'a> Reconciler<'a> {
    pub fn new(client: &'a dyn LabelClient, mode: Mode, dry_run: bool) -> Self {
        Self {
            client,
            mode,
            dry_run,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Reconciles a single repository.
    ///
    /// The current labels are fetched even in a dry run. A fetch failure is
    /// returned as a report carrying `fetch_error`.
    ///
    /// # Errors
    ///
    /// Returns `LabelordError::Unauthorized` as soon as any call reports that the
    /// credential was rejected; the rest of the repository is not processed.
    #[instrument(
        skip(self, desired),
        fields(repo = %repo, mode = %self.mode, dry_run = self.dry_run)
    )]
    pub async fn reconcile(
        &self,
        repo: &str,
        desired: &LabelSet,
    ) -> LabelordResult<RepositoryReport> {
        let current: LabelSet = match self.client.list_labels(repo).await {
            Ok(labels) => labels.into_iter().collect(),
            Err(e) if e.is_unauthorized() => {
                error!(repo = repo, "Credential rejected while fetching labels");
                return Err(LabelordError::from_remote(e));
            }
            Err(e) => {
                warn!(
                    repo = repo,
                    status = ?e.status(),
                    error_message = e.message(),
                    "Failed to fetch repository labels"
                );
                return Ok(RepositoryReport::fetch_failed(repo, &e));
            }
        };

        let operations = plan(&current, desired, self.mode);
        let mut report = RepositoryReport::new(repo);
        report.unchanged = desired.len()
            - operations
                .iter()
                .filter(|op| op.kind != OperationKind::Delete)
                .count();

        debug!(
            repo = repo,
            planned = operations.len(),
            unchanged = report.unchanged,
            "Planned label operations"
        );

        for operation in operations {
            let outcome = if self.dry_run {
                OperationOutcome::Skipped
            } else {
                self.execute(repo, &operation).await?
            };

            report.records.push(OperationRecord {
                repo: repo.to_string(),
                kind: operation.kind,
                label: operation.label,
                outcome,
                dry_run: self.dry_run,
            });
        }

        info!(
            repo = repo,
            operations = report.records.len(),
            failures = report.failures(),
            "Repository reconciled"
        );

        Ok(report)
    }

    /// Performs one planned operation. Failures other than a rejected
    /// credential become a `Failed` outcome.
    async fn execute(
        &self,
        repo: &str,
        operation: &PlannedOperation,
    ) -> LabelordResult<OperationOutcome> {
        let target = operation
            .target
            .as_deref()
            .unwrap_or(operation.label.name.as_str());

        let result = match operation.kind {
            OperationKind::Add => self.client.create_label(repo, &operation.label).await,
            OperationKind::Update => {
                self.client
                    .update_label(repo, target, &operation.label)
                    .await
            }
            OperationKind::Delete => self.client.delete_label(repo, target).await,
        };

        match result {
            Ok(()) => Ok(OperationOutcome::success(operation.kind)),
            Err(e) if e.is_unauthorized() => {
                error!(repo = repo, "Credential rejected while changing labels");
                Err(LabelordError::from_remote(e))
            }
            Err(e) => {
                warn!(
                    repo = repo,
                    operation = operation.kind.tag(),
                    label = operation.label.name.as_str(),
                    status = ?e.status(),
                    error_message = e.message(),
                    "Label operation failed"
                );
                Ok(OperationOutcome::failed(&e))
            }
        }
    }
}
