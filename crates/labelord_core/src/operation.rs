//! Reconciliation modes, planned operations and their outcomes.

use std::fmt;

use github_client::Label;

#[cfg(test)]
#[path = "operation_tests.rs"]
mod tests;

/// How far a run goes in enforcing the desired labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Add missing labels and fix mismatched ones. Never deletes.
    Update,
    /// `Update`, plus delete every label absent from the desired set.
    Replace,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Update => write!(f, "update"),
            Mode::Replace => write!(f, "replace"),
        }
    }
}

/// The kind of a single label mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OperationKind {
    Add,
    Update,
    Delete,
}

impl OperationKind {
    /// Categorical tag used in report lines.
    pub fn tag(&self) -> &'static str {
        match self {
            OperationKind::Add => "ADD",
            OperationKind::Update => "UPD",
            OperationKind::Delete => "DEL",
        }
    }
}

/// A mutation decided by the planner but not yet executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedOperation {
    pub kind: OperationKind,

    /// Name of the label as currently stored in the repository. Set for updates
    /// and deletes, `None` for additions.
    pub target: Option<String>,

    /// The label as it should look afterwards; for deletes, the label removed.
    pub label: Label,
}

impl PlannedOperation {
    pub fn add(label: Label) -> Self {
        Self {
            kind: OperationKind::Add,
            target: None,
            label,
        }
    }

    pub fn update(existing_name: impl Into<String>, label: Label) -> Self {
        Self {
            kind: OperationKind::Update,
            target: Some(existing_name.into()),
            label,
        }
    }

    pub fn delete(label: Label) -> Self {
        Self {
            kind: OperationKind::Delete,
            target: Some(label.name.clone()),
            label,
        }
    }
}

/// What happened to one (repository, label) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationOutcome {
    Added,
    Updated,
    Deleted,
    /// No call was made: the label already matched, or the run is a dry run.
    Skipped,
    /// The remote service refused the call. `code` is `None` for transport failures.
    Failed {
        code: Option<u16>,
        message: String,
    },
}

impl OperationOutcome {
    /// Outcome of a successful call of the given kind.
    pub fn success(kind: OperationKind) -> Self {
        match kind {
            OperationKind::Add => OperationOutcome::Added,
            OperationKind::Update => OperationOutcome::Updated,
            OperationKind::Delete => OperationOutcome::Deleted,
        }
    }

    pub fn failed(error: &github_client::Error) -> Self {
        OperationOutcome::Failed {
            code: error.status(),
            message: error.message().to_string(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, OperationOutcome::Failed { .. })
    }
}

/// The recorded result of one operation against one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRecord {
    pub repo: String,
    pub kind: OperationKind,
    pub label: Label,
    pub outcome: OperationOutcome,
    /// The operation was only simulated.
    pub dry_run: bool,
}
