//! Fan-out of a single label change to the other configured repositories.
//!
//! No labels are fetched here: the event describes a change that already
//! happened on the origin repository and it is replayed as is on every other
//! repository. Repositories that were already out of sync for other reasons are
//! only corrected by a full run.

use github_client::{Label, LabelClient};
use tracing::{info, instrument, warn};

use crate::operation::{OperationKind, OperationOutcome, OperationRecord};
use crate::webhook::LabelWebhookPayload;

#[cfg(test)]
#[path = "event_adapter_tests.rs"]
mod tests;

/// The change a label event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelEventKind {
    Created,
    Edited,
    Deleted,
}

impl LabelEventKind {
    /// Parses the `action` field of a GitHub `label` event.
    pub fn from_action(action: &str) -> Option<Self> {
        match action {
            "created" => Some(LabelEventKind::Created),
            "edited" => Some(LabelEventKind::Edited),
            "deleted" => Some(LabelEventKind::Deleted),
            _ => None,
        }
    }

    fn operation(&self) -> OperationKind {
        match self {
            LabelEventKind::Created => OperationKind::Add,
            LabelEventKind::Edited => OperationKind::Update,
            LabelEventKind::Deleted => OperationKind::Delete,
        }
    }
}

/// A normalized label event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEvent {
    pub kind: LabelEventKind,

    /// Repository on which the change happened.
    pub origin: String,

    /// The label after the change (for deletions, the deleted label).
    pub label: Label,

    /// Name before a rename; only set for edits that renamed the label.
    pub previous_name: Option<String>,
}

impl LabelEvent {
    /// Builds an event from a `label` webhook payload. Returns `None` for
    /// actions other than `created`, `edited` and `deleted`.
    pub fn from_payload(payload: &LabelWebhookPayload) -> Option<Self> {
        let kind = LabelEventKind::from_action(&payload.action)?;
        let previous_name = match kind {
            LabelEventKind::Edited => payload
                .changes
                .as_ref()
                .and_then(|c| c.name.as_ref())
                .map(|n| n.from.clone()),
            _ => None,
        };

        Some(Self {
            kind,
            origin: payload.repository.full_name.clone(),
            label: Label::new(payload.label.name.as_str(), payload.label.color.as_str()),
            previous_name,
        })
    }

    /// Name the label has on repositories that have not seen the change yet.
    pub fn target_name(&self) -> &str {
        self.previous_name.as_deref().unwrap_or(&self.label.name)
    }
}

/// Outcomes of one fan-out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventReport {
    pub records: Vec<OperationRecord>,
}

impl EventReport {
    pub fn failures(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.outcome.is_failure())
            .count()
    }

    pub fn is_success(&self) -> bool {
        self.failures() == 0
    }
}

/// Replays label events on repositories.
pub struct EventAdapter<'a> {
    client: &'a dyn LabelClient,
}

impl<'a> EventAdapter<'a> {
    pub fn new(client: &'a dyn LabelClient) -> Self {
        Self { client }
    }

    /// Applies `event` to every repository in `repos` except its origin,
    /// sequentially and in list order. Failures are logged and recorded; they
    /// never stop the fan-out.
    #[instrument(
        skip(self, event, repos),
        fields(origin = %event.origin, label = %event.label.name, kind = ?event.kind)
    )]
    pub async fn apply(&self, event: &LabelEvent, repos: &[String]) -> EventReport {
        let mut report = EventReport::default();
        let kind = event.kind.operation();

        for repo in repos.iter().filter(|r| **r != event.origin) {
            let result = match event.kind {
                LabelEventKind::Created => self.client.create_label(repo, &event.label).await,
                LabelEventKind::Edited => {
                    self.client
                        .update_label(repo, event.target_name(), &event.label)
                        .await
                }
                LabelEventKind::Deleted => {
                    self.client.delete_label(repo, &event.label.name).await
                }
            };

            let outcome = match result {
                Ok(()) => OperationOutcome::success(kind),
                Err(e) => {
                    warn!(
                        repo = repo.as_str(),
                        operation = kind.tag(),
                        status = ?e.status(),
                        error_message = e.message(),
                        "Failed to propagate label change"
                    );
                    OperationOutcome::failed(&e)
                }
            };

            report.records.push(OperationRecord {
                repo: repo.clone(),
                kind,
                label: event.label.clone(),
                outcome,
                dry_run: false,
            });
        }

        info!(
            repositories = report.records.len(),
            failures = report.failures(),
            "Label change propagated"
        );

        report
    }
}
