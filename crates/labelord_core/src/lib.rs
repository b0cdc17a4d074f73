//! # labelord core
//!
//! Keeps GitHub labels consistent across a set of repositories.
//!
//! A run takes a desired label set (from a template repository or from the
//! configuration file) and a list of repositories, and for each repository adds
//! missing labels, fixes labels whose color or name casing differs and, in
//! replace mode, deletes labels that are not wanted. The webhook path replays a
//! single label change from one configured repository onto the others.
//!
//! ## Main types
//!
//! - [`RunOrchestrator`] - runs the reconciliation over every repository
//! - [`Reconciler`] / [`plan`] - the per-repository diff and its execution
//! - [`EventAdapter`] - fan-out of a webhook label event
//! - [`webhook::handle`] - framework-free webhook request handling
//! - [`LabelordConfig`] - the parsed configuration file
//!
//! ## Example
//!
//! ```rust,no_run
//! use github_client::{create_token_client, GitHubClient};
//! use labelord_core::{LabelordConfig, Mode, Reporter, RunOrchestrator, Verbosity};
//! use labelord_core::{DesiredLabelSource, RepositorySource};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = LabelordConfig::load(std::path::Path::new("config.toml"))?;
//! let token = config.resolve_token(None)?;
//! let client = GitHubClient::new(create_token_client(&token, None)?);
//!
//! let desired = DesiredLabelSource::select(None, &config)?.resolve(&client).await?;
//! let repos = RepositorySource::select(false, &config)?.resolve(&client).await?;
//!
//! let mut reporter = Reporter::stdio(Verbosity::Verbose);
//! let summary = RunOrchestrator::new(&client, Mode::Update, false, &mut reporter)
//!     .run(&repos, &desired)
//!     .await?;
//! std::process::exit(summary.exit_status().code());
//! # }
//! ```

pub mod config;
pub mod errors;
pub mod event_adapter;
pub mod label_set;
pub mod operation;
pub mod orchestrator;
pub mod reconciler;
pub mod report;
pub mod webhook;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::LabelordConfig;
pub use errors::{LabelordError, LabelordResult};
pub use event_adapter::{EventAdapter, EventReport, LabelEvent, LabelEventKind};
pub use github_client::{Label, LabelClient};
pub use label_set::LabelSet;
pub use operation::{Mode, OperationKind, OperationOutcome, OperationRecord, PlannedOperation};
pub use orchestrator::{
    DesiredLabelSource, ExitStatus, RepositorySource, RunOrchestrator, RunSummary,
};
pub use reconciler::{plan, FetchFailure, Reconciler, RepositoryReport};
pub use report::{Reporter, Verbosity};
pub use webhook::{DeliveryGuard, WebhookContext, WebhookRequest, WebhookResponse};
