//! Crate for interacting with the GitHub REST API labels endpoints.
//!
//! This crate provides the transport used by labelord: fetching the labels of a
//! repository (following pagination), creating, updating and deleting a single
//! label, and listing the repositories accessible to the authenticated user.
//! Authentication uses a personal access token.
//!
//! The [`LabelClient`] trait is the seam between the transport and the label
//! reconciliation logic. [`GitHubClient`] implements it on top of `octocrab`.

use async_trait::async_trait;
use octocrab::Octocrab;
use serde::{de::DeserializeOwned, Deserialize};
use tracing::{debug, info, instrument, warn};
use url::Url;

pub mod errors;
pub use errors::Error;

pub mod label;
pub use label::Label;

pub mod models;

// Reference the tests module in the separate file
#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Number of items requested per page from paginated endpoints.
///
/// A page holding fewer items than this is the last page.
pub const PAGE_SIZE: usize = 100;

/// Default base URI of the GitHub REST API.
pub const GITHUB_API_URI: &str = "https://api.github.com";

/// Label operations against repositories identified by their `owner/name` slug.
///
/// Each method is a single remote request (listings may span several pages).
/// No method retries; a failure is returned to the caller as is.
#[async_trait]
pub trait LabelClient: Send + Sync {
    /// Fetches every label defined on the repository.
    ///
    /// Follows pagination until a page returns fewer than [`PAGE_SIZE`] labels.
    ///
    /// # Errors
    ///
    /// - `Error::Unauthorized` when the credential is rejected
    /// - `Error::NotFound` when the repository is not accessible
    /// - `Error::Api` / `Error::Transport` for any other failure
    async fn list_labels(&self, repo: &str) -> Result<Vec<Label>, Error>;

    /// Creates a new label. Succeeds only when GitHub answers `201 Created`.
    async fn create_label(&self, repo: &str, label: &Label) -> Result<(), Error>;

    /// Renames and/or recolors the label currently stored as `existing_name`.
    /// Succeeds only when GitHub answers `200 OK`.
    async fn update_label(&self, repo: &str, existing_name: &str, label: &Label)
        -> Result<(), Error>;

    /// Deletes the label named `name`. Succeeds only when GitHub answers `204 No Content`.
    async fn delete_label(&self, repo: &str, name: &str) -> Result<(), Error>;

    /// Lists the `owner/name` slugs of every repository accessible to the credential.
    async fn list_repositories(&self) -> Result<Vec<String>, Error>;
}

/// A client for interacting with the GitHub API, authenticated with a token.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Octocrab,
}

impl GitHubClient {
    /// Creates a new `GitHubClient` from an already configured `Octocrab` instance.
    ///
    /// The client is created once per run (or per server) and shared by reference;
    /// it carries the credential and the connection pool.
    pub fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Fetches every page of a paginated listing and concatenates the results.
    async fn get_all_pages<T>(&self, route: &str) -> Result<Vec<T>, Error>
    where
        T: DeserializeOwned + Send,
    {
        let mut items = Vec::new();
        let mut page = 1u32;

        loop {
            let params = models::PageParameters {
                per_page: PAGE_SIZE,
                page,
            };

            debug!(route = route, page = page, "Fetching page");
            let response = self.client._get(params.apply(route)).await?;
            let status = response.status().as_u16();
            let body = self.client.body_to_string(response).await?;

            // The status decides the outcome; the body only supplies the message.
            check_status(status, &body, 200).inspect_err(|err| {
                warn!(
                    route = route,
                    page = page,
                    status = ?err.status(),
                    error_message = err.message(),
                    "Failed to fetch page"
                );
            })?;

            let batch: Vec<T> = serde_json::from_str(&body).map_err(|e| {
                Error::Transport(format!("Malformed page {} of {}: {}", page, route, e))
            })?;

            let count = batch.len();
            items.extend(batch);

            if count < PAGE_SIZE {
                break;
            }
            page += 1;
        }

        Ok(items)
    }
}

#[async_trait]
impl LabelClient for GitHubClient {
    #[instrument(skip(self), fields(repo = %repo))]
    async fn list_labels(&self, repo: &str) -> Result<Vec<Label>, Error> {
        let route = format!("/repos/{}/labels", repo);
        let labels: Vec<Label> = self.get_all_pages(&route).await?;

        info!(repo = repo, count = labels.len(), "Fetched repository labels");
        Ok(labels)
    }

    #[instrument(skip(self, label), fields(repo = %repo, label = %label.name))]
    async fn create_label(&self, repo: &str, label: &Label) -> Result<(), Error> {
        let route = format!("/repos/{}/labels", repo);
        let response = self.client._post(route.as_str(), Some(label)).await?;
        let status = response.status().as_u16();
        let body = self.client.body_to_string(response).await?;

        check_status(status, &body, 201)
    }

    #[instrument(
        skip(self, label),
        fields(repo = %repo, existing = %existing_name, label = %label.name)
    )]
    async fn update_label(
        &self,
        repo: &str,
        existing_name: &str,
        label: &Label,
    ) -> Result<(), Error> {
        let route = format!(
            "/repos/{}/labels/{}",
            repo,
            encode_path_segment(existing_name)?
        );
        let response = self.client._patch(route.as_str(), Some(label)).await?;
        let status = response.status().as_u16();
        let body = self.client.body_to_string(response).await?;

        check_status(status, &body, 200)
    }

    #[instrument(skip(self), fields(repo = %repo, label = %name))]
    async fn delete_label(&self, repo: &str, name: &str) -> Result<(), Error> {
        let route = format!("/repos/{}/labels/{}", repo, encode_path_segment(name)?);
        let response = self.client._delete(route.as_str(), None::<&()>).await?;
        let status = response.status().as_u16();
        let body = self.client.body_to_string(response).await?;

        check_status(status, &body, 204)
    }

    #[instrument(skip(self))]
    async fn list_repositories(&self) -> Result<Vec<String>, Error> {
        let repositories: Vec<models::Repository> = self.get_all_pages("/user/repos").await?;

        info!(
            count = repositories.len(),
            "Fetched accessible repositories"
        );
        Ok(repositories.into_iter().map(String::from).collect())
    }
}

/// GitHub error document; only the message is of interest.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Maps a raw mutation response to the operation result.
///
/// `expected` is the single status code that counts as success. Any other success
/// code is reported as `Error::UnexpectedStatus`; failure codes carry the message
/// GitHub sent in the body, or an empty message when the body has none.
fn check_status(status: u16, body: &str, expected: u16) -> Result<(), Error> {
    if status == expected {
        return Ok(());
    }

    if (200..300).contains(&status) {
        warn!(status = status, expected = expected, "Unexpected success status");
        return Err(Error::UnexpectedStatus { status });
    }

    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_default();

    warn!(
        status = status,
        error_message = message.as_str(),
        "GitHub rejected the request"
    );
    Err(Error::from_status(status, message))
}

/// Percent-encodes a label name so it can be used as a single URL path segment.
fn encode_path_segment(segment: &str) -> Result<String, Error> {
    let mut url = Url::parse(GITHUB_API_URI).map_err(|e| Error::Transport(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| Error::Transport("GitHub API URI cannot be a base".to_string()))?
        .pop_if_empty()
        .push(segment);

    Ok(url.path().trim_start_matches('/').to_string())
}

/// Creates an `Octocrab` client authenticated with a personal access token.
///
/// # Arguments
///
/// * `token` - The GitHub token. It is never logged.
/// * `base_uri` - Optional API root, for GitHub Enterprise or tests. Defaults to
///   [`GITHUB_API_URI`].
///
/// # Errors
///
/// Returns `Error::Transport` if the base URI is invalid or the client cannot be built.
#[instrument(skip(token))]
pub fn create_token_client(token: &str, base_uri: Option<&str>) -> Result<Octocrab, Error> {
    let mut builder = Octocrab::builder().personal_token(token.to_string());

    if let Some(uri) = base_uri {
        builder = builder
            .base_uri(uri)
            .map_err(|e| Error::Transport(format!("Invalid GitHub API URI '{}': {}", uri, e)))?;
    }

    builder
        .build()
        .map_err(|e| Error::Transport(format!("Failed to build GitHub client: {}", e)))
}
