//! # Models
//!
//! Wire models for GitHub API responses that are only partially consumed.
//!
//! GitHub returns large documents for repositories; these types pick out the
//! fields labelord needs and ignore the rest.

use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;

/// Represents a GitHub repository as returned by the repository listing endpoints.
///
/// # Examples
///
/// ```rust
/// use github_client::models::Repository;
///
/// let repo: Repository = serde_json::from_str(
///     r#"{"id": 1296269, "name": "Hello-World", "full_name": "octocat/Hello-World"}"#,
/// ).unwrap();
///
/// assert_eq!(repo.full_name(), "octocat/Hello-World");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Repository {
    /// The full name of the repository (owner/name)
    full_name: String,
}

impl Repository {
    /// Returns the `owner/name` slug of the repository.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }
}

impl From<Repository> for String {
    fn from(value: Repository) -> Self {
        value.full_name
    }
}

/// Query parameters for a page of a paginated listing.
#[derive(Debug, Clone, Copy)]
pub struct PageParameters {
    /// Number of items per page
    pub per_page: usize,

    /// One-based page number
    pub page: u32,
}

impl PageParameters {
    /// Appends the parameters to `route` as a query string.
    pub fn apply(&self, route: &str) -> String {
        format!("{}?{}", route, self)
    }
}

impl fmt::Display for PageParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "per_page={}&page={}", self.per_page, self.page)
    }
}
