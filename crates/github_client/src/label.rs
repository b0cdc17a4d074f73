//! Label domain types.
//!
//! This module contains the type representing a GitHub issue and pull request label,
//! as it is sent to and received from the labels endpoints.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "label_tests.rs"]
mod tests;

/// Represents a label defined on a repository.
///
/// The name is the identity of a label within a repository. The color is the
/// six hex digit string GitHub stores, without a leading `#`.
///
/// # Examples
///
/// ```
/// use github_client::Label;
///
/// let label = Label::new("bug", "d73a4a");
/// assert_eq!(label.name, "bug");
/// assert!(Label::is_valid_color(&label.color));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Label {
    /// The name of the label
    pub name: String,

    /// The color of the label as six hex digits
    pub color: String,
}

impl Label {
    /// Creates a new label.
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }

    /// Returns true if `color` is exactly six ASCII hex digits.
    pub fn is_valid_color(color: &str) -> bool {
        color.len() == 6 && color.chars().all(|c| c.is_ascii_hexdigit())
    }
}
