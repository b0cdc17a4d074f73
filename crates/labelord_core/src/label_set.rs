//! Named label collections.

use std::collections::BTreeMap;

use github_client::Label;

#[cfg(test)]
#[path = "label_set_tests.rs"]
mod tests;

/// A set of labels keyed by name.
///
/// Names are unique as stored (case preserved). Iteration is in lexical order of
/// the stored names so every pass over a set is reproducible. Lookups that treat
/// `Bug` and `bug` as the same label go through [`LabelSet::find_ignore_case`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSet {
    labels: BTreeMap<String, String>,
}

impl LabelSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a label, replacing the color of an entry with the exact same name.
    pub fn insert(&mut self, name: impl Into<String>, color: impl Into<String>) {
        self.labels.insert(name.into(), color.into());
    }

    /// Returns the color stored under exactly `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.labels.get(name).map(String::as_str)
    }

    /// Finds the entry matching `name` regardless of case.
    ///
    /// An exact match wins; otherwise the first case-insensitive match in lexical
    /// order is returned as `(stored_name, color)`.
    pub fn find_ignore_case(&self, name: &str) -> Option<(&str, &str)> {
        if let Some((stored, color)) = self.labels.get_key_value(name) {
            return Some((stored.as_str(), color.as_str()));
        }

        let wanted = name.to_lowercase();
        self.labels
            .iter()
            .find(|(stored, _)| stored.to_lowercase() == wanted)
            .map(|(stored, color)| (stored.as_str(), color.as_str()))
    }

    /// Returns `true` when some entry matches `name` regardless of case.
    pub fn contains_ignore_case(&self, name: &str) -> bool {
        self.find_ignore_case(name).is_some()
    }

    /// Iterates over `(name, color)` pairs in lexical order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.labels.iter().map(|(n, c)| (n.as_str(), c.as_str()))
    }

    /// Iterates over the stored names in lexical order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.labels.keys().map(String::as_str)
    }

    /// Iterates over the entries as owned [`Label`] values.
    pub fn labels(&self) -> impl Iterator<Item = Label> + '_ {
        self.iter().map(|(name, color)| Label::new(name, color))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl FromIterator<Label> for LabelSet {
    fn from_iter<I: IntoIterator<Item = Label>>(iter: I) -> Self {
        Self {
            labels: iter.into_iter().map(|l| (l.name, l.color)).collect(),
        }
    }
}

impl From<BTreeMap<String, String>> for LabelSet {
    fn from(labels: BTreeMap<String, String>) -> Self {
        Self { labels }
    }
}
