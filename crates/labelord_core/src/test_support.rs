//! In-memory label client for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use github_client::{Error, Label, LabelClient};

/// A call received by [`MockLabelClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List(String),
    Create(String, Label),
    Update(String, String, Label),
    Delete(String, String),
    ListRepositories,
}

/// Serves canned labels and records every call. Mutations do not change the
/// canned state unless `apply_mutations` is set.
#[derive(Default)]
pub struct MockLabelClient {
    labels: Mutex<HashMap<String, Vec<Label>>>,
    repositories: Vec<String>,
    list_failures: HashMap<String, Error>,
    mutation_failures: HashMap<(String, String), Error>,
    repositories_failure: Option<Error>,
    apply_mutations: bool,
    calls: Mutex<Vec<Call>>,
}

impl MockLabelClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_labels(self, repo: &str, labels: &[(&str, &str)]) -> Self {
        self.labels.lock().unwrap().insert(
            repo.to_string(),
            labels.iter().map(|(n, c)| Label::new(*n, *c)).collect(),
        );
        self
    }

    pub fn with_repositories(mut self, repos: &[&str]) -> Self {
        self.repositories = repos.iter().map(|r| r.to_string()).collect();
        self
    }

    pub fn failing_list(mut self, repo: &str, error: Error) -> Self {
        self.list_failures.insert(repo.to_string(), error);
        self
    }

    /// Makes any mutation of `label` (by target name) on `repo` fail.
    pub fn failing_mutation(mut self, repo: &str, label: &str, error: Error) -> Self {
        self.mutation_failures
            .insert((repo.to_string(), label.to_string()), error);
        self
    }

    pub fn failing_repositories(mut self, error: Error) -> Self {
        self.repositories_failure = Some(error);
        self
    }

    /// Successful mutations are applied to the canned labels.
    pub fn applying_mutations(mut self) -> Self {
        self.apply_mutations = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls other than label listings.
    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::List(_) | Call::ListRepositories))
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn mutation_result(&self, repo: &str, name: &str) -> Result<(), Error> {
        match self
            .mutation_failures
            .get(&(repo.to_string(), name.to_string()))
        {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    fn mutate(&self, repo: &str, f: impl FnOnce(&mut Vec<Label>)) {
        if self.apply_mutations {
            let mut labels = self.labels.lock().unwrap();
            f(labels.entry(repo.to_string()).or_default());
        }
    }
}

#[async_trait]
impl LabelClient for MockLabelClient {
    async fn list_labels(&self, repo: &str) -> Result<Vec<Label>, Error> {
        self.record(Call::List(repo.to_string()));
        if let Some(e) = self.list_failures.get(repo) {
            return Err(e.clone());
        }
        Ok(self
            .labels
            .lock()
            .unwrap()
            .get(repo)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_label(&self, repo: &str, label: &Label) -> Result<(), Error> {
        self.record(Call::Create(repo.to_string(), label.clone()));
        self.mutation_result(repo, &label.name)?;
        self.mutate(repo, |labels| labels.push(label.clone()));
        Ok(())
    }

    async fn update_label(
        &self,
        repo: &str,
        existing_name: &str,
        label: &Label,
    ) -> Result<(), Error> {
        self.record(Call::Update(
            repo.to_string(),
            existing_name.to_string(),
            label.clone(),
        ));
        self.mutation_result(repo, existing_name)?;
        self.mutate(repo, |labels| {
            if let Some(existing) = labels.iter_mut().find(|l| l.name == existing_name) {
                *existing = label.clone();
            }
        });
        Ok(())
    }

    async fn delete_label(&self, repo: &str, name: &str) -> Result<(), Error> {
        self.record(Call::Delete(repo.to_string(), name.to_string()));
        self.mutation_result(repo, name)?;
        self.mutate(repo, |labels| labels.retain(|l| l.name != name));
        Ok(())
    }

    async fn list_repositories(&self) -> Result<Vec<String>, Error> {
        self.record(Call::ListRepositories);
        match &self.repositories_failure {
            Some(e) => Err(e.clone()),
            None => Ok(self.repositories.clone()),
        }
    }
}

pub fn label_set(labels: &[(&str, &str)]) -> crate::LabelSet {
    labels.iter().map(|(n, c)| Label::new(*n, *c)).collect()
}

pub fn api_error(status: u16, message: &str) -> Error {
    Error::from_status(status, message)
}

/// A `Write` sink whose content stays readable after being boxed into a reporter.
#[derive(Clone, Default)]
pub struct SharedBuffer(std::sync::Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl std::io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Reporter writing into two buffers: (reporter, stdout, stderr).
pub fn capture_reporter(
    verbosity: crate::Verbosity,
) -> (crate::Reporter, SharedBuffer, SharedBuffer) {
    let out = SharedBuffer::new();
    let err = SharedBuffer::new();
    let reporter = crate::Reporter::new(verbosity, Box::new(out.clone()), Box::new(err.clone()));
    (reporter, out, err)
}
