//! Helpers shared by the command tests.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use github_client::{create_token_client, GitHubClient};
use labelord_core::{Reporter, Verbosity};
use serde_json::json;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

/// Client talking to `mock_server`.
pub fn client(mock_server: &MockServer) -> GitHubClient {
    let octocrab = create_token_client("ghp_test_token", Some(&mock_server.uri()))
        .expect("Failed to build test client");
    GitHubClient::new(octocrab)
}

/// Serves a single page of labels for `repo`.
pub async fn mount_labels(mock_server: &MockServer, repo: &str, labels: &[(&str, &str)]) {
    let body: Vec<_> = labels
        .iter()
        .map(|(name, color)| json!({ "name": name, "color": color }))
        .collect();

    Mock::given(method("GET"))
        .and(path(format!("/repos/{}/labels", repo)))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(mock_server)
        .await;
}

/// Answers every request for `route` with `status` and a GitHub error body.
pub async fn mount_error(
    mock_server: &MockServer,
    http_method: &str,
    route: &str,
    status: u16,
    message: &str,
) {
    Mock::given(method(http_method))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({ "message": message })))
        .mount(mock_server)
        .await;
}

/// In-memory output sink that can be read back after being handed out.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn capture_reporter(verbosity: Verbosity) -> (Reporter, SharedBuffer, SharedBuffer) {
    let out = SharedBuffer::default();
    let err = SharedBuffer::default();
    let reporter = Reporter::new(verbosity, Box::new(out.clone()), Box::new(err.clone()));
    (reporter, out, err)
}
