use super::*;
use crate::test_support;
use serde_json::json;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

#[tokio::test]
async fn test_lists_every_page() {
    let mock_server = MockServer::start().await;
    let first_page: Vec<_> = (0..100)
        .map(|i| json!({ "full_name": format!("org/repo-{:03}", i) }))
        .collect();

    Mock::given(method("GET"))
        .and(path("/user/repos"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(first_page))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user/repos"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "full_name": "org/last" }
        ])))
        .mount(&mock_server)
        .await;

    let client = test_support::client(&mock_server);
    let mut out = Vec::new();

    list_repositories(&client, &mut out).await.unwrap();

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 101);
    assert_eq!(lines[0], "org/repo-000");
    assert_eq!(lines[100], "org/last");
}

#[tokio::test]
async fn test_listing_failure_exits_with_operation_failure() {
    let mock_server = MockServer::start().await;
    test_support::mount_error(&mock_server, "GET", "/user/repos", 500, "Server Error").await;

    let client = test_support::client(&mock_server);
    let mut out = Vec::new();

    let err = list_repositories(&client, &mut out).await.unwrap_err();

    assert_eq!(err.exit_code(), 10);
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_rejected_token() {
    let mock_server = MockServer::start().await;
    test_support::mount_error(&mock_server, "GET", "/user/repos", 401, "Bad credentials").await;

    let client = test_support::client(&mock_server);
    let mut out = Vec::new();

    let err = list_repositories(&client, &mut out).await.unwrap_err();

    assert_eq!(err.to_string(), "GitHub: ERROR 401 - Bad credentials");
    assert_eq!(err.exit_code(), 4);
}
