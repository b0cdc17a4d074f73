use super::*;

#[test]
fn test_precondition_errors_have_distinct_exit_codes() {
    let codes = [
        LabelordError::MissingToken.exit_code(),
        LabelordError::MissingLabels.exit_code(),
        LabelordError::MissingRepositories.exit_code(),
        LabelordError::MissingWebhookSecret.exit_code(),
        LabelordError::Unauthorized {
            message: "Bad credentials".to_string(),
        }
        .exit_code(),
        LabelordError::RepositoryNotFound {
            repo: "octocat/missing".to_string(),
            message: "Not Found".to_string(),
        }
        .exit_code(),
        EXIT_OPERATION_FAILURE,
    ];

    let mut unique = codes.to_vec();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(unique.len(), codes.len(), "Exit codes must be distinct");
    assert!(!codes.contains(&EXIT_SUCCESS));
}

#[test]
fn test_exit_code_values() {
    assert_eq!(LabelordError::Config("bad".to_string()).exit_code(), 1);
    assert_eq!(LabelordError::MissingToken.exit_code(), 3);
    assert_eq!(
        LabelordError::Unauthorized {
            message: String::new()
        }
        .exit_code(),
        4
    );
    assert_eq!(LabelordError::MissingLabels.exit_code(), 6);
    assert_eq!(LabelordError::MissingRepositories.exit_code(), 7);
    assert_eq!(LabelordError::MissingWebhookSecret.exit_code(), 8);
    assert_eq!(
        LabelordError::Remote(github_client::Error::Transport("down".to_string())).exit_code(),
        10
    );
}

#[test]
fn test_unauthorized_display_matches_github_format() {
    let error = LabelordError::Unauthorized {
        message: "Bad credentials".to_string(),
    };

    assert_eq!(error.to_string(), "GitHub: ERROR 401 - Bad credentials");
}

#[test]
fn test_from_remote_promotes_unauthorized() {
    let error = LabelordError::from(github_client::Error::Unauthorized {
        message: "Bad credentials".to_string(),
    });

    assert_eq!(
        error,
        LabelordError::Unauthorized {
            message: "Bad credentials".to_string()
        }
    );
}

#[test]
fn test_from_remote_keeps_other_errors() {
    let remote = github_client::Error::Api {
        status: 500,
        message: "Server Error".to_string(),
    };

    let error = LabelordError::from(remote.clone());

    assert_eq!(error, LabelordError::Remote(remote));
    assert_eq!(error.exit_code(), EXIT_OPERATION_FAILURE);
}

#[test]
fn test_error_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<LabelordError>();
}
