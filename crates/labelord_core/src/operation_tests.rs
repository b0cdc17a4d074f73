use super::*;

#[test]
fn test_mode_display_names() {
    assert_eq!(Mode::Update.to_string(), "update");
    assert_eq!(Mode::Replace.to_string(), "replace");
}

#[test]
fn test_operation_kind_tags() {
    assert_eq!(OperationKind::Add.tag(), "ADD");
    assert_eq!(OperationKind::Update.tag(), "UPD");
    assert_eq!(OperationKind::Delete.tag(), "DEL");
}

#[test]
fn test_planned_operation_targets() {
    let add = PlannedOperation::add(Label::new("bug", "ff0000"));
    assert_eq!(add.target, None);

    let update = PlannedOperation::update("bug", Label::new("Bug", "ff0000"));
    assert_eq!(update.target.as_deref(), Some("bug"));
    assert_eq!(update.label.name, "Bug");

    let delete = PlannedOperation::delete(Label::new("wontfix", "ffffff"));
    assert_eq!(delete.kind, OperationKind::Delete);
    assert_eq!(delete.target.as_deref(), Some("wontfix"));
}

#[test]
fn test_outcome_success_per_kind() {
    assert_eq!(
        OperationOutcome::success(OperationKind::Add),
        OperationOutcome::Added
    );
    assert_eq!(
        OperationOutcome::success(OperationKind::Update),
        OperationOutcome::Updated
    );
    assert_eq!(
        OperationOutcome::success(OperationKind::Delete),
        OperationOutcome::Deleted
    );
}

#[test]
fn test_outcome_failed_carries_status_and_message() {
    let error = github_client::Error::Api {
        status: 422,
        message: "Validation Failed".to_string(),
    };

    let outcome = OperationOutcome::failed(&error);

    assert_eq!(
        outcome,
        OperationOutcome::Failed {
            code: Some(422),
            message: "Validation Failed".to_string()
        }
    );
    assert!(outcome.is_failure());
    assert!(!OperationOutcome::Skipped.is_failure());
}

#[test]
fn test_outcome_failed_without_status() {
    let error = github_client::Error::Transport("connection reset".to_string());

    let outcome = OperationOutcome::failed(&error);

    match outcome {
        OperationOutcome::Failed { code, .. } => assert_eq!(code, None),
        other => panic!("Expected Failed, got {other:?}"),
    }
}
