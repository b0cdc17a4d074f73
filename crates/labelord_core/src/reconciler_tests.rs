use super::*;
use crate::test_support::{api_error, label_set, Call, MockLabelClient};

const REPO: &str = "octocat/hello";

#[test]
fn test_plan_adds_missing_label() {
    let operations = plan(
        &LabelSet::new(),
        &label_set(&[("bug", "ff0000")]),
        Mode::Update,
    );

    assert_eq!(
        operations,
        vec![PlannedOperation::add(Label::new("bug", "ff0000"))]
    );
}

#[test]
fn test_plan_case_difference_triggers_update_of_stored_name() {
    let operations = plan(
        &label_set(&[("bug", "ff0000")]),
        &label_set(&[("Bug", "ff0000")]),
        Mode::Update,
    );

    assert_eq!(
        operations,
        vec![PlannedOperation::update("bug", Label::new("Bug", "ff0000"))]
    );
}

#[test]
fn test_plan_color_difference_triggers_update() {
    let operations = plan(
        &label_set(&[("bug", "000000")]),
        &label_set(&[("bug", "ff0000")]),
        Mode::Update,
    );

    assert_eq!(
        operations,
        vec![PlannedOperation::update("bug", Label::new("bug", "ff0000"))]
    );
}

#[test]
fn test_plan_identical_sets_produce_nothing() {
    let labels = label_set(&[("bug", "ff0000"), ("docs", "0075ca")]);

    assert!(plan(&labels, &labels, Mode::Update).is_empty());
    assert!(plan(&labels, &labels, Mode::Replace).is_empty());
}

#[test]
fn test_plan_replace_deletes_extras_only_in_replace_mode() {
    let current = label_set(&[("A", "ff0000"), ("B", "00ff00")]);
    let desired = label_set(&[("A", "ff0000")]);

    assert!(plan(&current, &desired, Mode::Update).is_empty());
    assert_eq!(
        plan(&current, &desired, Mode::Replace),
        vec![PlannedOperation::delete(Label::new("B", "00ff00"))]
    );
}

#[test]
fn test_plan_replace_keeps_label_differing_only_in_case() {
    let current = label_set(&[("bug", "ff0000")]);
    let desired = label_set(&[("Bug", "ff0000")]);

    let operations = plan(&current, &desired, Mode::Replace);

    assert_eq!(operations.len(), 1);
    assert_eq!(operations[0].kind, OperationKind::Update);
}

#[test]
fn test_plan_deletes_come_after_adds_and_updates() {
    let current = label_set(&[("a-old", "111111"), ("bug", "000000"), ("z-old", "222222")]);
    let desired = label_set(&[("bug", "ff0000"), ("new", "00ff00")]);

    let kinds: Vec<OperationKind> = plan(&current, &desired, Mode::Replace)
        .into_iter()
        .map(|op| op.kind)
        .collect();

    assert_eq!(
        kinds,
        vec![
            OperationKind::Update,
            OperationKind::Add,
            OperationKind::Delete,
            OperationKind::Delete
        ]
    );
}

#[test]
fn test_plan_order_is_lexical() {
    let desired = label_set(&[("zeta", "000000"), ("alpha", "000000"), ("mid", "000000")]);

    let names: Vec<String> = plan(&LabelSet::new(), &desired, Mode::Update)
        .into_iter()
        .map(|op| op.label.name)
        .collect();

    assert_eq!(names, vec!["alpha", "mid", "zeta"]);
}

#[tokio::test]
async fn test_reconcile_adds_missing_label() {
    let client = MockLabelClient::new().with_labels(REPO, &[]);
    let reconciler = Reconciler::new(&client, Mode::Update, false);

    let report = reconciler
        .reconcile(REPO, &label_set(&[("bug", "ff0000")]))
        .await
        .unwrap();

    assert_eq!(
        client.mutations(),
        vec![Call::Create(REPO.to_string(), Label::new("bug", "ff0000"))]
    );
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].outcome, OperationOutcome::Added);
    assert!(report.is_success());
}

#[tokio::test]
async fn test_reconcile_case_correcting_update() {
    let client = MockLabelClient::new().with_labels(REPO, &[("bug", "ff0000")]);
    let reconciler = Reconciler::new(&client, Mode::Update, false);

    reconciler
        .reconcile(REPO, &label_set(&[("Bug", "ff0000")]))
        .await
        .unwrap();

    assert_eq!(
        client.mutations(),
        vec![Call::Update(
            REPO.to_string(),
            "bug".to_string(),
            Label::new("Bug", "ff0000")
        )]
    );
}

#[tokio::test]
async fn test_reconcile_replace_issues_single_delete() {
    let client = MockLabelClient::new().with_labels(REPO, &[("A", "ff0000"), ("B", "00ff00")]);
    let desired = label_set(&[("A", "ff0000")]);

    let report = Reconciler::new(&client, Mode::Replace, false)
        .reconcile(REPO, &desired)
        .await
        .unwrap();

    assert_eq!(
        client.mutations(),
        vec![Call::Delete(REPO.to_string(), "B".to_string())]
    );
    assert_eq!(report.records[0].outcome, OperationOutcome::Deleted);
    assert_eq!(report.unchanged, 1);
}

#[tokio::test]
async fn test_reconcile_update_mode_never_deletes() {
    let client = MockLabelClient::new().with_labels(REPO, &[("A", "ff0000"), ("B", "00ff00")]);

    let report = Reconciler::new(&client, Mode::Update, false)
        .reconcile(REPO, &label_set(&[("A", "ff0000")]))
        .await
        .unwrap();

    assert!(client.mutations().is_empty());
    assert!(report.records.is_empty());
}

#[tokio::test]
async fn test_reconcile_second_update_run_is_noop() {
    let client = MockLabelClient::new()
        .with_labels(REPO, &[("bug", "000000"), ("Docs", "0075ca")])
        .applying_mutations();
    let desired = label_set(&[("bug", "ff0000"), ("docs", "0075ca"), ("new", "00ff00")]);
    let reconciler = Reconciler::new(&client, Mode::Update, false);

    let first = reconciler.reconcile(REPO, &desired).await.unwrap();
    assert_eq!(first.records.len(), 3);

    client.clear_calls();
    let second = reconciler.reconcile(REPO, &desired).await.unwrap();

    assert!(client.mutations().is_empty());
    assert!(second.records.is_empty());
    assert_eq!(second.unchanged, 3);
}

#[tokio::test]
async fn test_reconcile_continues_after_failed_operation() {
    let client = MockLabelClient::new()
        .with_labels(REPO, &[])
        .failing_mutation(REPO, "x-label", api_error(422, "Validation Failed"));
    let desired = label_set(&[("x-label", "ff0000"), ("y-label", "00ff00")]);

    let report = Reconciler::new(&client, Mode::Update, false)
        .reconcile(REPO, &desired)
        .await
        .unwrap();

    assert_eq!(client.mutations().len(), 2);
    assert_eq!(report.failures(), 1);
    assert_eq!(
        report.records[0].outcome,
        OperationOutcome::Failed {
            code: Some(422),
            message: "Validation Failed".to_string()
        }
    );
    assert_eq!(report.records[1].outcome, OperationOutcome::Added);
}

#[tokio::test]
async fn test_reconcile_dry_run_makes_no_mutation_calls() {
    let client = MockLabelClient::new().with_labels(REPO, &[("bug", "000000"), ("old", "111111")]);
    let desired = label_set(&[("bug", "ff0000"), ("new", "00ff00")]);

    let report = Reconciler::new(&client, Mode::Replace, true)
        .reconcile(REPO, &desired)
        .await
        .unwrap();

    assert_eq!(client.calls(), vec![Call::List(REPO.to_string())]);
    assert_eq!(report.records.len(), 3);
    assert!(report
        .records
        .iter()
        .all(|r| r.dry_run && r.outcome == OperationOutcome::Skipped));
    assert!(report.is_success());
}

#[tokio::test]
async fn test_reconcile_fetch_failure_is_repository_level() {
    let client = MockLabelClient::new().failing_list(REPO, api_error(404, "Not Found"));

    let report = Reconciler::new(&client, Mode::Update, false)
        .reconcile(REPO, &label_set(&[("bug", "ff0000")]))
        .await
        .unwrap();

    assert!(client.mutations().is_empty());
    assert_eq!(
        report.fetch_error,
        Some(FetchFailure {
            code: Some(404),
            message: "Not Found".to_string()
        })
    );
    assert_eq!(report.failures(), 1);
    assert!(!report.was_fetched());
}

#[tokio::test]
async fn test_reconcile_unauthorized_fetch_is_fatal() {
    let client = MockLabelClient::new().failing_list(REPO, api_error(401, "Bad credentials"));

    let result = Reconciler::new(&client, Mode::Update, false)
        .reconcile(REPO, &label_set(&[("bug", "ff0000")]))
        .await;

    assert_eq!(
        result,
        Err(LabelordError::Unauthorized {
            message: "Bad credentials".to_string()
        })
    );
}

#[tokio::test]
async fn test_reconcile_unauthorized_mutation_stops_processing() {
    let client = MockLabelClient::new()
        .with_labels(REPO, &[])
        .failing_mutation(REPO, "a", api_error(401, "Bad credentials"));
    let desired = label_set(&[("a", "ff0000"), ("b", "00ff00")]);

    let result = Reconciler::new(&client, Mode::Update, false)
        .reconcile(REPO, &desired)
        .await;

    assert!(matches!(result, Err(LabelordError::Unauthorized { .. })));
    assert_eq!(client.mutations().len(), 1);
}

#[tokio::test]
#[tracing_test::traced_test]
async fn test_reconcile_logs_failed_operation() {
    let client = MockLabelClient::new()
        .with_labels(REPO, &[("wontfix", "ffffff")])
        .failing_mutation(REPO, "wontfix", api_error(403, "Forbidden"));

    Reconciler::new(&client, Mode::Replace, false)
        .reconcile(REPO, &LabelSet::new())
        .await
        .unwrap();

    assert!(logs_contain("Label operation failed"));
    assert!(logs_contain("Forbidden"));
}
