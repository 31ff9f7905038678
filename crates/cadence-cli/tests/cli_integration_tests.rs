use predicates::prelude::*;

mod helpers;
use helpers::{CliTestHarness, OTHER_USER};

#[test]
fn test_help_and_version() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&["--help"])
        .stdout(predicate::str::contains("Recurring task scheduler"))
        .stdout(predicate::str::contains("occurrences"))
        .stdout(predicate::str::contains("agenda"));

    harness
        .run_success(&["--version"])
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_add_plain_task() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&["add", "Buy milk"])
        .stdout(predicate::str::contains("Created task"))
        .stdout(predicate::str::contains("Buy milk"));

    harness
        .run_success(&["list"])
        .stdout(predicate::str::contains("Buy milk"));
}

#[test]
fn test_add_recurring_task_json() {
    let harness = CliTestHarness::new();

    let task = harness.run_json(&[
        "add",
        "Water plants",
        "--due",
        "2024-01-01T00:00:00Z",
        "--every",
        "2",
        "--unit",
        "weeks",
    ]);

    assert_eq!(task["title"], "Water plants");
    assert_eq!(task["repeat_every"], 2);
    assert_eq!(task["repeat_unit"], "week");
    assert!(task["next_due_at"].is_string());
}

#[test]
fn test_first_week_of_daily_occurrences() {
    let harness = CliTestHarness::new();
    let task_id = harness.add_daily_task("Stretch");

    let occurrences = harness.run_json(&[
        "occurrences",
        &task_id,
        "--from",
        "2024-01-01T00:00:00Z",
        "--to",
        "2024-01-08T00:00:00Z",
    ]);
    let occurrences = occurrences.as_array().expect("array of occurrences");

    assert_eq!(occurrences.len(), 8);
    assert_eq!(occurrences[0]["due_at"], "2024-01-01T00:00:00Z");
    assert_eq!(occurrences[7]["due_at"], "2024-01-08T00:00:00Z");
    assert!(occurrences.iter().all(|o| o["completed"] == false));
}

#[test]
fn test_complete_and_undo_occurrence() {
    let harness = CliTestHarness::new();
    let task_id = harness.add_daily_task("Stretch");

    let occurrences = harness.run_json(&[
        "occurrences",
        &task_id,
        "--from",
        "2024-01-01T00:00:00Z",
        "--to",
        "2024-01-03T00:00:00Z",
    ]);
    let occurrence_id = occurrences[0]["id"].as_str().unwrap().to_string();

    let completed = harness.run_json(&["complete", &task_id, &occurrence_id]);
    assert_eq!(completed["completed"], true);
    assert!(completed["completed_at"].is_string());

    harness
        .run_success(&["complete", &task_id, &occurrence_id])
        .stdout(predicate::str::contains("Completed occurrence due 2024-01-01"));

    let reopened = harness.run_json(&["complete", &task_id, &occurrence_id, "--undo"]);
    assert_eq!(reopened["completed"], false);
    assert!(reopened["completed_at"].is_null());
}

#[test]
fn test_default_listing_starts_now() {
    let harness = CliTestHarness::new();
    let task_id = harness.add_daily_task("Stretch");
    let task = harness.run_json(&["show", &task_id]);

    let occurrences = harness.run_json(&["occurrences", &task_id]);
    let occurrences = occurrences.as_array().expect("array of occurrences");

    assert!(!occurrences.is_empty());
    assert_eq!(occurrences[0]["due_at"], task["next_due_at"]);

    harness
        .run_failure(&["occurrences", &task_id, "--to", "2024-01-08T00:00:00Z"])
        .stderr(predicate::str::contains("'to' must be after 'from'"));
}

#[test]
fn test_every_without_unit_is_rejected() {
    let harness = CliTestHarness::new();

    harness
        .run_failure(&["add", "Broken", "--due", "2024-01-01T00:00:00Z", "--every", "1"])
        .stderr(predicate::str::contains("must be set together"));
}

#[test]
fn test_zero_interval_is_rejected() {
    let harness = CliTestHarness::new();

    harness
        .run_failure(&["add", "Broken", "--due", "2024-01-01T00:00:00Z", "--every", "0", "--unit", "day"])
        .stderr(predicate::str::contains("Invalid input"));
}

#[test]
fn test_plain_task_has_no_occurrences() {
    let harness = CliTestHarness::new();
    let task = harness.run_json(&["add", "Buy milk"]);
    let task_id = task["id"].as_str().unwrap();

    harness
        .run_failure(&["occurrences", task_id])
        .stderr(predicate::str::contains("task not found"));
}

#[test]
fn test_other_user_cannot_see_task() {
    let harness = CliTestHarness::new();
    let task_id = harness.add_daily_task("Private");

    harness
        .command_as(OTHER_USER)
        .args(["show", &task_id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("task not found"));
}

#[test]
fn test_delete_with_force() {
    let harness = CliTestHarness::new();
    let task_id = harness.add_daily_task("Temporary");

    harness
        .run_success(&["delete", &task_id, "--force"])
        .stdout(predicate::str::contains("Deleted task: 'Temporary'"));

    harness
        .run_failure(&["show", &task_id])
        .stderr(predicate::str::contains("task not found"));
}

#[test]
fn test_agenda_lists_plain_and_recurring() {
    let harness = CliTestHarness::new();
    harness.run_success(&["add", "Pay rent", "--due", "2024-01-03T09:00:00Z"]);
    harness.add_daily_task("Stretch");

    let agenda = harness.run_json(&["agenda", "--from", "2024-01-02T00:00:00Z", "--to", "2024-01-05T00:00:00Z"]);
    let items = agenda.as_array().expect("array of agenda items");

    let plain: Vec<_> = items.iter().filter(|item| item["kind"] == "task").collect();
    let occurrences: Vec<_> = items.iter().filter(|item| item["kind"] == "occurrence").collect();
    assert_eq!(plain.len(), 1);
    assert_eq!(plain[0]["title"], "Pay rent");
    assert_eq!(occurrences.len(), 4);
}

#[test]
fn test_list_json() {
    let harness = CliTestHarness::new();
    harness.add_daily_task("One");
    harness.run_success(&["add", "Two"]);

    let tasks = harness.run_json(&["list"]);
    assert_eq!(tasks.as_array().map(Vec::len), Some(2));
}

#[test]
fn test_invalid_id() {
    let harness = CliTestHarness::new();

    harness
        .run_failure(&["show", "not-a-uuid"])
        .stderr(predicate::str::contains("'not-a-uuid' is not a valid task id"));
}
