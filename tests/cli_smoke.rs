mod support;

use assert_cmd::Command;
use predicates::str::contains;

use support::{CannedResponse, StubServer};
use taskdeck::error::exit_codes;

const UNREACHABLE: &str = "http://127.0.0.1:9/api";

#[test]
fn td_help_works() {
    Command::cargo_bin("td")
        .expect("binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("task API"));
}

#[test]
fn subcommand_help_works() {
    let subcommands = [
        "ui",
        "list",
        "add",
        "edit",
        "toggle",
        "rm",
        "categories",
        "stats",
    ];

    for cmd in subcommands {
        Command::cargo_bin("td")
            .expect("binary")
            .arg(cmd)
            .arg("--help")
            .assert()
            .success();
    }
}

#[test]
fn unreachable_api_fails_with_operation_exit_code() {
    Command::cargo_bin("td")
        .expect("binary")
        .args(["list", "--api-url", UNREACHABLE])
        .assert()
        .failure()
        .code(exit_codes::OPERATION_FAILED);
}

#[test]
fn empty_title_is_rejected_before_any_request() {
    // The API URL is unreachable on purpose: local validation has to fire
    // first, so no request is ever attempted.
    Command::cargo_bin("td")
        .expect("binary")
        .args(["add", "", "--due", "2025-01-01", "--api-url", UNREACHABLE])
        .assert()
        .failure()
        .code(exit_codes::USER_ERROR)
        .stderr(contains("Title is required"));
}

#[test]
fn malformed_due_date_is_rejected_locally() {
    Command::cargo_bin("td")
        .expect("binary")
        .args(["add", "Buy milk", "--due", "soon", "--api-url", UNREACHABLE])
        .assert()
        .failure()
        .code(exit_codes::USER_ERROR)
        .stderr(contains("due date must be YYYY-MM-DD"));
}

#[test]
fn invalid_priority_is_a_usage_error() {
    Command::cargo_bin("td")
        .expect("binary")
        .args([
            "add",
            "Buy milk",
            "--due",
            "2025-01-01",
            "--priority",
            "urgent",
            "--api-url",
            UNREACHABLE,
        ])
        .assert()
        .failure()
        .code(exit_codes::USER_ERROR);
}

#[test]
fn list_renders_json_envelope_from_live_server() {
    let server = StubServer::start(vec![CannedResponse::json(
        200,
        r#"[{
            "id": "1",
            "title": "Water the plants",
            "description": "",
            "priority": "high",
            "category": "home",
            "dueDate": "2025-06-01",
            "completed": false,
            "createdAt": "2025-01-01T00:00:00Z"
        }]"#,
    )]);

    Command::cargo_bin("td")
        .expect("binary")
        .args(["list", "--json", "--api-url", server.base_url()])
        .assert()
        .success()
        .stdout(contains("schema_version"))
        .stdout(contains("Water the plants"));

    server.finish();
}

#[test]
fn rm_without_confirmation_does_nothing() {
    Command::cargo_bin("td")
        .expect("binary")
        .args(["rm", "1", "--api-url", UNREACHABLE])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(contains("Cancelled"));
}
