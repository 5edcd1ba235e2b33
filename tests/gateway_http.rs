mod support;

use taskdeck::error::{exit_codes, Error};
use taskdeck::gateway::TaskGateway;
use taskdeck::task::{Priority, TaskDraft};

use support::{CannedResponse, StubServer};

fn task_json(id: &str, title: &str, completed: bool) -> String {
    format!(
        r#"{{
            "id": "{id}",
            "title": "{title}",
            "description": "",
            "priority": "medium",
            "category": "",
            "dueDate": "2025-06-01",
            "completed": {completed},
            "createdAt": "2025-01-01T00:00:00Z",
            "updatedAt": "2025-01-01T00:00:00Z"
        }}"#
    )
}

fn draft() -> TaskDraft {
    TaskDraft {
        title: "Buy milk".to_string(),
        description: String::new(),
        priority: Priority::Low,
        category: String::new(),
        due_date: chrono::NaiveDate::from_ymd_opt(2025, 1, 1).expect("date"),
        completed: false,
    }
}

#[test]
fn list_tasks_hits_collection_route() {
    let server = StubServer::start(vec![CannedResponse::json(
        200,
        format!("[{}]", task_json("1", "Buy milk", false)),
    )]);
    let gateway = TaskGateway::new(server.base_url());

    let tasks = gateway.list_tasks().expect("list");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, "1");
    assert_eq!(tasks[0].priority, Priority::Medium);

    let requests = server.finish();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/api/tasks/");
}

#[test]
fn create_posts_camel_case_draft_and_returns_record() {
    let server = StubServer::start(vec![CannedResponse::json(
        201,
        task_json("9", "Buy milk", false),
    )]);
    let gateway = TaskGateway::new(server.base_url());

    let task = gateway.create_task(&draft()).expect("create");
    assert_eq!(task.id, "9");

    let requests = server.finish();
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/api/tasks/");
    assert!(requests[0].body.contains("\"dueDate\":\"2025-01-01\""));
    assert!(requests[0].body.contains("\"priority\":\"low\""));
    assert!(!requests[0].body.contains("\"id\""));
}

#[test]
fn update_puts_to_detail_route() {
    let server = StubServer::start(vec![CannedResponse::json(
        200,
        task_json("7", "Buy oat milk", false),
    )]);
    let gateway = TaskGateway::new(server.base_url());

    let task = gateway.update_task("7", &draft()).expect("update");
    assert_eq!(task.title, "Buy oat milk");

    let requests = server.finish();
    assert_eq!(requests[0].method, "PUT");
    assert_eq!(requests[0].path, "/api/tasks/7/");
}

#[test]
fn toggle_patches_toggle_route() {
    let server = StubServer::start(vec![CannedResponse::json(
        200,
        task_json("7", "Buy milk", true),
    )]);
    let gateway = TaskGateway::new(server.base_url());

    let task = gateway.toggle_complete("7").expect("toggle");
    assert!(task.completed);

    let requests = server.finish();
    assert_eq!(requests[0].method, "PATCH");
    assert_eq!(requests[0].path, "/api/tasks/7/toggle/");
}

#[test]
fn delete_accepts_empty_no_content_response() {
    let server = StubServer::start(vec![CannedResponse::json(204, "")]);
    let gateway = TaskGateway::new(server.base_url());

    gateway.delete_task("7").expect("delete");

    let requests = server.finish();
    assert_eq!(requests[0].method, "DELETE");
    assert_eq!(requests[0].path, "/api/tasks/7/");
}

#[test]
fn delete_of_missing_task_surfaces_rejection() {
    let server = StubServer::start(vec![CannedResponse::json(
        404,
        r#"{"error": "Task not found"}"#,
    )]);
    let gateway = TaskGateway::new(server.base_url());

    let err = gateway.delete_task("gone").expect_err("should fail");
    match &err {
        Error::Rejected { message, .. } => assert_eq!(message, "Task not found"),
        other => panic!("expected Rejected, got {other:?}"),
    }
    assert_eq!(err.exit_code(), exit_codes::REJECTED);
    server.finish();
}

#[test]
fn field_validation_errors_are_flattened() {
    let server = StubServer::start(vec![CannedResponse::json(
        400,
        r#"{"title": ["This field may not be blank."]}"#,
    )]);
    let gateway = TaskGateway::new(server.base_url());

    let err = gateway.create_task(&draft()).expect_err("should fail");
    match err {
        Error::Rejected { message, body } => {
            assert!(message.contains("title: This field may not be blank."));
            assert!(body.get("title").is_some());
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
    server.finish();
}

#[test]
fn unstructured_error_body_becomes_status_error() {
    let server = StubServer::start(vec![CannedResponse::html(502, "<html>bad gateway</html>")]);
    let gateway = TaskGateway::new(server.base_url());

    let err = gateway.list_tasks().expect_err("should fail");
    match err {
        Error::Status { status } => assert_eq!(status, 502),
        other => panic!("expected Status, got {other:?}"),
    }
    server.finish();
}

#[test]
fn categories_degrade_to_empty_on_failure() {
    let server = StubServer::start(vec![CannedResponse::html(500, "boom")]);
    let gateway = TaskGateway::new(server.base_url());

    assert!(gateway.list_categories().is_empty());
    server.finish();
}

#[test]
fn categories_parse_on_success() {
    let server = StubServer::start(vec![CannedResponse::json(
        200,
        r#"["errands", "work"]"#,
    )]);
    let gateway = TaskGateway::new(server.base_url());

    assert_eq!(gateway.list_categories(), vec!["errands", "work"]);
    server.finish();
}

#[test]
fn stats_parse_and_propagate_failure() {
    let server = StubServer::start(vec![
        CannedResponse::json(
            200,
            r#"{"total": 4, "completed": 1, "pending": 3, "byPriority": {"high": 2, "medium": 1, "low": 0}}"#,
        ),
        CannedResponse::html(500, "boom"),
    ]);
    let gateway = TaskGateway::new(server.base_url());

    let stats = gateway.fetch_stats().expect("stats");
    assert_eq!(stats.total, 4);
    assert_eq!(stats.by_priority.high, 2);

    assert!(gateway.fetch_stats().is_err());
    let requests = server.finish();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].path, "/api/tasks/stats/");
}
