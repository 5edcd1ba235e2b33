use taskdeck::error::{exit_codes, Error, JsonError};

#[test]
fn exit_codes_map_correctly() {
    let user = Error::TitleRequired;
    assert_eq!(user.exit_code(), exit_codes::USER_ERROR);

    let user = Error::InvalidArgument("bad".to_string());
    assert_eq!(user.exit_code(), exit_codes::USER_ERROR);

    let rejected = Error::Rejected {
        message: "Task not found".to_string(),
        body: serde_json::json!({"error": "Task not found"}),
    };
    assert_eq!(rejected.exit_code(), exit_codes::REJECTED);

    let op = Error::Status { status: 502 };
    assert_eq!(op.exit_code(), exit_codes::OPERATION_FAILED);

    let op = Error::OperationFailed("boom".to_string());
    assert_eq!(op.exit_code(), exit_codes::OPERATION_FAILED);
}

#[test]
fn json_error_includes_code_and_details() {
    let err = Error::Rejected {
        message: "title: This field may not be blank.".to_string(),
        body: serde_json::json!({"title": ["This field may not be blank."]}),
    };
    let json = JsonError::from(&err);
    assert_eq!(json.code, exit_codes::REJECTED);
    assert!(json.error.contains("title"));
    assert!(json.details.is_some());

    let plain = JsonError::from(&Error::DueDateRequired);
    assert_eq!(plain.code, exit_codes::USER_ERROR);
    assert!(plain.details.is_none());
}

#[test]
fn field_errors_have_actionable_messages() {
    assert_eq!(Error::TitleRequired.to_string(), "Title is required");
    assert_eq!(Error::DueDateRequired.to_string(), "Due date is required");
}
