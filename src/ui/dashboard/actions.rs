use crate::error::{Error, Result};
use crate::task::{parse_due_date, Priority, TaskDraft};

use super::editor::EditorSubmit;

/// Raw create input, as collected from a form or CLI flags. Validation
/// happens here, before any request leaves the process.
#[derive(Debug, Clone)]
pub struct NewTaskInput {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub category: String,
    pub due_date: String,
}

/// Raw update input. `completed` is carried through unchanged; flipping it
/// is the toggle operation's job.
#[derive(Debug, Clone)]
pub struct EditTaskInput {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub category: String,
    pub due_date: String,
    pub completed: bool,
}

/// Validate create input into a draft. An empty title or due date fails
/// with a field-scoped error and no gateway call is made.
pub fn build_create_draft(input: NewTaskInput) -> Result<TaskDraft> {
    let title = input.title.trim();
    if title.is_empty() {
        return Err(Error::TitleRequired);
    }
    let due_date = parse_due_date(&input.due_date)?;
    Ok(TaskDraft {
        title: title.to_string(),
        description: input.description.trim().to_string(),
        priority: input.priority,
        category: input.category.trim().to_string(),
        due_date,
        completed: false,
    })
}

/// Validate update input into a full-replace draft.
pub fn build_update_draft(input: EditTaskInput) -> Result<TaskDraft> {
    let title = input.title.trim();
    if title.is_empty() {
        return Err(Error::TitleRequired);
    }
    let due_date = parse_due_date(&input.due_date)?;
    Ok(TaskDraft {
        title: title.to_string(),
        description: input.description.trim().to_string(),
        priority: input.priority,
        category: input.category.trim().to_string(),
        due_date,
        completed: input.completed,
    })
}

/// Assemble a draft from an already-validated form submission.
pub fn draft_from_submit(submit: EditorSubmit, completed: bool) -> TaskDraft {
    TaskDraft {
        title: submit.title,
        description: submit.description,
        priority: submit.priority,
        category: submit.category,
        due_date: submit.due_date,
        completed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str, due: &str) -> NewTaskInput {
        NewTaskInput {
            title: title.to_string(),
            description: "  desc  ".to_string(),
            priority: Priority::Low,
            category: " errands ".to_string(),
            due_date: due.to_string(),
        }
    }

    #[test]
    fn empty_title_is_rejected_locally() {
        let err = build_create_draft(input("   ", "2025-01-01")).unwrap_err();
        assert!(matches!(err, Error::TitleRequired));
    }

    #[test]
    fn empty_due_date_is_rejected_locally() {
        let err = build_create_draft(input("Buy milk", "")).unwrap_err();
        assert!(matches!(err, Error::DueDateRequired));
    }

    #[test]
    fn create_draft_trims_and_starts_incomplete() {
        let draft = build_create_draft(input("  Buy milk ", "2025-01-01")).expect("draft");
        assert_eq!(draft.title, "Buy milk");
        assert_eq!(draft.description, "desc");
        assert_eq!(draft.category, "errands");
        assert!(!draft.completed);
    }

    #[test]
    fn update_draft_keeps_completion_flag() {
        let draft = build_update_draft(EditTaskInput {
            title: "Buy milk".to_string(),
            description: String::new(),
            priority: Priority::High,
            category: String::new(),
            due_date: "2025-01-02".to_string(),
            completed: true,
        })
        .expect("draft");
        assert!(draft.completed);
        assert_eq!(draft.priority, Priority::High);
    }
}
