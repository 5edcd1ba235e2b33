//! td add command implementation.

use crate::error::Result;
use crate::gateway::TaskGateway;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::task::Priority;
use crate::ui::dashboard::actions::{build_create_draft, NewTaskInput};

pub struct AddOptions {
    pub title: String,
    pub due: String,
    pub priority: Priority,
    pub category: String,
    pub description: String,
    pub gateway: TaskGateway,
    pub json: bool,
    pub quiet: bool,
}

pub fn run(options: AddOptions) -> Result<()> {
    // Local validation first; a bad title or due date never reaches the API.
    let draft = build_create_draft(NewTaskInput {
        title: options.title,
        description: options.description,
        priority: options.priority,
        category: options.category,
        due_date: options.due,
    })?;

    let task = options.gateway.create_task(&draft)?;

    let mut human = HumanOutput::new("Created task");
    human.push_summary("id", task.id.clone());
    human.push_summary("title", task.title.clone());
    human.push_summary("due", task.due_date.to_string());
    human.push_summary("priority", task.priority.to_string());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "add",
        &task,
        Some(&human),
    )
}
