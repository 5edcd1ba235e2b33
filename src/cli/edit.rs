//! td edit command implementation.
//!
//! The API's update is a full replace of the mutable fields, so the current
//! record is fetched first and omitted flags keep their existing values.

use crate::error::{Error, Result};
use crate::gateway::TaskGateway;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::task::{Priority, DUE_DATE_FORMAT};
use crate::ui::dashboard::actions::{build_update_draft, EditTaskInput};

pub struct EditOptions {
    pub id: String,
    pub title: Option<String>,
    pub due: Option<String>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub gateway: TaskGateway,
    pub json: bool,
    pub quiet: bool,
}

pub fn run(options: EditOptions) -> Result<()> {
    let tasks = options.gateway.list_tasks()?;
    let current = tasks
        .iter()
        .find(|task| task.id == options.id)
        .ok_or_else(|| Error::InvalidArgument(format!("no task with id '{}'", options.id)))?;

    let draft = build_update_draft(EditTaskInput {
        title: options.title.unwrap_or_else(|| current.title.clone()),
        description: options
            .description
            .unwrap_or_else(|| current.description.clone()),
        priority: options.priority.unwrap_or(current.priority),
        category: options.category.unwrap_or_else(|| current.category.clone()),
        due_date: options
            .due
            .unwrap_or_else(|| current.due_date.format(DUE_DATE_FORMAT).to_string()),
        completed: current.completed,
    })?;

    let task = options.gateway.update_task(&options.id, &draft)?;

    let mut human = HumanOutput::new("Updated task");
    human.push_summary("id", task.id.clone());
    human.push_summary("title", task.title.clone());
    human.push_summary("due", task.due_date.to_string());
    human.push_summary("priority", task.priority.to_string());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "edit",
        &task,
        Some(&human),
    )
}
