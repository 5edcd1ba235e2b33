//! td toggle command implementation.

use crate::error::Result;
use crate::gateway::TaskGateway;
use crate::output::{emit_success, HumanOutput, OutputOptions};

pub struct ToggleOptions {
    pub id: String,
    pub gateway: TaskGateway,
    pub json: bool,
    pub quiet: bool,
}

pub fn run(options: ToggleOptions) -> Result<()> {
    let task = options.gateway.toggle_complete(&options.id)?;

    let state = if task.completed { "completed" } else { "pending" };
    let mut human = HumanOutput::new(format!("Task now {state}"));
    human.push_summary("id", task.id.clone());
    human.push_summary("title", task.title.clone());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "toggle",
        &task,
        Some(&human),
    )
}
