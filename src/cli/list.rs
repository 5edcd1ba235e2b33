//! td list command implementation.

use crate::error::Result;
use crate::gateway::TaskGateway;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::task::{Priority, Task};
use crate::ui::dashboard::model;

pub struct ListOptions {
    pub search: Option<String>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
    pub completed: Option<bool>,
    pub gateway: TaskGateway,
    pub json: bool,
    pub quiet: bool,
}

pub fn run(options: ListOptions) -> Result<()> {
    let tasks = options.gateway.list_tasks()?;

    let query = options.search.as_deref().unwrap_or("");
    let indices = model::filter_task_indices(
        &tasks,
        query,
        options.priority,
        options.category.as_deref(),
    );
    let mut visible: Vec<Task> = indices.into_iter().map(|idx| tasks[idx].clone()).collect();
    if let Some(completed) = options.completed {
        visible.retain(|task| task.completed == completed);
    }
    model::sort_tasks(&mut visible);

    let mut human = HumanOutput::new(format!(
        "{} of {} task(s)",
        visible.len(),
        tasks.len()
    ));
    for task in &visible {
        human.push_detail(format_task_line(task));
    }
    if visible.is_empty() {
        human.push_detail("no matching tasks".to_string());
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "list",
        &visible,
        Some(&human),
    )
}

fn format_task_line(task: &Task) -> String {
    let marker = if task.completed { "[x]" } else { "[ ]" };
    let category = task.category.trim();
    let suffix = if category.is_empty() {
        String::new()
    } else {
        format!("  ({category})")
    };
    format!(
        "{marker} {} {:<6} {}  {}{suffix}",
        task.due_date,
        task.priority.as_str(),
        task.id,
        task.title
    )
}
