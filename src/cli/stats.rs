//! td stats and categories command implementations.

use crate::error::Result;
use crate::gateway::TaskGateway;
use crate::output::{emit_success, HumanOutput, OutputOptions};

pub struct StatsOptions {
    pub gateway: TaskGateway,
    pub json: bool,
    pub quiet: bool,
}

pub struct CategoriesOptions {
    pub gateway: TaskGateway,
    pub json: bool,
    pub quiet: bool,
}

pub fn run_stats(options: StatsOptions) -> Result<()> {
    let stats = options.gateway.fetch_stats()?;

    let mut human = HumanOutput::new("Task statistics");
    human.push_summary("total", stats.total.to_string());
    human.push_summary("completed", stats.completed.to_string());
    human.push_summary("pending", stats.pending.to_string());
    human.push_detail(format!("high priority pending: {}", stats.by_priority.high));
    human.push_detail(format!(
        "medium priority pending: {}",
        stats.by_priority.medium
    ));
    human.push_detail(format!("low priority pending: {}", stats.by_priority.low));

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "stats",
        &stats,
        Some(&human),
    )
}

pub fn run_categories(options: CategoriesOptions) -> Result<()> {
    // The gateway degrades this to an empty list on failure, so the command
    // never fails outright; an empty result is reported as such.
    let categories = options.gateway.list_categories();

    let mut human = HumanOutput::new(format!("{} categor(ies)", categories.len()));
    for category in &categories {
        human.push_detail(category.clone());
    }
    if categories.is_empty() {
        human.push_detail("none in use".to_string());
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "categories",
        &categories,
        Some(&human),
    )
}
