//! td rm command implementation.

use std::io::{self, Write};

use crate::error::Result;
use crate::gateway::TaskGateway;
use crate::output::{emit_success, HumanOutput, OutputOptions};

pub struct RmOptions {
    pub id: String,
    pub yes: bool,
    pub gateway: TaskGateway,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct RmReport {
    id: String,
    deleted: bool,
}

pub fn run(options: RmOptions) -> Result<()> {
    if !options.yes && !confirm(&options.id)? {
        let report = RmReport {
            id: options.id,
            deleted: false,
        };
        let human = HumanOutput::new("Cancelled");
        return emit_success(
            OutputOptions {
                json: options.json,
                quiet: options.quiet,
            },
            "rm",
            &report,
            Some(&human),
        );
    }

    options.gateway.delete_task(&options.id)?;

    let report = RmReport {
        id: options.id.clone(),
        deleted: true,
    };
    let mut human = HumanOutput::new("Deleted task");
    human.push_summary("id", options.id);

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "rm",
        &report,
        Some(&human),
    )
}

fn confirm(id: &str) -> Result<bool> {
    print!("Delete task '{id}'? This cannot be undone. [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
