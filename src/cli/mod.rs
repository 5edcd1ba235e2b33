//! Command-line interface for taskdeck
//!
//! This module defines the CLI structure using clap derive macros.
//! Each subcommand is defined in its own submodule.

use std::path::Path;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::Result;
use crate::gateway::TaskGateway;
use crate::task::Priority;

mod add;
mod edit;
mod list;
mod rm;
mod stats;
mod toggle;

/// td - taskdeck
///
/// A terminal dashboard and scriptable CLI for a remote task API.
#[derive(Parser, Debug)]
#[command(name = "td")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Base URL of the task API (overrides .taskdeck.toml)
    #[arg(long, global = true, env = "TASKDECK_API_URL")]
    pub api_url: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the interactive dashboard (the default when no command is given)
    Ui,

    /// List tasks, filtered client-side
    List {
        /// Case-insensitive match against title and description
        #[arg(long)]
        search: Option<String>,

        /// Only tasks with this priority: low, medium, high
        #[arg(long)]
        priority: Option<Priority>,

        /// Only tasks with this category
        #[arg(long)]
        category: Option<String>,

        /// Only completed (true) or only pending (false) tasks
        #[arg(long)]
        completed: Option<bool>,
    },

    /// Create a task
    Add {
        /// Task title
        title: String,

        /// Due date, YYYY-MM-DD
        #[arg(long)]
        due: String,

        /// Priority: low, medium, high
        #[arg(long)]
        priority: Option<Priority>,

        /// Category label
        #[arg(long, default_value = "")]
        category: String,

        /// Longer description
        #[arg(long, default_value = "")]
        description: String,
    },

    /// Update a task; omitted flags keep their current values
    Edit {
        /// Task id
        id: String,

        #[arg(long)]
        title: Option<String>,

        /// Due date, YYYY-MM-DD
        #[arg(long)]
        due: Option<String>,

        /// Priority: low, medium, high
        #[arg(long)]
        priority: Option<Priority>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Toggle a task's completion status
    Toggle {
        /// Task id
        id: String,
    },

    /// Delete a task
    Rm {
        /// Task id
        id: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// List the categories in use
    Categories,

    /// Show aggregate task statistics
    Stats,
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let config = Config::load_from_dir(Path::new("."));
        let gateway = TaskGateway::new(config.resolve_base_url(self.api_url.as_deref()));

        match self.command.unwrap_or(Commands::Ui) {
            Commands::Ui => crate::ui::dashboard::run(gateway, config),
            Commands::List {
                search,
                priority,
                category,
                completed,
            } => list::run(list::ListOptions {
                search,
                priority,
                category,
                completed,
                gateway,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Add {
                title,
                due,
                priority,
                category,
                description,
            } => add::run(add::AddOptions {
                title,
                due,
                priority: priority.unwrap_or(config.ui.default_priority),
                category,
                description,
                gateway,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Edit {
                id,
                title,
                due,
                priority,
                category,
                description,
            } => edit::run(edit::EditOptions {
                id,
                title,
                due,
                priority,
                category,
                description,
                gateway,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Toggle { id } => toggle::run(toggle::ToggleOptions {
                id,
                gateway,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Rm { id, yes } => rm::run(rm::RmOptions {
                id,
                yes,
                gateway,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Categories => stats::run_categories(stats::CategoriesOptions {
                gateway,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Stats => stats::run_stats(stats::StatsOptions {
                gateway,
                json: self.json,
                quiet: self.quiet,
            }),
        }
    }
}
