//! taskdeck - Terminal client for a remote task API
//!
//! This library backs the `td` CLI: a ratatui dashboard plus one-shot
//! commands, all speaking to an external task service over HTTP. Storage,
//! record validation, and id/timestamp assignment live on the server; the
//! client keeps an in-memory mirror and reconciles it from server responses.
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `.taskdeck.toml`
//! - `error`: Error types and result aliases
//! - `gateway`: Typed HTTP wrapper over the remote task API
//! - `task`: Task wire model (records, drafts, priorities, stats)
//! - `output`: Human and JSON output envelopes for CLI commands
//! - `ui`: The interactive dashboard

pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod output;
pub mod task;
pub mod ui;

pub use error::{Error, Result};
