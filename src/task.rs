//! Task wire model.
//!
//! Records cross the wire in camelCase (`dueDate`, `createdAt`) to match the
//! task API. The server owns `id` and `createdAt`; the client never invents
//! or rewrites either.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Task priority. The API speaks lowercase strings; everything local goes
/// through this enum so a match over priorities stays exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Capitalized form for display.
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(Error::InvalidArgument(format!(
                "priority must be one of low, medium, high (got '{other}')"
            ))),
        }
    }
}

/// A task record as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub priority: Priority,
    #[serde(default)]
    pub category: String,
    pub due_date: NaiveDate,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// The mutable fields of a task, sent on create and update. Excludes the
/// server-owned `id` and `createdAt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub category: String,
    pub due_date: NaiveDate,
    pub completed: bool,
}

/// Aggregate counts from `/tasks/stats/`. The per-priority numbers cover
/// pending tasks only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total: u64,
    pub completed: u64,
    pub pending: u64,
    pub by_priority: PriorityCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityCounts {
    pub high: u64,
    pub medium: u64,
    pub low: u64,
}

/// Parse a form-level due date. Empty input is a distinct, field-scoped
/// error so the form can point at the field.
pub fn parse_due_date(value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::DueDateRequired);
    }
    NaiveDate::parse_from_str(value, DUE_DATE_FORMAT).map_err(|_| {
        Error::InvalidArgument(format!("due date must be YYYY-MM-DD (got '{value}')"))
    })
}
