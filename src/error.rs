//! Error types for taskdeck
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, invalid config, a form field that fails local validation)
//! - 3: Rejected by the remote API (non-2xx with a structured error body)
//! - 4: Operation failed (network failure, unexpected status, local IO)

use thiserror::Error;

/// Exit codes for the td CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const REJECTED: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for taskdeck operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Title is required")]
    TitleRequired,

    #[error("Due date is required")]
    DueDateRequired,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // Rejected by the API (exit code 3)
    #[error("Rejected by the task API: {message}")]
    Rejected {
        message: String,
        body: serde_json::Value,
    },

    // Operation failures (exit code 4)
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected status {status} from the task API")]
    Status { status: u16 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::TitleRequired
            | Error::DueDateRequired
            | Error::InvalidConfig(_)
            | Error::InvalidArgument(_) => exit_codes::USER_ERROR,

            // API rejections
            Error::Rejected { .. } => exit_codes::REJECTED,

            // Operation failures
            Error::Transport(_)
            | Error::Status { .. }
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::OperationFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Structured payload for JSON output, when the error carries one.
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::Rejected { body, .. } => Some(body.clone()),
            _ => None,
        }
    }
}

/// Result type alias for taskdeck operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            error: err.to_string(),
            code: err.exit_code(),
            details: err.details(),
        }
    }
}
