// src/utils/error.rs
use std::io;
use std::time::Duration;
use thiserror::Error;

/// Main error type for the terminal
///
/// Covers the failure kinds a mining session can surface to the user
/// as well as the plumbing errors (I/O, HTTP, config) that feed them.
/// A single unavailable metric is never represented here: stat fetches
/// absorb their own failures and yield `None`.
#[derive(Error, Debug)]
pub enum TerminalError {
    /// The daemon CLI binary could not be found on disk or in `PATH`
    #[error("Daemon CLI not found: {0}")]
    ToolNotFound(String),

    /// The daemon CLI ran but exited with a non-zero status
    #[error("{stderr}")]
    ToolInvocation {
        /// Exit code, if the process was not killed by a signal
        code: Option<i32>,
        /// Diagnostic text the tool wrote to stderr
        stderr: String,
    },

    /// Malformed user command (bad or missing arguments)
    #[error("{0}")]
    InvalidRequest(String),

    /// A mining session is already running
    #[error("Mining already in progress")]
    ReentrancyRejected,

    /// An external call did not finish in time
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// Standard I/O operation errors
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    /// HTTP request/response errors
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Remote endpoint answered with something other than 200 OK
    #[error("Unexpected HTTP status: {0}")]
    UnexpectedStatus(reqwest::StatusCode),

    /// Configuration file or parameter errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Async task execution errors
    #[error("Task execution error: {0}")]
    TaskError(String),
}

/// Converts async task join errors into TerminalError
///
/// Used when the mining worker task panics or is aborted before it
/// gets a chance to report its own outcome.
impl From<tokio::task::JoinError> for TerminalError {
    fn from(e: tokio::task::JoinError) -> Self {
        TerminalError::TaskError(format!("Async task failed: {}", e))
    }
}

impl TerminalError {
    /// Whether the error means the daemon binary is missing entirely
    pub fn is_tool_not_found(&self) -> bool {
        matches!(self, TerminalError::ToolNotFound(_))
    }
}
