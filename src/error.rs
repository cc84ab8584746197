//! Error types for pipeline operations.
//!
//! This module defines all error types with actionable error messages,
//! layered so that every failure can be traced back to the external
//! command or argument that caused it.

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Main error type for all pipeline operations
#[derive(Error, Debug)]
pub enum PipelineError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// External command failures (spawn errors and non-zero exits)
    #[error("{0}")]
    Exec(#[from] ExecError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP download errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

/// Errors from spawning or waiting on external commands.
///
/// The `Display` text of these variants is what the pipeline reports as its
/// terminal failure reason, so it carries the rendered command line.
#[derive(Error, Debug)]
pub enum ExecError {
    /// The program could not be started at all
    #[error("failed to launch `{command}`: {source}")]
    Spawn {
        /// Rendered command line
        command: String,
        /// Underlying spawn error
        #[source]
        source: std::io::Error,
    },

    /// The program ran but exited with a non-zero status
    #[error("command `{command}` failed with exit code {code}")]
    ExitStatus {
        /// Rendered command line
        command: String,
        /// Exit code reported by the OS (-1 when terminated by a signal)
        code: i32,
    },
}
