//! Output channel for the enclosing automation runner.
//!
//! Implements the GitHub Actions env-file protocol: structured outputs are
//! appended to the file named by `GITHUB_OUTPUT`, exported variables to the
//! file named by `GITHUB_ENV`, and log groups / failure markers are emitted
//! as workflow commands on stdout. When the env files are absent (local
//! runs) the pairs are logged instead, so the pipeline stays usable outside
//! a runner.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Writer for runner outputs, exported variables, and workflow commands.
#[derive(Debug, Clone)]
pub struct OutputChannel {
    output_file: Option<PathBuf>,
    env_file: Option<PathBuf>,
}

impl OutputChannel {
    /// Creates a channel from `GITHUB_OUTPUT` / `GITHUB_ENV`.
    pub fn from_env() -> Self {
        Self {
            output_file: env_path("GITHUB_OUTPUT"),
            env_file: env_path("GITHUB_ENV"),
        }
    }

    /// Creates a channel writing to explicit files.
    ///
    /// # Arguments
    ///
    /// * `output_file` - Target for structured outputs, if any
    /// * `env_file` - Target for exported variables, if any
    #[allow(dead_code)] // Public API - preserved for external consumers
    pub fn with_files(output_file: Option<PathBuf>, env_file: Option<PathBuf>) -> Self {
        Self {
            output_file,
            env_file,
        }
    }

    /// Records a structured output for the enclosing run.
    pub fn set_output(&self, key: &str, value: &str) -> Result<()> {
        match &self.output_file {
            Some(file) => append_pair(file, key, value),
            None => {
                log::info!("Output: {}={}", key, value);
                Ok(())
            }
        }
    }

    /// Exports a variable to subsequent steps of the enclosing run.
    ///
    /// Visibility inside this run's own child processes is handled
    /// separately, through the shell's environment injection.
    pub fn export_variable(&self, name: &str, value: &str) -> Result<()> {
        match &self.env_file {
            Some(file) => append_pair(file, name, value),
            None => {
                log::info!("Export: {}={}", name, value);
                Ok(())
            }
        }
    }

    /// Opens a collapsible log group in the runner UI.
    pub fn start_group(&self, title: &str) {
        println!("::group::{}", escape_data(title));
    }

    /// Closes the current log group.
    pub fn end_group(&self) {
        println!("::endgroup::");
    }

    /// Marks the run failed with the given reason.
    ///
    /// The caller is responsible for exiting non-zero afterwards.
    pub fn set_failed(&self, message: &str) {
        println!("::error::{}", escape_data(message));
    }
}

/// Appends one `key=value` entry in the env-file format.
///
/// Multi-line values use the heredoc form with a collision-proof delimiter.
fn append_pair(file: &Path, key: &str, value: &str) -> Result<()> {
    let mut handle = OpenOptions::new().create(true).append(true).open(file)?;

    if value.contains('\n') || value.contains('\r') {
        let delimiter = format!("ghadelim_{}", uuid::Uuid::new_v4().simple());
        writeln!(handle, "{}<<{}", key, delimiter)?;
        writeln!(handle, "{}", value)?;
        writeln!(handle, "{}", delimiter)?;
    } else {
        writeln!(handle, "{}={}", key, value)?;
    }

    Ok(())
}

/// Escapes a value for use in a workflow command.
fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
