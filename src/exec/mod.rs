//! External command execution.
//!
//! Every external tool invocation in the pipeline goes through [`Shell`],
//! which carries the working directory and the effective `PATH` handed to
//! child processes. Two call styles cover the pipeline's needs:
//!
//! - [`Shell::try_run`]: best-effort, captures output, never raises.
//!   Used by version probes.
//! - [`Shell::must_run`]: streams output to the log, raises on spawn
//!   failure or non-zero exit. Used by installs and the build itself.
//!
//! No timeouts are applied: a hanging tool hangs the pipeline, and the
//! enclosing automation runner owns the overall time limit.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

use crate::error::ExecError;

/// Description of a single external command invocation.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
    cwd: Option<PathBuf>,
}

impl CommandSpec {
    /// Creates a new command spec.
    ///
    /// # Arguments
    ///
    /// * `program` - Executable name, resolved against the shell's PATH
    /// * `args` - Arguments passed verbatim (no shell interpretation)
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: None,
        }
    }

    /// Overrides the working directory for this invocation.
    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Command line rendered for logs and error messages.
    pub fn rendered(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Captured output of a completed command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Captured stdout, lossily decoded
    pub stdout: String,
    /// Captured stderr, lossily decoded
    #[allow(dead_code)] // Public API - preserved for external consumers
    pub stderr: String,
}

/// Executor for external commands.
///
/// Holds the default working directory, the effective `PATH` (extended as
/// tools are installed mid-run), and extra environment variables injected
/// into every child process.
#[derive(Debug, Clone)]
pub struct Shell {
    base_dir: PathBuf,
    path_value: OsString,
    envs: Vec<(String, String)>,
}

impl Shell {
    /// Creates a shell rooted at `base_dir`, inheriting the process PATH.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            path_value: std::env::var_os("PATH").unwrap_or_default(),
            envs: Vec::new(),
        }
    }

    /// Prepends a directory to the effective PATH so tools installed there
    /// are found by subsequent invocations in this run.
    pub fn prepend_path(&mut self, dir: &Path) {
        let mut entries = vec![dir.to_path_buf()];
        entries.extend(std::env::split_paths(&self.path_value));
        match std::env::join_paths(entries) {
            Ok(joined) => self.path_value = joined,
            Err(e) => log::warn!("Skipping PATH entry {}: {}", dir.display(), e),
        }
    }

    /// Adds an environment variable passed to every child process.
    pub fn set_env(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.envs.push((name.into(), value.into()));
    }

    /// The effective PATH handed to child processes.
    pub fn search_path(&self) -> &OsStr {
        &self.path_value
    }

    /// Default working directory for child processes.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn command(&self, spec: &CommandSpec) -> Command {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .current_dir(spec.cwd.as_deref().unwrap_or(&self.base_dir))
            .env("PATH", &self.path_value);
        for (name, value) in &self.envs {
            cmd.env(name, value);
        }
        cmd
    }

    /// Runs a command and captures its output.
    ///
    /// # Returns
    ///
    /// * `Ok(CommandOutput)` - Command exited with status zero
    /// * `Err(ExecError)` - Spawn failure or non-zero exit
    pub async fn capture(&self, spec: &CommandSpec) -> Result<CommandOutput, ExecError> {
        let output = self
            .command(spec)
            .output()
            .await
            .map_err(|e| ExecError::Spawn {
                command: spec.rendered(),
                source: e,
            })?;

        let captured = CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };

        if output.status.success() {
            Ok(captured)
        } else {
            Err(ExecError::ExitStatus {
                command: spec.rendered(),
                code: output.status.code().unwrap_or(-1),
            })
        }
    }

    /// Best-effort invocation: any failure is logged at debug level and
    /// surfaces as `None`. Never raises.
    pub async fn try_run(&self, spec: &CommandSpec) -> Option<CommandOutput> {
        match self.capture(spec).await {
            Ok(output) => Some(output),
            Err(e) => {
                log::debug!("Best-effort command failed: {}", e);
                None
            }
        }
    }

    /// Fatal invocation: streams stdout and stderr to the log and raises
    /// on spawn failure or non-zero exit.
    pub async fn must_run(&self, spec: &CommandSpec) -> Result<(), ExecError> {
        log::debug!("Running: {}", spec.rendered());

        let mut child = self
            .command(spec)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ExecError::Spawn {
                command: spec.rendered(),
                source: e,
            })?;

        // Drain both pipes before waiting so neither side can block the
        // child on a full buffer
        tokio::join!(
            async {
                if let Some(stdout) = child.stdout.take() {
                    let reader = BufReader::new(stdout);
                    let mut lines = reader.lines();

                    while let Ok(Some(line)) = lines.next_line().await {
                        log::info!("  {}", line);
                    }
                }
            },
            async {
                if let Some(stderr) = child.stderr.take() {
                    let reader = BufReader::new(stderr);
                    let mut lines = reader.lines();

                    while let Ok(Some(line)) = lines.next_line().await {
                        log::info!("  {}", line);
                    }
                }
            }
        );

        let status = child.wait().await.map_err(|e| ExecError::Spawn {
            command: spec.rendered(),
            source: e,
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(ExecError::ExitStatus {
                command: spec.rendered(),
                code: status.code().unwrap_or(-1),
            })
        }
    }
}
