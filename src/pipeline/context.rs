//! Per-run state threaded through every pipeline stage.
//!
//! The context is created once at pipeline entry and carries everything the
//! stages share: the timer, the resolved directories, the GOPATH, the shell
//! with its effective PATH, and the tool versions gathered along the way.
//! There is no module-level state; a second run gets a fresh context.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::exec::Shell;

/// Tool versions gathered during the run, reported at the end.
#[derive(Debug, Clone, Default)]
pub struct ToolVersions {
    /// Trimmed `go version` output, when the probe succeeded
    pub go: Option<String>,
    /// `wails version` output, or "latest" right after a fresh install
    pub wails: Option<String>,
}

/// State owned by a single pipeline run.
#[derive(Debug)]
pub struct RunContext {
    started: Instant,
    /// Wall-clock time the run was entered
    pub started_at: DateTime<Utc>,
    /// Canonicalized project directory, the default working directory
    pub project_dir: PathBuf,
    /// Frontend sub-project directory (resolved against the project dir)
    pub frontend_dir: PathBuf,
    /// Build output directory scanned for artifacts (`build/bin`)
    pub artifact_dir: PathBuf,
    /// GOPATH in effect for this run
    pub gopath: PathBuf,
    /// Executor for external commands, carrying the effective PATH
    pub shell: Shell,
    /// Versions accumulated by the toolchain and build stages
    pub versions: ToolVersions,
}

impl RunContext {
    /// Creates the context for one pipeline run.
    ///
    /// Canonicalizes the project directory (an error when it does not
    /// exist), resolves the frontend directory against it, derives the
    /// artifact directory, and builds the shell with `GOPATH/bin` prepended
    /// to the inherited PATH so freshly installed Go tools resolve in later
    /// stages.
    ///
    /// # Arguments
    ///
    /// * `project_dir` - Root of the Wails project
    /// * `frontend_dir` - Frontend directory; relative paths resolve under
    ///   the project directory
    pub fn new(project_dir: &Path, frontend_dir: &Path) -> Result<Self> {
        let project_dir = project_dir.canonicalize()?;
        let frontend_dir = if frontend_dir.is_absolute() {
            frontend_dir.to_path_buf()
        } else {
            project_dir.join(frontend_dir)
        };
        let artifact_dir = project_dir.join("build").join("bin");

        let gopath = resolve_gopath(std::env::var_os("GOPATH"))?;
        let mut shell = Shell::new(&project_dir);
        shell.prepend_path(&gopath.join("bin"));
        shell.set_env("GOPATH", gopath.display().to_string());

        Ok(Self {
            started: Instant::now(),
            started_at: Utc::now(),
            project_dir,
            frontend_dir,
            artifact_dir,
            gopath,
            shell,
            versions: ToolVersions::default(),
        })
    }

    /// Wall-clock time elapsed since the context was created.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// GOPATH resolution: the environment value when set and non-empty,
/// otherwise `<home>/go`.
fn resolve_gopath(env_value: Option<OsString>) -> Result<PathBuf> {
    if let Some(value) = env_value.filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(value));
    }

    let home = dirs::home_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine the home directory for the GOPATH default"))?;
    Ok(home.join("go"))
}
