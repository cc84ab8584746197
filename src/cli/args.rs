//! Command line argument parsing and validation.
//!
//! This module provides CLI argument parsing using clap, with validation
//! of the inputs the pipeline cannot sensibly default.

use clap::Parser;
use std::path::PathBuf;

use crate::pipeline::PipelineOptions;

/// Windows build pipeline for Wails applications
#[derive(Parser, Debug)]
#[command(
    name = "wails_winbuild",
    version,
    about = "Windows build pipeline for Wails applications",
    long_about = "Provisions the Windows build toolchain (Go, Node.js, pnpm, chocolatey, NSIS, UPX,
the Wails CLI), installs project dependencies, and builds the application with an
NSIS installer and UPX compression.

Usage:
  wails_winbuild
  wails_winbuild --project-dir ./app --frontend-dir frontend
  wails_winbuild --summary-json out/summary.json

Results are reported through the GitHub Actions env-file protocol when
GITHUB_OUTPUT / GITHUB_ENV are set, and logged otherwise. Exit code 0 means the
build succeeded and the outputs were recorded."
)]
pub struct Args {
    /// Root of the Wails project to build
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub project_dir: PathBuf,

    /// Frontend directory, relative to the project dir unless absolute
    #[arg(long, value_name = "DIR", default_value = "frontend")]
    pub frontend_dir: PathBuf,

    /// Write a machine-readable JSON summary of the run to this path
    #[arg(long, value_name = "PATH")]
    pub summary_json: Option<PathBuf>,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if !self.project_dir.is_dir() {
            return Err(format!(
                "Project directory does not exist: {}",
                self.project_dir.display()
            ));
        }

        Ok(())
    }
}

impl From<&Args> for PipelineOptions {
    fn from(args: &Args) -> Self {
        Self {
            project_dir: args.project_dir.clone(),
            frontend_dir: args.frontend_dir.clone(),
            summary_json: args.summary_json.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_the_common_invocation() {
        let args = Args::try_parse_from(["wails_winbuild"]).expect("parses");
        assert_eq!(args.project_dir, PathBuf::from("."));
        assert_eq!(args.frontend_dir, PathBuf::from("frontend"));
        assert_eq!(args.summary_json, None);
    }

    #[test]
    fn explicit_paths_are_taken_verbatim() {
        let args = Args::try_parse_from([
            "wails_winbuild",
            "--project-dir",
            "./app",
            "--frontend-dir",
            "ui",
            "--summary-json",
            "out/summary.json",
        ])
        .expect("parses");

        assert_eq!(args.project_dir, PathBuf::from("./app"));
        assert_eq!(args.frontend_dir, PathBuf::from("ui"));
        assert_eq!(args.summary_json, Some(PathBuf::from("out/summary.json")));

        let options = PipelineOptions::from(&args);
        assert_eq!(options.project_dir, args.project_dir);
        assert_eq!(options.summary_json, args.summary_json);
    }

    #[test]
    fn missing_project_dir_fails_validation() {
        let args = Args::try_parse_from([
            "wails_winbuild",
            "--project-dir",
            "/definitely/not/a/real/dir",
        ])
        .expect("parses");

        let reason = args.validate().expect_err("validation fails");
        assert!(reason.contains("Project directory does not exist"));
    }

    #[test]
    fn existing_project_dir_passes_validation() {
        let dir = tempfile::tempdir().expect("tempdir");
        let args = Args::try_parse_from([
            "wails_winbuild",
            "--project-dir",
            dir.path().to_str().expect("utf-8 path"),
        ])
        .expect("parses");

        assert!(args.validate().is_ok());
    }
}
