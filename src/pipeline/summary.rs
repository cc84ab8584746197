//! End-of-run summary.
//!
//! One record capturing what the run produced, mirroring the reported
//! outputs. Written as pretty-printed JSON when a summary path was given,
//! so downstream workflow steps can consume the result without scraping
//! the log.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::artifacts::ArtifactSet;
use crate::error::{PipelineError, Result};
use crate::pipeline::context::RunContext;

/// Terminal state of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildStatus {
    Success,
    Failed,
}

impl BuildStatus {
    /// Wire form used for the `build-status` output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }
}

/// Serializable record of one pipeline run.
///
/// Path and version fields mirror the reported outputs: empty strings for
/// values the run never produced. Checksums and the failure reason are
/// omitted from the JSON entirely when absent.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub build_status: BuildStatus,
    pub build_time: String,
    pub go_version: String,
    pub wails_version: String,
    pub installer_path: String,
    pub binary_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installer_sha256: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binary_sha256: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl RunSummary {
    /// Summary for a run that built and scanned successfully.
    pub fn success(ctx: &RunContext, artifacts: &ArtifactSet) -> Self {
        Self {
            started_at: ctx.started_at,
            build_status: BuildStatus::Success,
            build_time: format_build_time(ctx.elapsed()),
            go_version: ctx.versions.go.clone().unwrap_or_default(),
            wails_version: ctx.versions.wails.clone().unwrap_or_default(),
            installer_path: artifacts.installer_path(),
            binary_path: artifacts.binary_path(),
            installer_sha256: artifacts.installer.as_ref().map(|a| a.sha256.clone()),
            binary_sha256: artifacts.binary.as_ref().map(|a| a.sha256.clone()),
            failure_reason: None,
        }
    }

    /// Summary for a run that failed after the context was created.
    ///
    /// Versions probed before the failure are kept; artifact paths stay
    /// empty.
    pub fn failed(ctx: &RunContext, error: &PipelineError) -> Self {
        Self {
            started_at: ctx.started_at,
            build_status: BuildStatus::Failed,
            build_time: format_build_time(ctx.elapsed()),
            go_version: ctx.versions.go.clone().unwrap_or_default(),
            wails_version: ctx.versions.wails.clone().unwrap_or_default(),
            installer_path: String::new(),
            binary_path: String::new(),
            installer_sha256: None,
            binary_sha256: None,
            failure_reason: Some(error.to_string()),
        }
    }

    /// Summary for a run that failed before the context existed.
    pub fn failed_early(started_at: DateTime<Utc>, elapsed: Duration, error: &PipelineError) -> Self {
        Self {
            started_at,
            build_status: BuildStatus::Failed,
            build_time: format_build_time(elapsed),
            go_version: String::new(),
            wails_version: String::new(),
            installer_path: String::new(),
            binary_path: String::new(),
            installer_sha256: None,
            binary_sha256: None,
            failure_reason: Some(error.to_string()),
        }
    }

    /// Writes the summary as pretty-printed JSON, creating parent
    /// directories as needed.
    pub async fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let body = serde_json::to_vec_pretty(self)?;
        tokio::fs::write(path, body).await?;
        Ok(())
    }
}

/// Renders an elapsed duration the way the `build-time` output expects:
/// seconds with exactly two decimal places and a trailing `s`.
pub fn format_build_time(elapsed: Duration) -> String {
    format!("{:.2}s", elapsed.as_secs_f64())
}
