//! External tool detection and version probing.
//!
//! Probing never fails the pipeline: a missing tool or a failing version
//! query comes back as `detected = false` with a logged warning, and the
//! caller decides whether that matters.

use crate::exec::Shell;

use super::Tool;

/// Presence and reported version of one external tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolStatus {
    /// Display name of the probed tool
    #[allow(dead_code)] // Public API - preserved for external consumers
    pub name: String,
    /// Whether the tool resolved and answered its version query
    pub detected: bool,
    /// Trimmed stdout of the version query, when non-empty
    pub version: Option<String>,
}

impl ToolStatus {
    fn missing(tool: &Tool) -> Self {
        Self {
            name: tool.name.to_string(),
            detected: false,
            version: None,
        }
    }
}

/// Probes for a tool on the shell's effective PATH.
///
/// Resolves the executable first, then runs its version query best-effort.
/// Idempotent: probing twice without a state change yields the same status.
///
/// # Returns
///
/// A [`ToolStatus`]; never an error.
pub async fn probe(shell: &Shell, tool: &Tool) -> ToolStatus {
    let program_path = match which::which_in(tool.program, Some(shell.search_path()), shell.base_dir())
    {
        Ok(path) => {
            log::debug!("Found {} at: {}", tool.program, path.display());
            path
        }
        Err(e) => {
            log::warn!(
                "Could not determine {} version: {} not found in PATH ({})",
                tool.name,
                tool.program,
                e
            );
            return ToolStatus::missing(tool);
        }
    };

    match shell.try_run(&tool.version_query()).await {
        Some(output) => {
            let version = output.stdout.trim();
            if version.is_empty() {
                log::info!("{} available at {}", tool.name, program_path.display());
                ToolStatus {
                    name: tool.name.to_string(),
                    detected: true,
                    version: None,
                }
            } else {
                log::info!("{} version: {}", tool.name, version);
                ToolStatus {
                    name: tool.name.to_string(),
                    detected: true,
                    version: Some(version.to_string()),
                }
            }
        }
        None => {
            log::warn!(
                "Could not determine {} version: `{}` did not succeed",
                tool.name,
                tool.version_query().rendered()
            );
            ToolStatus::missing(tool)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GHOST: Tool = Tool {
        name: "Ghost",
        program: "wb-test-missing-tool",
        version_args: &["--version"],
    };

    #[tokio::test]
    async fn missing_tool_is_not_detected() {
        let shell = Shell::new(std::env::temp_dir());
        let status = probe(&shell, &GHOST).await;

        assert_eq!(status.name, "Ghost");
        assert!(!status.detected);
        assert_eq!(status.version, None);
    }

    #[tokio::test]
    async fn probing_twice_yields_identical_status() {
        let shell = Shell::new(std::env::temp_dir());
        let first = probe(&shell, &GHOST).await;
        let second = probe(&shell, &GHOST).await;

        assert_eq!(first, second);
    }

    #[cfg(unix)]
    mod with_stub_tools {
        use super::*;
        use std::os::unix::fs::PermissionsExt;
        use std::path::Path;

        const STUB: Tool = Tool {
            name: "Stub",
            program: "wb-test-stub-tool",
            version_args: &["--version"],
        };

        fn write_stub(dir: &Path, name: &str, body: &str) {
            let path = dir.join(name);
            std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("write stub");
            let mut perms = std::fs::metadata(&path).expect("stub metadata").permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&path, perms).expect("chmod stub");
        }

        #[tokio::test]
        async fn reports_trimmed_version_from_stdout() {
            let dir = tempfile::tempdir().expect("tempdir");
            write_stub(dir.path(), STUB.program, "echo ' v1.2.3 '");

            let mut shell = Shell::new(std::env::temp_dir());
            shell.prepend_path(dir.path());

            let status = probe(&shell, &STUB).await;
            assert!(status.detected);
            assert_eq!(status.version.as_deref(), Some("v1.2.3"));
        }

        #[tokio::test]
        async fn failing_version_query_counts_as_missing() {
            let dir = tempfile::tempdir().expect("tempdir");
            write_stub(dir.path(), STUB.program, "exit 1");

            let mut shell = Shell::new(std::env::temp_dir());
            shell.prepend_path(dir.path());

            let status = probe(&shell, &STUB).await;
            assert!(!status.detected);
            assert_eq!(status.version, None);
        }

        #[tokio::test]
        async fn present_tool_probes_identically_twice() {
            let dir = tempfile::tempdir().expect("tempdir");
            write_stub(dir.path(), STUB.program, "echo 9.9.9");

            let mut shell = Shell::new(std::env::temp_dir());
            shell.prepend_path(dir.path());

            let first = probe(&shell, &STUB).await;
            let second = probe(&shell, &STUB).await;
            assert_eq!(first, second);
            assert!(first.detected);
        }
    }
}
