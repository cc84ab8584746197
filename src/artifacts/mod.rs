//! Build artifact discovery and checksums.
//!
//! After a successful build the output directory is scanned exactly once,
//! non-recursively, for two files: the NSIS installer and the standalone
//! executable. Entries are sorted by file name before matching so the
//! selection does not depend on OS readdir order. A missing directory or a
//! missing artifact is not an error; the reporter renders absent paths as
//! empty strings.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tokio::io::AsyncReadExt;

use crate::error::Result;

/// Suffix identifying the NSIS installer among the build outputs.
pub const INSTALLER_SUFFIX: &str = "-installer.exe";

/// Suffix identifying executables among the build outputs.
pub const EXECUTABLE_SUFFIX: &str = ".exe";

/// Marker excluding the installer from the standalone-executable match.
pub const INSTALLER_MARKER: &str = "-installer";

/// One discovered build output with its checksum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundArtifact {
    /// Full path of the artifact
    pub path: PathBuf,
    /// Hex-encoded SHA-256 of the artifact's contents
    pub sha256: String,
}

/// The artifacts discovered by one scan of the build output directory.
///
/// Both fields stay `None` when the directory or the matching file does not
/// exist; absence is reported, never raised.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactSet {
    /// First file whose name ends with the installer suffix
    pub installer: Option<FoundArtifact>,
    /// First executable whose name does not carry the installer marker
    pub binary: Option<FoundArtifact>,
}

impl ArtifactSet {
    /// Installer path rendered for outputs; empty string when absent.
    pub fn installer_path(&self) -> String {
        self.installer
            .as_ref()
            .map(|a| a.path.display().to_string())
            .unwrap_or_default()
    }

    /// Binary path rendered for outputs; empty string when absent.
    pub fn binary_path(&self) -> String {
        self.binary
            .as_ref()
            .map(|a| a.path.display().to_string())
            .unwrap_or_default()
    }
}

/// Scans the build output directory for the installer and the executable.
///
/// Lists the directory non-recursively, keeps regular files only, sorts the
/// names lexicographically, then applies the two suffix predicates
/// independently. The first match per predicate wins.
///
/// # Returns
///
/// * `Ok(ArtifactSet)` - Matches found so far; fields are `None` when the
///   directory is missing or a predicate matched nothing
/// * `Err` - The directory exists but could not be read
pub async fn locate_artifacts(dir: &Path) -> Result<ArtifactSet> {
    if !tokio::fs::try_exists(dir).await.unwrap_or(false) {
        log::info!(
            "Build output directory {} not found, skipping artifact scan",
            dir.display()
        );
        return Ok(ArtifactSet::default());
    }

    log::debug!("Scanning for artifacts in: {}", dir.display());

    let mut names = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();

        // Skip non-regular files (directories, symlinks)
        let metadata = tokio::fs::symlink_metadata(&path).await?;
        if !metadata.is_file() {
            log::debug!("  Skipping non-regular file: {}", path.display());
            continue;
        }

        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => {
                log::debug!("  Skipping non-UTF-8 file name: {:?}", raw);
            }
        }
    }

    // Sort by name so the first match is the same on every platform
    names.sort();
    log::debug!("Collected {} candidate file(s)", names.len());

    let installer = match names.iter().find(|n| n.ends_with(INSTALLER_SUFFIX)) {
        Some(name) => Some(found(dir, name).await?),
        None => None,
    };

    let binary = match names
        .iter()
        .find(|n| n.ends_with(EXECUTABLE_SUFFIX) && !n.contains(INSTALLER_MARKER))
    {
        Some(name) => Some(found(dir, name).await?),
        None => None,
    };

    Ok(ArtifactSet { installer, binary })
}

async fn found(dir: &Path, name: &str) -> Result<FoundArtifact> {
    let path = dir.join(name);
    let sha256 = calculate_sha256(&path).await?;
    log::info!("  ✓ Artifact: {} (sha256 {})", path.display(), sha256);
    Ok(FoundArtifact { path, sha256 })
}

/// Calculates the SHA-256 checksum of a single file.
///
/// Reads the file in 8KB chunks to handle large files efficiently.
pub async fn calculate_sha256(path: &Path) -> Result<String> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 8192];

    loop {
        let n = file.read(&mut buffer).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), name).expect("write file");
    }

    #[tokio::test]
    async fn finds_installer_and_binary_among_other_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(dir.path(), "App-installer.exe");
        touch(dir.path(), "App.exe");
        touch(dir.path(), "readme.txt");

        let set = locate_artifacts(dir.path()).await.expect("scan succeeds");
        assert!(set.installer_path().ends_with("App-installer.exe"));
        assert!(set.binary_path().ends_with("App.exe"));
        assert!(!set.binary_path().contains("-installer"));
    }

    #[tokio::test]
    async fn installer_alone_leaves_binary_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(dir.path(), "App-installer.exe");

        let set = locate_artifacts(dir.path()).await.expect("scan succeeds");
        assert!(set.installer.is_some());
        assert_eq!(set.binary, None);
        assert_eq!(set.binary_path(), "");
    }

    #[tokio::test]
    async fn missing_directory_yields_empty_set() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("no-such-dir");

        let set = locate_artifacts(&missing).await.expect("absence is not an error");
        assert_eq!(set, ArtifactSet::default());
        assert_eq!(set.installer_path(), "");
        assert_eq!(set.binary_path(), "");
    }

    #[tokio::test]
    async fn selection_is_lexicographic_not_readdir_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(dir.path(), "Zeta.exe");
        touch(dir.path(), "Alpha.exe");

        let set = locate_artifacts(dir.path()).await.expect("scan succeeds");
        assert!(set.binary_path().ends_with("Alpha.exe"));
    }

    #[tokio::test]
    async fn directories_are_not_artifacts() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir(dir.path().join("Fake.exe")).expect("create dir");
        touch(dir.path(), "Real.exe");

        let set = locate_artifacts(dir.path()).await.expect("scan succeeds");
        assert!(set.binary_path().ends_with("Real.exe"));
    }

    #[tokio::test]
    async fn checksum_matches_known_value() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("payload.bin");
        std::fs::write(&path, b"hello world").expect("write payload");

        let digest = calculate_sha256(&path).await.expect("hashing succeeds");
        assert_eq!(
            digest,
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[tokio::test]
    async fn checksums_are_recorded_for_found_artifacts() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(dir.path(), "App-installer.exe");
        touch(dir.path(), "App.exe");

        let set = locate_artifacts(dir.path()).await.expect("scan succeeds");
        let installer = set.installer.expect("installer found");
        let binary = set.binary.expect("binary found");
        assert_eq!(installer.sha256.len(), 64);
        assert_eq!(binary.sha256.len(), 64);
        assert_ne!(installer.sha256, binary.sha256);
    }
}
