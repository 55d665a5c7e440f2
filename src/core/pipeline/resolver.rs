//! Root resolution: decides which traversal mode a walk uses.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::api::model::TraversalMode;
use crate::core::config::WalkConfiguration;
use crate::core::errors::{Result, WalkError};

use super::METADATA_DIR;

/// Root of a walk after it has been located inside the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoot {
    /// Selected traversal mode
    pub mode: TraversalMode,
    /// Canonical absolute path of the root
    pub path: PathBuf,
}

/// Locate the configured root inside `workspace` and classify it.
///
/// `workspace` must be canonical.
pub fn resolve_root(workspace: &Path, config: &WalkConfiguration) -> Result<ResolvedRoot> {
    let candidate = workspace.join(config.relative_root());
    let path = candidate.canonicalize().map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => {
            WalkError::resolution(config.root(), "path does not exist in the repository")
        }
        _ => WalkError::resolution(config.root(), e.to_string()),
    })?;

    if !path.starts_with(workspace) {
        return Err(WalkError::resolution(
            config.root(),
            "path resolves outside the workspace",
        ));
    }
    if path.starts_with(workspace.join(METADATA_DIR)) {
        return Err(WalkError::resolution(
            config.root(),
            "repository metadata cannot be walked",
        ));
    }

    let metadata = fs::metadata(&path)
        .map_err(|e| WalkError::resolution(config.root(), e.to_string()))?;

    let mode = if metadata.is_file() {
        TraversalMode::SingleFile
    } else if metadata.is_dir() && config.is_recursive() {
        TraversalMode::RecursiveSubtree
    } else if metadata.is_dir() {
        TraversalMode::FlatDirectory
    } else {
        return Err(WalkError::resolution(
            config.root(),
            "path is neither a file nor a directory",
        ));
    };

    info!("Resolved root '{}' as {}", config.root(), mode);
    Ok(ResolvedRoot { mode, path })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::ErrorKind;
    use tempfile::TempDir;

    fn workspace() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        fs::create_dir_all(root.join("manifests/sub")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::write(root.join("manifests/a.yaml"), "kind: A").unwrap();
        (dir, root)
    }

    fn config(root: &str) -> WalkConfiguration {
        WalkConfiguration::builder()
            .owner("acme")
            .repository("charts")
            .root(root)
            .build()
    }

    #[test]
    fn file_root_is_single_file_even_with_marker() {
        let (_dir, ws) = workspace();
        let resolved = resolve_root(&ws, &config("/manifests/a.yaml")).unwrap();
        assert_eq!(resolved.mode, TraversalMode::SingleFile);
        assert_eq!(resolved.path, ws.join("manifests/a.yaml"));
    }

    #[test]
    fn directory_root_mode_follows_recursion_flag() {
        let (_dir, ws) = workspace();
        let flat = resolve_root(&ws, &config("/manifests")).unwrap();
        assert_eq!(flat.mode, TraversalMode::FlatDirectory);

        let recursive = resolve_root(&ws, &config("/manifests/**")).unwrap();
        assert_eq!(recursive.mode, TraversalMode::RecursiveSubtree);
    }

    #[test]
    fn workspace_root_resolves_to_itself() {
        let (_dir, ws) = workspace();
        let resolved = resolve_root(&ws, &config("/")).unwrap();
        assert_eq!(resolved.path, ws);
        assert_eq!(resolved.mode, TraversalMode::FlatDirectory);
    }

    #[test]
    fn missing_root_is_a_resolution_error() {
        let (_dir, ws) = workspace();
        let err = resolve_root(&ws, &config("/nope/**")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Resolution);
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn metadata_directory_cannot_be_walked() {
        let (_dir, ws) = workspace();
        let err = resolve_root(&ws, &config("/.git")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Resolution);
    }

    #[cfg(unix)]
    #[test]
    fn symlink_escaping_workspace_is_rejected() {
        let (_dir, ws) = workspace();
        let outside = TempDir::new().unwrap();
        std::os::unix::fs::symlink(outside.path(), ws.join("escape")).unwrap();

        let err = resolve_root(&ws, &config("/escape")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Resolution);
        assert!(err.to_string().contains("outside the workspace"));
    }
}
