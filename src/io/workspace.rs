//! Ephemeral workspace holding one cloned snapshot.
//!
//! The directory is owned by a [`tempfile::TempDir`], so it is deleted when the
//! [`Workspace`] is released or dropped, including during unwinding.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tempfile::TempDir;
use tracing::debug;

use crate::core::errors::{Result, WalkError};

/// Ephemeral directory scoped to a single walk.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
    root: PathBuf,
}

impl Workspace {
    /// Create a fresh directory under `parent`, named after the repository and
    /// a nanosecond timestamp so concurrent walks never collide.
    pub fn allocate(parent: &Path, repository: &str) -> Result<Self> {
        fs::create_dir_all(parent).map_err(|e| {
            WalkError::io(
                format!("Failed to create workspace parent: {}", parent.display()),
                e,
            )
        })?;

        let nonce = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let prefix = format!("{}-{}-", sanitize(repository), nonce);
        let dir = tempfile::Builder::new()
            .prefix(&prefix)
            .tempdir_in(parent)
            .map_err(|e| WalkError::io("Failed to create workspace directory", e))?;

        // Canonical so that resolved roots can be checked with `starts_with`.
        let root = dir
            .path()
            .canonicalize()
            .map_err(|e| WalkError::io("Failed to canonicalize workspace directory", e))?;

        debug!("Allocated workspace {}", root.display());
        Ok(Self { dir, root })
    }

    /// Canonical path of the workspace root.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Delete the workspace, reporting any failure.
    pub fn release(self) -> Result<()> {
        let root = self.root;
        self.dir.close().map_err(|e| {
            WalkError::io(
                format!("Failed to remove workspace: {}", root.display()),
                e,
            )
        })?;
        debug!("Released workspace {}", root.display());
        Ok(())
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
