//! Traversal engine for the three walk modes.

use std::fs;
use std::io;
use std::path::Path;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use crate::api::model::{Directory, TraversalMode, WalkSummary};
use crate::core::config::WalkConfiguration;
use crate::core::errors::{Result, WalkError};

use super::dispatch::{
    deliver_directory, deliver_file, DirectoryTaskGroup, FileInterceptor, Interceptors,
};
use super::loader::{load_file, LoadOutcome, SizePolicy};
use super::resolver::ResolvedRoot;
use super::{node_identity, METADATA_DIR};

type DirectoryHandler<'t, 'a> =
    &'t (dyn Fn(Directory) -> anyhow::Result<()> + Send + Sync + 'a);

/// Walk `root` inside `workspace`, delivering nodes to `interceptors`.
pub fn traverse(
    workspace: &Path,
    config: &WalkConfiguration,
    root: &ResolvedRoot,
    interceptors: &mut Interceptors<'_>,
    cancel: &CancellationToken,
) -> Result<WalkSummary> {
    let Interceptors { file, directory } = interceptors;
    let mut traversal = Traversal {
        workspace,
        repository: config.repository(),
        policy: SizePolicy::from_config(config),
        verbose: config.verbose_logging(),
        cancel,
        file_interceptor: file,
        directory_interceptor: directory.as_deref(),
        summary: WalkSummary::new(root.mode),
    };

    match root.mode {
        TraversalMode::SingleFile => traversal.walk_single(&root.path)?,
        TraversalMode::FlatDirectory => traversal.walk_flat(&root.path)?,
        TraversalMode::RecursiveSubtree => traversal.walk_recursive(&root.path)?,
    }

    Ok(traversal.summary)
}

struct Traversal<'t, 'a> {
    workspace: &'t Path,
    repository: &'t str,
    policy: SizePolicy,
    verbose: bool,
    cancel: &'t CancellationToken,
    file_interceptor: &'t mut Option<FileInterceptor<'a>>,
    directory_interceptor: Option<DirectoryHandler<'t, 'a>>,
    summary: WalkSummary,
}

impl<'t, 'a> Traversal<'t, 'a> {
    fn walk_single(&mut self, path: &Path) -> Result<()> {
        self.check_cancelled()?;
        let size = fs::metadata(path)
            .map_err(|e| WalkError::io(format!("Failed to stat {}", path.display()), e))?
            .len();
        self.visit_file(path, size)
    }

    /// Pre-order, lexically sorted walk; every interceptor call is inline.
    fn walk_recursive(&mut self, root: &Path) -> Result<()> {
        let metadata_dir = self.workspace.join(METADATA_DIR);
        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.path() != metadata_dir);

        for entry in walker {
            self.check_cancelled()?;
            let entry = entry.map_err(walk_error)?;
            let file_type = entry.file_type();

            if file_type.is_dir() {
                let node = self.directory_node(entry.path());
                self.trace_entry("directory", &node.path);
                self.summary.directories += 1;
                if let Some(handler) = self.directory_interceptor {
                    deliver_directory(handler, node)?;
                }
            } else if file_type.is_file() {
                let size = entry.metadata().map_err(walk_error)?.len();
                self.visit_file(entry.path(), size)?;
            } else {
                self.skip_special(&entry);
            }
        }

        Ok(())
    }

    /// Immediate children only. Directory interceptors run concurrently and
    /// are joined before this returns; files stay sequential on the calling
    /// thread.
    fn walk_flat(&mut self, root: &Path) -> Result<()> {
        let entries = self.list_children(root)?;
        let directory = self.directory_interceptor;
        let mut group = DirectoryTaskGroup::default();

        let outcome = rayon::in_place_scope(|scope| -> Result<()> {
            for entry in entries {
                self.check_cancelled()?;
                let file_type = entry.file_type();

                if file_type.is_dir() {
                    let node = self.directory_node(entry.path());
                    self.trace_entry("directory", &node.path);
                    self.summary.directories += 1;
                    if let Some(handler) = directory {
                        group.spawn(scope, handler, node);
                    }
                } else if file_type.is_file() {
                    let size = entry.metadata().map_err(walk_error)?.len();
                    self.visit_file(entry.path(), size)?;
                } else {
                    self.skip_special(&entry);
                }
            }
            Ok(())
        });

        let spawned = group.spawned();
        let failures = group.join();
        if spawned > 0 {
            info!(
                "{} directory interceptor(s) completed, {} failed",
                spawned,
                failures.len()
            );
        }

        match outcome {
            Err(err) => Err(err.with_directory_failures(failures)),
            Ok(()) if failures.is_empty() => Ok(()),
            Ok(()) => Err(WalkError::Interceptors { failures }),
        }
    }

    fn list_children(&self, root: &Path) -> Result<Vec<DirEntry>> {
        let metadata_dir = self.workspace.join(METADATA_DIR);
        WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.path() != metadata_dir)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(walk_error)
    }

    fn visit_file(&mut self, path: &Path, size: u64) -> Result<()> {
        match load_file(self.workspace, path, size, &self.policy)? {
            LoadOutcome::Deliver(file) => {
                self.trace_entry("file", &file.path);
                self.summary.files += 1;
                deliver_file(self.file_interceptor, file)?;
            }
            LoadOutcome::Skipped => self.summary.skipped_oversized += 1,
        }
        Ok(())
    }

    fn directory_node(&self, path: &Path) -> Directory {
        let (name, path) = node_identity(self.workspace, path, self.repository);
        Directory { name, path }
    }

    fn skip_special(&self, entry: &DirEntry) {
        debug!(
            "Skipping {} (not a regular file or directory)",
            entry.path().display()
        );
    }

    fn trace_entry(&self, kind: &str, path: &str) {
        if self.verbose {
            info!("Walking {} {}", kind, path);
        } else {
            debug!("Walking {} {}", kind, path);
        }
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(WalkError::Cancelled { stage: "traversal" });
        }
        Ok(())
    }
}

fn walk_error(err: walkdir::Error) -> WalkError {
    let location = err
        .path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "workspace".to_string());
    WalkError::io(format!("Failed to walk {location}"), io::Error::from(err))
}
