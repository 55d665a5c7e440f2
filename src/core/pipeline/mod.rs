//! Walk Pipeline Module
//!
//! Everything that happens after the snapshot has been checked out.
//!
//! ## Stages
//!
//! 1. **Root resolution** ([`resolver`]): classify the root and pick a [`TraversalMode`]
//! 2. **Traversal** ([`traversal`]): visit entries in lexical order
//! 3. **Content loading** ([`loader`]): apply the size and read policy per file
//! 4. **Dispatch** ([`dispatch`]): hand nodes to the caller's interceptors
//!
//! [`TraversalMode`]: crate::api::model::TraversalMode

pub mod dispatch;
pub mod loader;
pub mod resolver;
pub mod traversal;

use std::path::Path;

pub use dispatch::{DirectoryInterceptor, FileInterceptor, Interceptors};
pub use loader::{load_file, LoadOutcome, SizePolicy};
pub use resolver::{resolve_root, ResolvedRoot};
pub use traversal::traverse;

/// Repository metadata directory, never visited.
pub const METADATA_DIR: &str = ".git";

/// Name and `/`-separated workspace-relative path of `path`.
///
/// The workspace root itself has an empty path and takes `root_name`.
pub(crate) fn node_identity(workspace: &Path, path: &Path, root_name: &str) -> (String, String) {
    let relative = path.strip_prefix(workspace).unwrap_or(path);
    let joined = relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");

    let name = if joined.is_empty() {
        root_name.to_string()
    } else {
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| root_name.to_string())
    };

    (name, joined)
}
