//! Records delivered to interceptors and the summary returned by a walk.

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;

/// A regular file discovered during a walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct File {
    /// File name, e.g. `deployment.yaml`
    pub name: String,
    /// Path relative to the workspace root, using `/` separators
    pub path: String,
    /// Size on disk in bytes
    pub size: u64,
    /// Full content; empty when reading is skipped
    #[serde(skip)]
    pub content: Vec<u8>,
}

impl File {
    /// Content decoded as UTF-8, replacing invalid sequences.
    pub fn content_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }
}

/// A directory discovered during a walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Directory {
    /// Directory name
    pub name: String,
    /// Path relative to the workspace root, using `/` separators
    pub path: String,
}

/// Strategy selected for a walk from the kind of its root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalMode {
    /// The root is a regular file
    SingleFile,
    /// The root is a directory; only its immediate children are visited
    FlatDirectory,
    /// The root is a directory walked depth-first
    RecursiveSubtree,
}

impl fmt::Display for TraversalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::SingleFile => "single-file",
            Self::FlatDirectory => "flat-directory",
            Self::RecursiveSubtree => "recursive-subtree",
        };
        f.write_str(label)
    }
}

/// Outcome of a successful walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalkSummary {
    /// Mode the root resolved to
    pub mode: TraversalMode,
    /// Files delivered to the file interceptor
    pub files: usize,
    /// Directories visited, whether or not a directory interceptor is registered
    pub directories: usize,
    /// Oversized files that were skipped
    pub skipped_oversized: usize,
}

impl WalkSummary {
    pub(crate) fn new(mode: TraversalMode) -> Self {
        Self {
            mode,
            files: 0,
            directories: 0,
            skipped_oversized: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_str_is_lossy() {
        let file = File {
            name: "blob.bin".into(),
            path: "blob.bin".into(),
            size: 3,
            content: vec![b'o', 0xff, b'k'],
        };
        assert_eq!(file.content_str(), "o\u{fffd}k");
    }

    #[test]
    fn traversal_mode_labels() {
        assert_eq!(TraversalMode::SingleFile.to_string(), "single-file");
        assert_eq!(TraversalMode::FlatDirectory.to_string(), "flat-directory");
        assert_eq!(
            TraversalMode::RecursiveSubtree.to_string(),
            "recursive-subtree"
        );
    }
}
