//! JSON-lines rendering of walked nodes.

use std::borrow::Cow;
use std::io::Write;

use console::style;
use serde::Serialize;

use gitwalk::{Directory, File, WalkSummary};

/// One line of output.
#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeRecord<'a> {
    /// A delivered file
    File {
        name: &'a str,
        path: &'a str,
        size: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        content: Option<Cow<'a, str>>,
    },
    /// A delivered directory
    Directory { name: &'a str, path: &'a str },
}

impl<'a> NodeRecord<'a> {
    pub fn file(file: &'a File, with_content: bool) -> Self {
        Self::File {
            name: &file.name,
            path: &file.path,
            size: file.size,
            content: with_content.then(|| file.content_str()),
        }
    }

    pub fn directory(directory: &'a Directory) -> Self {
        Self::Directory {
            name: &directory.name,
            path: &directory.path,
        }
    }
}

/// Write a record as a single line. Safe to call from several threads.
pub fn emit(record: &NodeRecord<'_>) -> anyhow::Result<()> {
    let line = serde_json::to_string(record)?;
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{line}")?;
    Ok(())
}

/// Human-readable summary for stderr.
pub fn summary_line(summary: &WalkSummary) -> String {
    format!(
        "{} {} mode: {} file(s), {} directory(ies), {} oversized skipped",
        style("✓").green().bold(),
        summary.mode,
        summary.files,
        summary.directories,
        summary.skipped_oversized
    )
}
