//! Content loading under the size and read policy.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::api::model::File;
use crate::core::config::WalkConfiguration;
use crate::core::errors::{Result, WalkError};

use super::node_identity;

/// Per-walk file policy derived from the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizePolicy {
    /// Largest size in bytes that is still delivered
    pub max_file_size_bytes: u64,
    /// Skip oversized files instead of failing
    pub skip_oversized: bool,
    /// Deliver files without content
    pub skip_read: bool,
}

impl SizePolicy {
    /// Extract the policy from a configuration.
    pub fn from_config(config: &WalkConfiguration) -> Self {
        Self {
            max_file_size_bytes: config.max_file_size_bytes(),
            skip_oversized: config.skip_oversized(),
            skip_read: config.skip_read(),
        }
    }
}

/// What the loader decided for one candidate file.
#[derive(Debug)]
pub enum LoadOutcome {
    /// The file passed the policy and should be delivered
    Deliver(File),
    /// The file was oversized and skipping is enabled
    Skipped,
}

/// Apply `policy` to the file at `path` and load it when appropriate.
///
/// `size` is the length reported by the directory listing.
pub fn load_file(
    workspace: &Path,
    path: &Path,
    size: u64,
    policy: &SizePolicy,
) -> Result<LoadOutcome> {
    let (name, relative) = node_identity(workspace, path, "");

    if size > policy.max_file_size_bytes {
        warn!(
            "File {} exceeds the size limit of {} bytes ({} bytes)",
            relative, policy.max_file_size_bytes, size
        );
        if policy.skip_oversized {
            debug!("Skipping oversized file {}", relative);
            return Ok(LoadOutcome::Skipped);
        }
        return Err(WalkError::Oversized {
            path: relative,
            size,
            limit: policy.max_file_size_bytes,
        });
    }

    let content = if policy.skip_read {
        Vec::new()
    } else {
        fs::read(path)
            .map_err(|e| WalkError::io(format!("Failed to read file: {}", relative), e))?
    };

    Ok(LoadOutcome::Deliver(File {
        name,
        path: relative,
        size,
        content,
    }))
}
