//! Walk configuration.
//!
//! [`WalkConfigurationBuilder`] accumulates parameters fluently and is consumed
//! by [`WalkConfigurationBuilder::build`], producing an immutable
//! [`WalkConfiguration`] snapshot. Validation is deferred until a walk starts so
//! that a builder can be assembled in any order.
//!
//! Settings can also be loaded from YAML through [`WalkSettings`]:
//!
//! ```yaml
//! owner: acme
//! repository: charts
//! root: /manifests/**
//! max_file_size_bytes: 1048576
//! skip_oversized: true
//! ```

pub mod validation;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, WalkError};

pub use validation::{
    validate_contained_path, validate_non_empty, validate_positive_u64, validate_reference_name,
};

/// Remote host used when none is configured.
pub const DEFAULT_HOST: &str = "https://github.com";

/// Branch fetched when neither a branch nor a reference is configured.
pub const DEFAULT_BRANCH: &str = "master";

/// Default maximum size of a file that will be delivered (~50 MB).
pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 50_000_000;

/// Suffix of a root path that switches the walk into recursive mode.
pub const RECURSIVE_MARKER: &str = "/**";

/// Immutable parameters of one walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkConfiguration {
    host: String,
    owner: String,
    repository: String,
    branch: String,
    reference: Option<String>,
    root: String,
    recurse: bool,
    max_file_size_bytes: u64,
    skip_read: bool,
    skip_oversized: bool,
    verbose_logging: bool,
    workspace_parent: Option<PathBuf>,
}

impl WalkConfiguration {
    /// Start a new builder with default values.
    pub fn builder() -> WalkConfigurationBuilder {
        WalkConfigurationBuilder::default()
    }

    /// Remote server, e.g. `https://github.com`.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Repository owner or organisation.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name.
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Branch fetched when no explicit reference is set.
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Explicit reference, overriding the branch.
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    /// Normalized root, always starting with `/` and without the recursive marker.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Whether the subtree under the root is walked recursively.
    pub fn is_recursive(&self) -> bool {
        self.recurse
    }

    /// Files larger than this many bytes are skipped or rejected.
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_bytes
    }

    /// Deliver files without reading their content.
    pub fn skip_read(&self) -> bool {
        self.skip_read
    }

    /// Silently skip oversized files instead of failing.
    pub fn skip_oversized(&self) -> bool {
        self.skip_oversized
    }

    /// Emit per-entry and fetch progress logs at `info` level.
    pub fn verbose_logging(&self) -> bool {
        self.verbose_logging
    }

    /// Directory under which workspaces are created.
    pub fn workspace_parent(&self) -> PathBuf {
        self.workspace_parent
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }

    /// Remote location composed from host, owner and repository.
    pub fn remote_url(&self) -> String {
        format!(
            "{}/{}/{}",
            self.host.trim_end_matches('/'),
            self.owner,
            self.repository
        )
    }

    /// Fully qualified reference that is fetched.
    pub fn fetch_ref(&self) -> String {
        match &self.reference {
            Some(reference) => reference.clone(),
            None => format!("refs/heads/{}", self.branch),
        }
    }

    /// Root relative to the workspace, without the leading separator.
    pub fn relative_root(&self) -> &Path {
        Path::new(self.root.trim_start_matches('/'))
    }

    /// Validate configuration settings.
    ///
    /// Called at the start of every walk, before any network access.
    pub fn validate(&self) -> Result<()> {
        validate_positive_u64(self.max_file_size_bytes, "max_file_size_bytes")?;
        validate_non_empty(&self.host, "host")?;
        validate_non_empty(&self.owner, "owner")?;
        validate_non_empty(&self.repository, "repository")?;
        validate_contained_path(&self.root, "root")?;

        match &self.reference {
            Some(reference) => validate_reference_name(reference, "reference")?,
            None => {
                validate_non_empty(&self.branch, "branch")?;
                validate_reference_name(&self.fetch_ref(), "branch")?;
            }
        }

        Ok(())
    }
}

/// Fluent builder for [`WalkConfiguration`].
#[derive(Debug, Clone)]
pub struct WalkConfigurationBuilder {
    config: WalkConfiguration,
}

impl Default for WalkConfigurationBuilder {
    fn default() -> Self {
        Self {
            config: WalkConfiguration {
                host: DEFAULT_HOST.to_string(),
                owner: String::new(),
                repository: String::new(),
                branch: DEFAULT_BRANCH.to_string(),
                reference: None,
                root: "/".to_string(),
                recurse: false,
                max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_BYTES,
                skip_read: false,
                skip_oversized: false,
                verbose_logging: false,
                workspace_parent: None,
            },
        }
    }
}

impl WalkConfigurationBuilder {
    /// Set the remote host (scheme included), e.g. `https://gitlab.com`.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the repository owner.
    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.config.owner = owner.into();
        self
    }

    /// Set the repository name.
    pub fn repository(mut self, repository: impl Into<String>) -> Self {
        self.config.repository = repository.into();
        self
    }

    /// Set the branch to fetch.
    pub fn branch(mut self, branch: impl Into<String>) -> Self {
        self.config.branch = branch.into();
        self
    }

    /// Fetch this fully qualified reference instead of the branch.
    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.config.reference = Some(reference.into());
        self
    }

    /// Set the root node the walk starts from.
    ///
    /// A leading `/` is added when missing. A trailing `/**` enables recursive
    /// mode and is removed from the stored root.
    pub fn root(mut self, root: impl AsRef<str>) -> Self {
        let (root, recursive) = normalize_root(root.as_ref());
        self.config.root = root;
        if recursive {
            self.config.recurse = true;
        }
        self
    }

    /// Enable or disable recursive mode explicitly.
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.config.recurse = recursive;
        self
    }

    /// Set the maximum file size in bytes.
    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.config.max_file_size_bytes = bytes;
        self
    }

    /// Deliver files without reading their content.
    pub fn skip_read(mut self, skip: bool) -> Self {
        self.config.skip_read = skip;
        self
    }

    /// Skip oversized files instead of failing the walk.
    pub fn skip_oversized(mut self, skip: bool) -> Self {
        self.config.skip_oversized = skip;
        self
    }

    /// Enable verbose logging.
    pub fn verbose_logging(mut self, verbose: bool) -> Self {
        self.config.verbose_logging = verbose;
        self
    }

    /// Create workspaces under this directory instead of the platform temp dir.
    pub fn workspace_parent(mut self, parent: impl Into<PathBuf>) -> Self {
        self.config.workspace_parent = Some(parent.into());
        self
    }

    /// Freeze the accumulated parameters.
    pub fn build(self) -> WalkConfiguration {
        self.config
    }
}

/// Normalize a configured root, returning it together with the recursion flag.
pub fn normalize_root(root: &str) -> (String, bool) {
    let mut root = if root.starts_with('/') {
        root.to_string()
    } else {
        format!("/{root}")
    };

    let recursive = root.ends_with(RECURSIVE_MARKER);
    if recursive {
        root.truncate(root.len() - RECURSIVE_MARKER.len());
        if root.is_empty() {
            root.push('/');
        }
    }

    (root, recursive)
}

/// Serializable walk settings, typically read from a YAML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkSettings {
    /// Remote host
    #[serde(default = "WalkSettings::default_host")]
    pub host: String,
    /// Repository owner
    #[serde(default)]
    pub owner: String,
    /// Repository name
    #[serde(default)]
    pub repository: String,
    /// Branch to fetch
    #[serde(default = "WalkSettings::default_branch")]
    pub branch: String,
    /// Explicit reference overriding the branch
    #[serde(default)]
    pub reference: Option<String>,
    /// Root path, optionally ending with `/**`
    #[serde(default = "WalkSettings::default_root")]
    pub root: String,
    /// Maximum file size in bytes
    #[serde(default = "WalkSettings::default_max_file_size_bytes")]
    pub max_file_size_bytes: u64,
    /// Deliver files without content
    #[serde(default)]
    pub skip_read: bool,
    /// Skip oversized files instead of failing
    #[serde(default)]
    pub skip_oversized: bool,
    /// Verbose logging
    #[serde(default)]
    pub verbose_logging: bool,
    /// Parent directory of the ephemeral workspace
    #[serde(default)]
    pub workspace_parent: Option<PathBuf>,
}

impl Default for WalkSettings {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            owner: String::new(),
            repository: String::new(),
            branch: Self::default_branch(),
            reference: None,
            root: Self::default_root(),
            max_file_size_bytes: Self::default_max_file_size_bytes(),
            skip_read: false,
            skip_oversized: false,
            verbose_logging: false,
            workspace_parent: None,
        }
    }
}

impl WalkSettings {
    fn default_host() -> String {
        DEFAULT_HOST.to_string()
    }

    fn default_branch() -> String {
        DEFAULT_BRANCH.to_string()
    }

    fn default_root() -> String {
        "/".to_string()
    }

    const fn default_max_file_size_bytes() -> u64 {
        DEFAULT_MAX_FILE_SIZE_BYTES
    }

    /// Parse settings from a YAML document.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| WalkError::config(format!("Invalid walk settings: {e}")))
    }

    /// Load settings from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            WalkError::io(format!("Failed to read config file: {}", path.display()), e)
        })?;
        Self::from_yaml_str(&content)
    }

    /// Convert into a builder so individual values can still be overridden.
    pub fn into_builder(self) -> WalkConfigurationBuilder {
        let mut builder = WalkConfiguration::builder()
            .host(self.host)
            .owner(self.owner)
            .repository(self.repository)
            .branch(self.branch)
            .root(self.root)
            .max_file_size(self.max_file_size_bytes)
            .skip_read(self.skip_read)
            .skip_oversized(self.skip_oversized)
            .verbose_logging(self.verbose_logging);

        if let Some(reference) = self.reference {
            builder = builder.reference(reference);
        }
        if let Some(parent) = self.workspace_parent {
            builder = builder.workspace_parent(parent);
        }
        builder
    }
}
