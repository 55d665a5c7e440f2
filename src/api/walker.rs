//! Main walker facade.
//!
//! A [`Walker`] borrows an immutable [`WalkConfiguration`], collects the
//! interceptors and runs exactly one walk:
//!
//! `Configured -> Cloning -> RootResolved -> Traversing -> Completed | Failed -> Released`
//!
//! The workspace is released on every path out of [`Walker::walk`], including
//! unwinding out of a panicking interceptor.

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::api::model::{Directory, File, WalkSummary};
use crate::core::config::WalkConfiguration;
use crate::core::errors::Result;
use crate::core::pipeline::{resolve_root, traverse, Interceptors};
use crate::io::remote::fetch_snapshot;
use crate::io::workspace::Workspace;

/// One walk over a remote repository.
///
/// ```rust,no_run
/// use gitwalk::{WalkConfiguration, Walker};
///
/// let config = WalkConfiguration::builder()
///     .owner("acme")
///     .repository("charts")
///     .root("/manifests/**")
///     .build();
///
/// let summary = Walker::new(&config)
///     .on_file(|file| {
///         println!("{} ({} bytes)", file.path, file.size);
///         Ok(())
///     })
///     .walk()?;
/// println!("visited {} files", summary.files);
/// # Ok::<(), gitwalk::WalkError>(())
/// ```
pub struct Walker<'a> {
    config: &'a WalkConfiguration,
    interceptors: Interceptors<'a>,
    cancel: CancellationToken,
}

impl<'a> Walker<'a> {
    /// Create a walker for `config` with no interceptors.
    pub fn new(config: &'a WalkConfiguration) -> Self {
        Self {
            config,
            interceptors: Interceptors::default(),
            cancel: CancellationToken::new(),
        }
    }

    /// Register the file interceptor. Calls are sequential and ordered; an
    /// error aborts the walk.
    pub fn on_file<F>(mut self, interceptor: F) -> Self
    where
        F: FnMut(File) -> anyhow::Result<()> + Send + 'a,
    {
        self.interceptors.set_file(Box::new(interceptor));
        self
    }

    /// Register the directory interceptor. In flat mode calls may run
    /// concurrently; all of them finish before [`Walker::walk`] returns.
    pub fn on_directory<D>(mut self, interceptor: D) -> Self
    where
        D: Fn(Directory) -> anyhow::Result<()> + Send + Sync + 'a,
    {
        self.interceptors.set_directory(Box::new(interceptor));
        self
    }

    /// Abort the walk when `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Run the walk.
    pub fn walk(mut self) -> Result<WalkSummary> {
        self.config.validate()?;

        let workspace = Workspace::allocate(
            &self.config.workspace_parent(),
            self.config.repository(),
        )?;
        let outcome = self.run(&workspace);

        match (outcome, workspace.release()) {
            (Ok(summary), Ok(())) => {
                info!(
                    "Walk of {} finished: {} file(s), {} directory(ies), {} oversized skipped",
                    self.config.remote_url(),
                    summary.files,
                    summary.directories,
                    summary.skipped_oversized
                );
                Ok(summary)
            }
            (Ok(_), Err(cleanup)) => Err(cleanup),
            (Err(err), cleanup) => {
                if let Err(cleanup) = cleanup {
                    warn!("{}", cleanup);
                }
                warn!("Walk of {} failed: {}", self.config.remote_url(), err);
                Err(err)
            }
        }
    }

    fn run(&mut self, workspace: &Workspace) -> Result<WalkSummary> {
        fetch_snapshot(workspace.path(), self.config, &self.cancel)?;
        let root = resolve_root(workspace.path(), self.config)?;
        traverse(
            workspace.path(),
            self.config,
            &root,
            &mut self.interceptors,
            &self.cancel,
        )
    }
}
