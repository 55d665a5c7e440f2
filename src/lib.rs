//! # gitwalk: Repository Content Walker
//!
//! Materializes one snapshot of a remote git repository into an ephemeral
//! workspace, walks a selected subtree and hands every discovered file and
//! directory to caller-supplied interceptors.
//!
//! - **Shallow acquisition**: a single reference is fetched at depth 1
//! - **Three traversal modes**: single file, flat directory, recursive subtree
//! - **Size policy**: oversized files either fail the walk or are skipped
//! - **Scoped cleanup**: the workspace is removed on every exit path
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                    Walker (api::walker)                    │
//! ├──────────────┬───────────────┬────────────────────────────┤
//! │ Config       │ Workspace     │ Pipeline                   │
//! │ • builder    │ • temp dir    │ • resolver  → mode         │
//! │ • settings   │ • git2 fetch  │ • traversal → walkdir      │
//! │ • validation │ • checkout    │ • loader    → size policy  │
//! │              │               │ • dispatch  → interceptors │
//! └──────────────┴───────────────┴────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gitwalk::{WalkConfiguration, Walker};
//!
//! let config = WalkConfiguration::builder()
//!     .owner("meshery")
//!     .repository("meshery")
//!     .branch("master")
//!     .root("/install/kubernetes/**")
//!     .skip_oversized(true)
//!     .build();
//!
//! Walker::new(&config)
//!     .on_directory(|dir| {
//!         println!("entering {}", dir.path);
//!         Ok(())
//!     })
//!     .on_file(|file| {
//!         println!("{}: {} bytes", file.path, file.content.len());
//!         Ok(())
//!     })
//!     .walk()?;
//! # Ok::<(), gitwalk::WalkError>(())
//! ```

#![warn(missing_docs)]
#![warn(unsafe_code)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// Configuration, errors and the walk pipeline
pub mod core {
    //! Configuration, error types and the traversal pipeline.

    pub mod config;
    pub mod errors;
    pub mod pipeline;
}

// Workspace acquisition
pub mod io {
    //! Ephemeral workspace and remote fetch.

    pub mod remote;
    pub mod workspace;
}

// Public API
pub mod api {
    //! Walker facade and delivered records.

    pub mod model;
    pub mod walker;
}

// Re-export primary types for convenience
pub use api::model::{Directory, File, TraversalMode, WalkSummary};
pub use api::walker::Walker;
pub use crate::core::config::{WalkConfiguration, WalkConfigurationBuilder, WalkSettings};
pub use crate::core::errors::{ErrorKind, InterceptorFailure, NodeKind, Result, WalkError};
pub use tokio_util::sync::CancellationToken;

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
