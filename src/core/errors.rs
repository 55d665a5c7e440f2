//! Error types for gitwalk.
//!
//! Every failure a walk can produce is a variant of [`WalkError`]. The variants
//! follow the order in which a walk can fail: configuration is checked first,
//! then the snapshot is acquired, the root resolved and finally the tree is
//! traversed while interceptors run.

use std::fmt;
use std::io;

use thiserror::Error;

/// Main result type for gitwalk operations.
pub type Result<T> = std::result::Result<T, WalkError>;

/// Boxed error carried by a failed interceptor.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Coarse classification of a [`WalkError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid parameter, detected before any network access
    Configuration,
    /// Fetch or clone failure
    Acquisition,
    /// The configured root cannot be used
    Resolution,
    /// A configured limit was exceeded
    Policy,
    /// One or more interceptors returned an error
    Handler,
    /// Local filesystem failure while traversing
    Io,
    /// The walk was cancelled through its token
    Cancelled,
}

/// Which interceptor produced an [`InterceptorFailure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// The file interceptor
    File,
    /// The directory interceptor
    Directory,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => f.write_str("file"),
            Self::Directory => f.write_str("directory"),
        }
    }
}

/// A single error returned by a caller-supplied interceptor.
#[derive(Error, Debug)]
#[error("{kind} interceptor failed for '{path}': {source}")]
pub struct InterceptorFailure {
    /// Interceptor that failed
    pub kind: NodeKind,
    /// Name of the node being delivered
    pub name: String,
    /// Workspace-relative path of the node
    pub path: String,
    /// Error returned by the interceptor
    #[source]
    pub source: BoxError,
}

impl InterceptorFailure {
    /// Wrap an interceptor error with the node it was raised for.
    pub fn new(
        kind: NodeKind,
        name: impl Into<String>,
        path: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            path: path.into(),
            source: source.into(),
        }
    }
}

/// Comprehensive error type for a walk.
#[derive(Error, Debug)]
pub enum WalkError {
    /// Invalid configuration
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error description
        message: String,
        /// Configuration field that caused the error
        field: Option<String>,
    },

    /// Fetching the remote snapshot failed
    #[error("Could not clone '{url}': {message}")]
    Acquisition {
        /// Remote location that was fetched
        url: String,
        /// Error description
        message: String,
        /// Underlying git error
        #[source]
        source: Option<git2::Error>,
    },

    /// The configured root could not be resolved inside the workspace
    #[error("Cannot resolve root '{root}': {message}")]
    Resolution {
        /// Root as configured
        root: String,
        /// Error description
        message: String,
    },

    /// A file exceeded the configured size limit
    #[error("File '{path}' is {size} bytes, exceeding the limit of {limit} bytes")]
    Oversized {
        /// Workspace-relative path of the file
        path: String,
        /// Size on disk
        size: u64,
        /// Configured maximum
        limit: u64,
    },

    /// The file interceptor failed
    #[error(transparent)]
    Interceptor(InterceptorFailure),

    /// One or more directory interceptors failed
    #[error("{} directory interceptor(s) failed; first: {}", failures.len(), first_failure(failures))]
    Interceptors {
        /// All collected failures, ordered by path
        failures: Vec<InterceptorFailure>,
    },

    /// A fatal error raised while directory interceptors were also failing
    #[error("{cause} ({} directory interceptor failure(s) also collected)", failures.len())]
    Compound {
        /// The error that aborted the walk
        cause: Box<WalkError>,
        /// Directory interceptor failures collected before the walk returned
        failures: Vec<InterceptorFailure>,
    },

    /// I/O failure inside the workspace
    #[error("I/O error: {message}")]
    Io {
        /// Human-readable error message
        message: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The walk was cancelled
    #[error("Walk cancelled during {stage}")]
    Cancelled {
        /// Stage that observed the cancellation
        stage: &'static str,
    },
}

fn first_failure(failures: &[InterceptorFailure]) -> String {
    failures
        .first()
        .map(ToString::to_string)
        .unwrap_or_default()
}

impl WalkError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            field: None,
        }
    }

    /// Create a new configuration error with field context
    pub fn config_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new acquisition error from a git failure
    pub fn acquisition(url: impl Into<String>, source: git2::Error) -> Self {
        Self::Acquisition {
            url: url.into(),
            message: source.message().to_string(),
            source: Some(source),
        }
    }

    /// Create a new acquisition error without an underlying git error
    pub fn acquisition_message(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Acquisition {
            url: url.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a new resolution error
    pub fn resolution(root: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Resolution {
            root: root.into(),
            message: message.into(),
        }
    }

    /// Create a new I/O error with context
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Combine a fatal error with directory interceptor failures.
    ///
    /// Nothing is wrapped when `failures` is empty.
    pub fn with_directory_failures(self, failures: Vec<InterceptorFailure>) -> Self {
        if failures.is_empty() {
            return self;
        }
        Self::Compound {
            cause: Box::new(self),
            failures,
        }
    }

    /// Taxonomy category of this error. A compound error reports its cause.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::Acquisition { .. } => ErrorKind::Acquisition,
            Self::Resolution { .. } => ErrorKind::Resolution,
            Self::Oversized { .. } => ErrorKind::Policy,
            Self::Interceptor(_) | Self::Interceptors { .. } => ErrorKind::Handler,
            Self::Compound { cause, .. } => cause.kind(),
            Self::Io { .. } => ErrorKind::Io,
            Self::Cancelled { .. } => ErrorKind::Cancelled,
        }
    }

    /// Directory interceptor failures carried by this error, if any.
    pub fn directory_failures(&self) -> &[InterceptorFailure] {
        match self {
            Self::Interceptors { failures } | Self::Compound { failures, .. } => failures,
            _ => &[],
        }
    }
}

impl From<InterceptorFailure> for WalkError {
    fn from(failure: InterceptorFailure) -> Self {
        Self::Interceptor(failure)
    }
}
