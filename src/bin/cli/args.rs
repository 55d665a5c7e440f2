//! CLI argument definitions for the gitwalk binary.

use clap::Parser;
use std::path::PathBuf;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Walk a remote git repository and print every file and directory as JSON lines
#[derive(Parser, Debug)]
#[command(name = "gitwalk")]
#[command(version = VERSION)]
#[command(about = "Walk a subtree of a remote git repository")]
#[command(long_about = "
Clone one reference of a remote repository into a temporary workspace, walk
the selected subtree and print one JSON object per file or directory.

Common Usage:

  # Immediate children of a directory
  gitwalk meshery/meshery --root /install

  # Whole subtree, skipping files above 1 MB
  gitwalk meshery/meshery --root '/install/**' --max-file-size 1000000 --skip-oversized

  # A tag, listing names only
  gitwalk acme/charts --reference refs/tags/v1.2.0 --root '/**' --skip-read

  # Settings from a YAML file, owner/repository overridden
  gitwalk acme/charts --config walk.yaml
")]
pub struct Cli {
    /// Repository as OWNER/REPO (may come from --config instead)
    pub target: Option<String>,

    /// Remote host, scheme included
    #[arg(long)]
    pub host: Option<String>,

    /// Branch to fetch
    #[arg(short, long)]
    pub branch: Option<String>,

    /// Fully qualified reference to fetch instead of the branch
    #[arg(long)]
    pub reference: Option<String>,

    /// Root path inside the repository; a trailing /** walks recursively
    #[arg(short, long)]
    pub root: Option<String>,

    /// Maximum file size in bytes
    #[arg(long)]
    pub max_file_size: Option<u64>,

    /// Deliver files without their content
    #[arg(long)]
    pub skip_read: bool,

    /// Skip files above the size limit instead of failing
    #[arg(long)]
    pub skip_oversized: bool,

    /// YAML file with walk settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory in which the temporary workspace is created
    #[arg(long)]
    pub workspace_dir: Option<PathBuf>,

    /// Cancel the walk after this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Enable verbose logging for debugging
    #[arg(short, long)]
    pub verbose: bool,
}
