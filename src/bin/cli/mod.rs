//! CLI Module Organization
//!
//! - args: argument definitions
//! - output: JSON-lines rendering
//!
//! The walk itself is blocking, so it runs on tokio's blocking pool while the
//! async side waits for completion, Ctrl-C or the timeout.

pub mod args;
pub mod output;

use std::future;
use std::time::Duration;

use anyhow::{bail, Context};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use gitwalk::{WalkConfiguration, WalkSettings, WalkSummary, Walker};

pub use args::Cli;
use output::{emit, summary_line, NodeRecord};

/// Execute the walk described by `cli`.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = build_configuration(&cli)?;
    let timeout = cli.timeout.map(Duration::from_secs);
    let cancel = CancellationToken::new();

    let mut walk = tokio::task::spawn_blocking({
        let cancel = cancel.clone();
        move || walk_to_stdout(&config, cancel)
    });

    let summary = tokio::select! {
        result = &mut walk => result.context("walk task panicked")??,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, cancelling walk");
            cancel.cancel();
            walk.await.context("walk task panicked")??
        }
        _ = deadline(timeout) => {
            warn!("Timed out after {:?}, cancelling walk", timeout.unwrap_or_default());
            cancel.cancel();
            walk.await.context("walk task panicked")??
        }
    };

    eprintln!("{}", summary_line(&summary));
    Ok(())
}

fn walk_to_stdout(
    config: &WalkConfiguration,
    cancel: CancellationToken,
) -> anyhow::Result<WalkSummary> {
    let with_content = !config.skip_read();
    let summary = Walker::new(config)
        .with_cancellation(cancel)
        .on_directory(|directory| emit(&NodeRecord::directory(&directory)))
        .on_file(move |file| emit(&NodeRecord::file(&file, with_content)))
        .walk()?;
    Ok(summary)
}

async fn deadline(timeout: Option<Duration>) {
    match timeout {
        Some(duration) => tokio::time::sleep(duration).await,
        None => future::pending::<()>().await,
    }
}

/// Merge the optional settings file with command-line overrides.
pub fn build_configuration(cli: &Cli) -> anyhow::Result<WalkConfiguration> {
    let settings = match &cli.config {
        Some(path) => WalkSettings::from_yaml_file(path)?,
        None => WalkSettings::default(),
    };
    let mut builder = settings.into_builder();

    if let Some(target) = &cli.target {
        let (owner, repository) = parse_target(target)?;
        builder = builder.owner(owner).repository(repository);
    }
    if let Some(host) = &cli.host {
        builder = builder.host(host);
    }
    if let Some(branch) = &cli.branch {
        builder = builder.branch(branch);
    }
    if let Some(reference) = &cli.reference {
        builder = builder.reference(reference);
    }
    if let Some(root) = &cli.root {
        builder = builder.root(root);
    }
    if let Some(bytes) = cli.max_file_size {
        builder = builder.max_file_size(bytes);
    }
    if let Some(dir) = &cli.workspace_dir {
        builder = builder.workspace_parent(dir);
    }
    if cli.skip_read {
        builder = builder.skip_read(true);
    }
    if cli.skip_oversized {
        builder = builder.skip_oversized(true);
    }
    if cli.verbose {
        builder = builder.verbose_logging(true);
    }

    Ok(builder.build())
}

/// Split `OWNER/REPO`.
pub fn parse_target(target: &str) -> anyhow::Result<(&str, &str)> {
    match target.split_once('/') {
        Some((owner, repository))
            if !owner.is_empty() && !repository.is_empty() && !repository.contains('/') =>
        {
            Ok((owner, repository))
        }
        _ => bail!("expected OWNER/REPO, got '{target}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_target_accepts_owner_and_repository() {
        assert_eq!(parse_target("acme/charts").unwrap(), ("acme", "charts"));
        assert!(parse_target("acme").is_err());
        assert!(parse_target("/charts").is_err());
        assert!(parse_target("acme/charts/extra").is_err());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "gitwalk",
            "acme/charts",
            "--root",
            "/manifests/**",
            "--max-file-size",
            "1024",
            "--skip-oversized",
        ]);
        let config = build_configuration(&cli).unwrap();

        assert_eq!(config.owner(), "acme");
        assert_eq!(config.repository(), "charts");
        assert_eq!(config.root(), "/manifests");
        assert!(config.is_recursive());
        assert_eq!(config.max_file_size_bytes(), 1024);
        assert!(config.skip_oversized());
        assert!(!config.skip_read());
    }

    #[test]
    fn settings_file_is_overridden_by_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("walk.yaml");
        std::fs::write(
            &path,
            "owner: acme\nrepository: charts\nbranch: develop\nroot: /docs\n",
        )
        .unwrap();

        let cli = Cli::parse_from([
            "gitwalk",
            "--config",
            path.to_str().unwrap(),
            "--branch",
            "main",
        ]);
        let config = build_configuration(&cli).unwrap();
        assert_eq!(config.owner(), "acme");
        assert_eq!(config.branch(), "main");
        assert_eq!(config.root(), "/docs");
    }
}
