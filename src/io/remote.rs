//! Shallow, single-reference fetch of a remote repository into a workspace.
//!
//! Only the configured reference is fetched. It is stored under a private ref
//! and then checked out detached, leaving a plain working tree plus `.git`.

use std::path::Path;

use git2::build::CheckoutBuilder;
use git2::{AutotagOption, FetchOptions, Oid, Progress, RemoteCallbacks, Repository};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::core::config::WalkConfiguration;
use crate::core::errors::{Result, WalkError};

/// Local ref the fetched snapshot is stored under.
const SNAPSHOT_REF: &str = "refs/gitwalk/snapshot";

/// Fetch the configured reference of the remote into `dest` and check it out.
///
/// Returns the id of the checked out commit.
pub fn fetch_snapshot(
    dest: &Path,
    config: &WalkConfiguration,
    cancel: &CancellationToken,
) -> Result<Oid> {
    let url = config.remote_url();
    let fetch_ref = config.fetch_ref();

    if cancel.is_cancelled() {
        return Err(WalkError::Cancelled { stage: "clone" });
    }

    info!("Cloning {} ({})", url, fetch_ref);
    let repo = Repository::init(dest).map_err(|e| WalkError::acquisition(&url, e))?;
    let mut remote = repo
        .remote_anonymous(&url)
        .map_err(|e| WalkError::acquisition(&url, e))?;

    let verbose = config.verbose_logging();
    let mut last_reported = 0usize;
    let mut callbacks = RemoteCallbacks::new();
    callbacks.transfer_progress(|progress| {
        if cancel.is_cancelled() {
            return false;
        }
        if verbose {
            report_progress(&progress, &mut last_reported);
        }
        true
    });

    let mut options = FetchOptions::new();
    options.remote_callbacks(callbacks);
    options.download_tags(AutotagOption::None);
    if supports_shallow(&url) {
        options.depth(1);
    }

    let refspec = format!("+{fetch_ref}:{SNAPSHOT_REF}");
    remote
        .fetch(&[refspec.as_str()], Some(&mut options), None)
        .map_err(|e| {
            if cancel.is_cancelled() {
                WalkError::Cancelled { stage: "clone" }
            } else {
                WalkError::acquisition(&url, e)
            }
        })?;

    let commit = repo
        .find_reference(SNAPSHOT_REF)
        .and_then(|reference| reference.peel_to_commit())
        .map_err(|_| {
            WalkError::acquisition_message(&url, format!("reference '{fetch_ref}' was not found"))
        })?;

    repo.checkout_tree(commit.as_object(), Some(CheckoutBuilder::new().force()))
        .map_err(|e| WalkError::acquisition(&url, e))?;
    repo.set_head_detached(commit.id())
        .map_err(|e| WalkError::acquisition(&url, e))?;

    info!("Clone of {} complete at {}", url, commit.id());
    Ok(commit.id())
}

/// Shallow negotiation is only available over network transports.
pub(crate) fn supports_shallow(url: &str) -> bool {
    url.contains("://") && !url.starts_with("file://")
}

fn report_progress(progress: &Progress<'_>, last_reported: &mut usize) {
    let total = progress.total_objects();
    if total == 0 {
        return;
    }
    let received = progress.received_objects();
    let percent = received * 100 / total;
    if percent >= *last_reported + 10 || (received == total && *last_reported < 100) {
        *last_reported = percent;
        info!(
            "Receiving objects: {}% ({}/{}), {} bytes",
            percent,
            received,
            total,
            progress.received_bytes()
        );
    } else {
        debug!("Receiving objects: {}/{}", received, total);
    }
}
