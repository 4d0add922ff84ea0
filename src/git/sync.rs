//! Clone-or-refresh of the external stub repository

use std::fs;
use std::path::Path;

use super::{git_command, is_checkout_root};
use crate::config::StubSourceConfig;
use crate::error::{Result, StubscanError};

/// What happened to the local checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Fresh clone
    Cloned,
    /// Existing checkout fetched and reset to the remote branch
    Refreshed,
    /// Refresh failed (e.g. offline); the cached checkout is used as-is
    UsedCache,
}

/// Make sure the stub checkout exists and is as fresh as possible.
///
/// An existing checkout is fetched and hard-reset to `origin/<branch>`; any
/// failure there degrades to the cached copy. A cache directory that is not
/// itself a checkout root (a plain folder, or one nested in another
/// repository) is never reset. Without a checkout, a clone is attempted and
/// its failure is fatal.
pub fn sync_stub_repo(source: &StubSourceConfig) -> Result<SyncOutcome> {
    let checkout = source.cache_dir.as_path();

    if checkout.is_dir() {
        return Ok(refresh(checkout, &source.branch));
    }

    clone(&source.repository, checkout)?;
    Ok(SyncOutcome::Cloned)
}

fn refresh(checkout: &Path, branch: &str) -> SyncOutcome {
    if !is_checkout_root(checkout) {
        tracing::warn!(
            "{} is not the root of a git checkout, using it as-is",
            checkout.display()
        );
        return SyncOutcome::UsedCache;
    }

    let remote_ref = format!("origin/{}", branch);
    let refreshed = git_command(&["fetch"], Some(checkout))
        .and_then(|_| git_command(&["reset", "--hard", &remote_ref], Some(checkout)));

    match refreshed {
        Ok(_) => {
            tracing::info!("Refreshed stub checkout at {}", checkout.display());
            SyncOutcome::Refreshed
        }
        Err(e) => {
            tracing::warn!("Could not refresh stubs ({}), using cached checkout", e);
            SyncOutcome::UsedCache
        }
    }
}

fn clone(repository: &str, checkout: &Path) -> Result<()> {
    let parent = checkout
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(|e| StubscanError::IoError {
        path: parent.to_path_buf(),
        message: e.to_string(),
    })?;

    let target = checkout.to_string_lossy();
    tracing::info!("Cloning {} into {}", repository, target);
    git_command(&["clone", repository, &target], None).map_err(|e| {
        StubscanError::StubSourceUnavailable {
            message: format!("cannot clone {}: {}", repository, e),
        }
    })?;
    Ok(())
}
