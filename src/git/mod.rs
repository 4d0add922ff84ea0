//! Git operations for obtaining the stub source tree
//!
//! Uses subprocess calls to git for maximum compatibility.

mod sync;

pub use sync::{sync_stub_repo, SyncOutcome};

use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{Result, StubscanError};

/// Run a git command and return stdout as string
pub fn git_command(args: &[&str], cwd: Option<&Path>) -> Result<String> {
    let mut cmd = Command::new("git");
    cmd.args(args).stdin(Stdio::null());

    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    let output = cmd.output().map_err(|e| StubscanError::GitError {
        message: format!("Failed to execute git: {}", e),
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(StubscanError::GitError {
            message: format!("git {} failed: {}", args.join(" "), stderr.trim()),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Check whether a directory is the top level of its own git work tree.
///
/// A directory nested inside some other repository is not a checkout root.
pub fn is_checkout_root(dir: &Path) -> bool {
    let Ok(top_level) = git_command(&["rev-parse", "--show-toplevel"], Some(dir)) else {
        return false;
    };
    match (fs::canonicalize(&top_level), fs::canonicalize(dir)) {
        (Ok(top_level), Ok(dir)) => top_level == dir,
        _ => false,
    }
}
