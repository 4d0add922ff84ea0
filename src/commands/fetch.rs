//! Fetch command handler - clone or refresh the stub repository.

use crate::commands::CommandContext;
use crate::error::Result;
use crate::git::{sync_stub_repo, SyncOutcome};

pub fn run_fetch(ctx: &CommandContext) -> Result<String> {
    let stubs = &ctx.config.stubs;
    let outcome = sync_stub_repo(stubs)?;
    let verb = match outcome {
        SyncOutcome::Cloned => "cloned",
        SyncOutcome::Refreshed => "refreshed",
        SyncOutcome::UsedCache => "cached",
    };
    Ok(format!("{}: {}\n", verb, stubs.stub_dir().display()))
}
