//! Extract command handler - stub tree to registry JSON.

use std::path::PathBuf;

use crate::cli::ExtractArgs;
use crate::commands::CommandContext;
use crate::error::Result;
use crate::extract::extract_stub_tree;
use crate::git::{sync_stub_repo, SyncOutcome};
use crate::manifest::VersionManifest;
use crate::schema::to_json_pretty;

pub fn run_extract(args: &ExtractArgs, ctx: &CommandContext) -> Result<String> {
    let stub_root = resolve_stub_root(args, ctx)?;
    let manifest_path = args
        .manifest
        .clone()
        .unwrap_or_else(|| ctx.config.extract.manifest_path.clone());

    let mut manifest = VersionManifest::load(&manifest_path)?;
    let registry = extract_stub_tree(
        &stub_root,
        &ctx.config.extract.privileged_namespace,
        &mut manifest,
    )?;

    // Render first: a failure must leave both stdout and the manifest untouched
    let output = to_json_pretty(&registry)?;
    manifest.save(&manifest_path)?;
    tracing::info!(
        "Extracted {} modules; manifest {} updated",
        registry.len(),
        manifest_path.display()
    );

    Ok(format!("{}\n", output))
}

fn resolve_stub_root(args: &ExtractArgs, ctx: &CommandContext) -> Result<PathBuf> {
    if let Some(dir) = &args.stubs {
        return Ok(dir.clone());
    }
    if !args.no_fetch {
        match sync_stub_repo(&ctx.config.stubs)? {
            SyncOutcome::UsedCache => tracing::warn!("Extracting from cached stubs"),
            outcome => tracing::debug!("Stub checkout: {:?}", outcome),
        }
    }
    Ok(ctx.config.stubs.stub_dir())
}
