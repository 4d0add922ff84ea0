//! Version command handler - resolve a dotted path against the manifest.

use crate::cli::VersionArgs;
use crate::commands::CommandContext;
use crate::error::Result;
use crate::manifest::VersionManifest;

pub fn run_version(args: &VersionArgs, ctx: &CommandContext) -> Result<String> {
    let manifest_path = args
        .manifest
        .as_deref()
        .unwrap_or(&ctx.config.extract.manifest_path);
    let manifest = VersionManifest::load(manifest_path)?;
    Ok(format!("{}\n", manifest.version_of(&args.path)))
}
