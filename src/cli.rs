//! CLI argument definitions using clap with subcommand architecture

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// API-surface extraction and enrichment for Python stub trees
#[derive(Parser, Debug)]
#[command(name = "stubscan")]
#[command(about = "Builds autocomplete registries from .pyi stubs and a live Python")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to ./stubscan.toml, then the user config dir)
    #[arg(long, value_name = "FILE", global = true, env = "STUBSCAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands for stubscan
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract a registry from a stub tree and refresh the manifest's module summary
    #[command(visible_alias = "x")]
    Extract(ExtractArgs),

    /// Backfill docs and signatures of a registry from a live interpreter
    #[command(visible_alias = "e")]
    Enrich(EnrichArgs),

    /// Clone or refresh the stub source tree only
    Fetch,

    /// Print the version tier the manifest assigns to a dotted path
    Version(VersionArgs),
}

/// Arguments for the extract command
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Stub root to read instead of the fetched stub repository
    #[arg(long, value_name = "DIR")]
    pub stubs: Option<PathBuf>,

    /// Version manifest to read and rewrite
    #[arg(long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Use the cached stub repository as-is
    #[arg(long)]
    pub no_fetch: bool,
}

/// Arguments for the enrich command
#[derive(Args, Debug)]
pub struct EnrichArgs {
    /// Read the registry from a file instead of stdin
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Python interpreter to introspect with
    #[arg(long, value_name = "EXE")]
    pub python: Option<String>,

    /// Write entries whose signature could not be resolved to this file
    #[arg(long, value_name = "FILE")]
    pub diagnostics: Option<PathBuf>,
}

/// Arguments for the version command
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Dotted path, e.g. `microbit.audio.play`
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Version manifest to read
    #[arg(long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,
}
