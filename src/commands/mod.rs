//! Command modules for the stubscan CLI
//!
//! Each command module implements a single top-level command:
//! - `extract` - Stub tree → registry, manifest module summary refresh
//! - `enrich` - Registry → registry with live docs and signatures
//! - `fetch` - Clone or refresh the stub repository
//! - `version` - Resolve a path's version tier
//!
//! All command handlers take their respective `Args` struct from `cli.rs`
//! and a shared `CommandContext`, and return the text destined for stdout.

pub mod enrich;
pub mod extract;
pub mod fetch;
pub mod version;

pub use enrich::run_enrich;
pub use extract::run_extract;
pub use fetch::run_fetch;
pub use version::run_version;

use crate::config::StubscanConfig;

/// Shared context passed to all command handlers
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    pub config: StubscanConfig,
}

impl CommandContext {
    pub fn new(config: StubscanConfig) -> Self {
        Self { config }
    }
}
