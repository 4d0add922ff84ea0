//! stubscan: API-surface extraction and enrichment for Python stub trees
//!
//! Two independent batch passes share one JSON registry format
//! ([`schema::Registry`]):
//!
//! - [`extract`] walks a tree of `.pyi` stubs and builds a registry of every
//!   declared callable, type and variable, including call signatures. Entry
//!   versions come from a hand-maintained [`manifest::VersionManifest`], whose
//!   per-module summary is regenerated on the way.
//! - [`enrich`] takes any registry and backfills documentation and call shapes
//!   from a live interpreter, trying progressively weaker introspection.
//!
//! # Example
//!
//! ```ignore
//! use stubscan::{extract_stub_tree, VersionManifest};
//! use std::path::Path;
//!
//! let mut manifest = VersionManifest::load(Path::new("microbit.json"))?;
//! let registry = extract_stub_tree(Path::new("typeshed/stdlib"), "microbit", &mut manifest)?;
//! println!("{}", stubscan::schema::to_json_pretty(&registry)?);
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod enrich;
pub mod error;
pub mod extract;
pub mod fs_utils;
pub mod git;
pub mod manifest;
pub mod parsing;
pub mod schema;

// Re-export commonly used types
pub use config::StubscanConfig;
pub use enrich::{enrich_document, enrich_registry, EnrichReport, LiveEnvironment, PythonProcess};
pub use error::{LiveError, RecoverableError, Result, StubscanError};
pub use extract::{extract_stub_tree, StubModule};
pub use manifest::VersionManifest;
pub use schema::{
    Entry, EntryKind, KindSet, ParamHint, Parameter, Registry, Signature, VarParameter,
};
