//! Static signature extraction from a stub tree
//!
//! Extraction runs in two phases. First every stub module is discovered,
//! parsed and lowered into [`Declaration`]s. Then modules are built in
//! dependency order (see [`plan`]) so that re-exports always find the entries
//! they copy. The resulting registry lists modules in discovery order.

pub mod builder;
pub mod declaration;
pub mod discovery;
pub mod plan;
pub mod render;
pub mod signature;

use std::fs;
use std::path::Path;

use crate::error::{Result, StubscanError};
use crate::manifest::VersionManifest;
use crate::parsing::parse_stub;
use crate::schema::{Entry, EntryKind, Registry};

pub use builder::NamespaceBuilder;
pub use declaration::{lower_block, Declaration};
pub use discovery::{discover_stub_modules, StubFileKind, StubModule};

/// Entry carrying an aggregator module's own docstring
pub const MODULE_DOC_ENTRY: &str = "__doc__";

/// A stub module after parsing and lowering
#[derive(Debug, Clone)]
pub struct ParsedModule {
    pub module: StubModule,
    pub docstring: Option<String>,
    pub declarations: Vec<Declaration>,
}

/// Parse and lower one stub module
pub fn parse_module(module: StubModule) -> Result<ParsedModule> {
    let source = fs::read_to_string(&module.path).map_err(|e| StubscanError::IoError {
        path: module.path.clone(),
        message: e.to_string(),
    })?;
    let tree = parse_stub(&module.path, &source)?;
    let root = tree.root_node();

    let docstring = match render::docstring(&root, &source) {
        Some(Ok(doc)) => Some(doc),
        Some(Err(e)) => {
            tracing::warn!("{}: {}", module.path.display(), e);
            None
        }
        None => None,
    };
    let declarations = lower_block(&root, &source);

    Ok(ParsedModule {
        module,
        docstring,
        declarations,
    })
}

/// Extract the registry of every stub module below `root`.
///
/// The manifest's `versions` tree is consulted for entry versions, and its
/// `modules` summary is regenerated from scratch. A stub module that fails to
/// parse is skipped; an aggregator that fails to parse aborts the run.
pub fn extract_stub_tree(
    root: &Path,
    privileged_namespace: &str,
    manifest: &mut VersionManifest,
) -> Result<Registry> {
    let discovered = discover_stub_modules(root, privileged_namespace)?;
    tracing::info!("Discovered {} stub modules in {}", discovered.len(), root.display());

    let mut parsed = Vec::with_capacity(discovered.len());
    for module in discovered {
        let kind = module.kind;
        let path = module.path.clone();
        match parse_module(module) {
            Ok(p) => parsed.push(p),
            Err(e) if kind == StubFileKind::Aggregator => return Err(e),
            Err(e) => tracing::warn!("Skipping {}: {}", path.display(), e),
        }
    }

    let registry = build_registry(&parsed, manifest);

    manifest.clear_modules();
    for p in &parsed {
        let version = manifest.version_of(&p.module.name);
        manifest.record_module(&p.module.name, p.docstring.clone(), version);
    }

    Ok(registry)
}

/// Build parsed modules in dependency order into a registry keyed in
/// discovery order
pub fn build_registry(parsed: &[ParsedModule], manifest: &VersionManifest) -> Registry {
    let names: Vec<String> = parsed.iter().map(|p| p.module.name.clone()).collect();
    let dependencies: Vec<Vec<String>> = parsed
        .iter()
        .map(|p| plan::re_export_sources(&p.declarations, &p.module.package))
        .collect();

    let mut built = Registry::new();
    for index in plan::build_order(&names, &dependencies) {
        let p = &parsed[index];
        let content = NamespaceBuilder::new(
            p.module.name.clone(),
            p.module.package.clone(),
            manifest,
            &built,
        )
        .build(&p.declarations);

        let mut entries: Vec<Entry> = content.into_values().collect();
        if p.module.kind == StubFileKind::Aggregator {
            if let Some(doc) = &p.docstring {
                let mut entry = Entry::new(MODULE_DOC_ENTRY, manifest.version_of(&p.module.name));
                entry.kinds.insert(EntryKind::Module);
                entry.documentation = doc.clone();
                entries.push(entry);
            }
        }
        tracing::debug!("Built {} entries for `{}`", entries.len(), p.module.name);
        built.insert(p.module.name.clone(), entries);
    }

    let mut registry = Registry::with_capacity(built.len());
    for name in names {
        if let Some(entries) = built.shift_remove(&name) {
            registry.insert(name, entries);
        }
    }
    registry
}
