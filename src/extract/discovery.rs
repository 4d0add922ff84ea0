//! Stub tree discovery
//!
//! Lists every stub module under a root directory, in traversal order:
//! depth-first, the privileged namespace directory ahead of its siblings, and
//! each directory's aggregator (`__init__.pyi`) after everything else in that
//! directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, StubscanError};

/// File name of a directory's own namespace
pub const AGGREGATOR_FILE: &str = "__init__.pyi";

/// Stub file extension
pub const STUB_EXTENSION: &str = "pyi";

/// Stem of the file describing the implicit top-level namespace
pub const TOP_LEVEL_STEM: &str = "builtins";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubFileKind {
    /// `__init__.pyi` describing its directory's namespace
    Aggregator,
    /// `name.pyi` describing one module
    Module,
}

/// One stub file and the module path it contributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubModule {
    /// Dotted module path (empty for the top-level namespace)
    pub name: String,
    /// Package that relative imports in this file resolve against
    pub package: String,
    pub path: PathBuf,
    pub kind: StubFileKind,
}

/// Discover all stub modules below `root`.
///
/// The root itself must be readable; unreadable sub-directories are skipped
/// with a warning.
pub fn discover_stub_modules(root: &Path, privileged_namespace: &str) -> Result<Vec<StubModule>> {
    if !root.is_dir() {
        return Err(StubscanError::StubSourceUnavailable {
            message: format!("{} is not a directory", root.display()),
        });
    }
    let mut modules = Vec::new();
    walk_directory(root, "", privileged_namespace, &mut modules)?;
    Ok(modules)
}

fn walk_directory(
    dir: &Path,
    package: &str,
    privileged_namespace: &str,
    out: &mut Vec<StubModule>,
) -> Result<()> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .map_err(|e| StubscanError::IoError {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect();
    names.sort();

    // Stub sets re-export from the privileged namespace, so it goes first
    if let Some(pos) = names.iter().position(|n| n == privileged_namespace) {
        let privileged = names.remove(pos);
        names.insert(0, privileged);
    }

    let mut aggregator = None;
    for name in names {
        let path = dir.join(&name);
        if path.is_dir() {
            let child_package = qualify_package(package, &name);
            if let Err(e) = walk_directory(&path, &child_package, privileged_namespace, out) {
                tracing::warn!("Skipping {}: {}", path.display(), e);
            }
            continue;
        }

        if name == AGGREGATOR_FILE {
            if !package.is_empty() {
                aggregator = Some(StubModule {
                    name: package.to_string(),
                    package: package.to_string(),
                    path,
                    kind: StubFileKind::Aggregator,
                });
            }
            continue;
        }

        if let Some(stem) = module_stem(&name) {
            let module_name = if package.is_empty() && stem == TOP_LEVEL_STEM {
                String::new()
            } else {
                qualify_package(package, stem)
            };
            out.push(StubModule {
                name: module_name,
                package: package.to_string(),
                path,
                kind: StubFileKind::Module,
            });
        }
    }

    out.extend(aggregator);
    Ok(())
}

/// Stem of a public single-extension stub file (`radio.pyi` → `radio`)
fn module_stem(file_name: &str) -> Option<&str> {
    if file_name.starts_with('_') {
        return None;
    }
    let mut parts = file_name.split('.');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(stem), Some(STUB_EXTENSION), None) if !stem.is_empty() => Some(stem),
        _ => None,
    }
}

fn qualify_package(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", package, name)
    }
}
