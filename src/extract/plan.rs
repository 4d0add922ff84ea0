//! Build ordering for stub modules
//!
//! A module that re-exports from another stub module must be built after it,
//! since re-exported entries are copied by value. Modules are ordered
//! topologically on that dependency, with discovery order breaking ties so
//! the result matches plain traversal order whenever traversal order already
//! satisfies the dependencies.

use std::collections::HashMap;

use super::declaration::{Declaration, ReExportSource};

/// Where a re-export statement draws its names from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceNamespace {
    /// `from pkg.mod import x` or `from .mod import x`
    Named(String),
    /// `from . import x`: each name is itself a sub-module of `package`
    Bare { package: String },
}

/// Resolve a re-export source against the package of the importing file.
///
/// Returns `None` when a relative import climbs above the stub root.
pub fn resolve_source(source: &ReExportSource, package: &str) -> Option<SourceNamespace> {
    match source {
        ReExportSource::Absolute(module) => Some(SourceNamespace::Named(module.clone())),
        ReExportSource::Relative { level, module } => {
            let mut segments: Vec<&str> = if package.is_empty() {
                Vec::new()
            } else {
                package.split('.').collect()
            };
            let climb = level.saturating_sub(1);
            if climb > segments.len() {
                return None;
            }
            segments.truncate(segments.len() - climb);
            let base = segments.join(".");
            match module {
                Some(module) if base.is_empty() => Some(SourceNamespace::Named(module.clone())),
                Some(module) => Some(SourceNamespace::Named(format!("{}.{}", base, module))),
                None => Some(SourceNamespace::Bare { package: base }),
            }
        }
    }
}

/// Named source modules that `declarations` re-export from (top level only)
pub fn re_export_sources(declarations: &[Declaration], package: &str) -> Vec<String> {
    declarations
        .iter()
        .filter_map(|decl| match decl {
            Declaration::ReExport(re_export) => resolve_source(&re_export.source, package),
            _ => None,
        })
        .filter_map(|source| match source {
            SourceNamespace::Named(module) => Some(module),
            SourceNamespace::Bare { .. } => None,
        })
        .collect()
}

/// Order module indices so every module comes after the modules it depends on.
///
/// `dependencies[i]` lists the names module `i` re-exports from; names that
/// are not in `names` (external modules) are ignored. On a cycle the earliest
/// remaining module is taken and a warning is logged.
pub fn build_order(names: &[String], dependencies: &[Vec<String>]) -> Vec<usize> {
    let index_of: HashMap<&str, usize> = names
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();

    let mut waiting_on: Vec<Vec<usize>> = dependencies
        .iter()
        .enumerate()
        .map(|(i, deps)| {
            let mut resolved: Vec<usize> = deps
                .iter()
                .filter_map(|dep| index_of.get(dep.as_str()).copied())
                .filter(|&dep| dep != i)
                .collect();
            resolved.sort_unstable();
            resolved.dedup();
            resolved
        })
        .collect();

    let mut done = vec![false; names.len()];
    let mut order = Vec::with_capacity(names.len());

    while order.len() < names.len() {
        let ready = (0..names.len()).find(|&i| !done[i] && waiting_on[i].iter().all(|&d| done[d]));
        let next = match ready {
            Some(i) => i,
            None => {
                let Some(i) = (0..names.len()).find(|&i| !done[i]) else {
                    break;
                };
                tracing::warn!(
                    "Re-export cycle involving `{}`; building it before its sources",
                    names[i]
                );
                i
            }
        };
        done[next] = true;
        waiting_on[next].clear();
        order.push(next);
    }

    order
}
