//! Registry construction for one namespace
//!
//! A [`NamespaceBuilder`] owns the entries of the namespace being built and
//! borrows everything it only reads: the version manifest and the registry of
//! modules built so far. Type bodies are built by a child builder with its own
//! isolated content; only the constructor signature flows back out.

use indexmap::IndexMap;

use super::declaration::{
    AnnotatedNameDecl, CallableDecl, Declaration, Rendered, ReExportDecl, TypeDecl,
};
use super::plan::{resolve_source, SourceNamespace};
use super::signature::derive_signature;
use crate::manifest::{qualify, VersionManifest};
use crate::schema::{Entry, EntryKind, Registry, Signature};

/// Name of the method whose signature is a type's constructor signature
pub const CONSTRUCTOR_NAME: &str = "__init__";

pub struct NamespaceBuilder<'a> {
    /// Dotted path of the namespace (`microbit.Image` inside a type body)
    namespace: String,
    /// Package relative re-exports resolve against
    package: String,
    manifest: &'a VersionManifest,
    built: &'a Registry,
    content: IndexMap<String, Entry>,
}

impl<'a> NamespaceBuilder<'a> {
    pub fn new(
        namespace: impl Into<String>,
        package: impl Into<String>,
        manifest: &'a VersionManifest,
        built: &'a Registry,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            package: package.into(),
            manifest,
            built,
            content: IndexMap::new(),
        }
    }

    /// Declare everything in `declarations`, in order, and hand back the entries
    pub fn build(mut self, declarations: &[Declaration]) -> IndexMap<String, Entry> {
        for declaration in declarations {
            self.declare(declaration);
        }
        self.content
    }

    fn declare(&mut self, declaration: &Declaration) {
        match declaration {
            Declaration::Callable(callable) => self.declare_callable(callable),
            Declaration::Type(ty) => self.declare_type(ty),
            Declaration::AnnotatedName(name) => self.declare_annotated_name(name),
            Declaration::ReExport(re_export) => self.declare_re_export(re_export),
        }
    }

    fn declare_callable(&mut self, callable: &CallableDecl) {
        let qualified = qualify(&self.namespace, &callable.name);
        for rejected in &callable.rejected {
            tracing::warn!("{}: {}", qualified, rejected);
        }

        // Overloads: the first declaration wins
        if !self.content.contains_key(&callable.name) {
            let mut entry = self.fresh_entry(&callable.name, &callable.docstring);
            entry.signature = Some(derive_signature(&qualified, &callable.params));
            self.content.insert(callable.name.clone(), entry);
        }
        self.tag(&callable.name, EntryKind::Function);
    }

    fn declare_type(&mut self, ty: &TypeDecl) {
        if !self.content.contains_key(&ty.name) {
            let entry = self.fresh_entry(&ty.name, &ty.docstring);
            self.content.insert(ty.name.clone(), entry);
        }
        self.tag(&ty.name, EntryKind::Type);
        self.tag(&ty.name, EntryKind::Function);

        let body = NamespaceBuilder::new(
            qualify(&self.namespace, &ty.name),
            self.package.clone(),
            self.manifest,
            self.built,
        )
        .build(&ty.body);

        let constructor = body
            .get(CONSTRUCTOR_NAME)
            .and_then(|init| init.signature.clone())
            .or_else(|| self.inherited_constructor(ty));

        if let Some(mut signature) = constructor {
            signature.hoist_receiver();
            if let Some(entry) = self.content.get_mut(&ty.name) {
                entry.signature = Some(signature);
            }
        } else {
            tracing::debug!(
                "No constructor signature for {}",
                qualify(&self.namespace, &ty.name)
            );
        }
    }

    /// First base type, in declaration order, already holding a signature in
    /// this namespace
    fn inherited_constructor(&self, ty: &TypeDecl) -> Option<Signature> {
        ty.bases
            .iter()
            .filter_map(|base| self.content.get(base))
            .find_map(|entry| entry.signature.clone())
    }

    fn declare_annotated_name(&mut self, name: &AnnotatedNameDecl) {
        if !self.content.contains_key(&name.name) {
            let mut entry = Entry::new(
                name.name.clone(),
                self.manifest.version_in(&self.namespace, &name.name),
            );
            entry.var_type = name.simple_type.clone();
            self.content.insert(name.name.clone(), entry);
        }
        self.tag(&name.name, EntryKind::Variable);
    }

    fn declare_re_export(&mut self, re_export: &ReExportDecl) {
        match resolve_source(&re_export.source, &self.package) {
            Some(SourceNamespace::Named(module)) => match self.built.get(&module) {
                Some(entries) => self.copy_entries(&module, entries, re_export),
                None => tracing::debug!(
                    "Skipping re-export from {} in {}: not a stub module",
                    module,
                    self.display_namespace()
                ),
            },
            Some(SourceNamespace::Bare { package }) => {
                for imported in &re_export.names {
                    let alias = imported.bound_name();
                    if !self.content.contains_key(alias) {
                        let entry = Entry::new(alias, self.manifest.version_in(&package, alias));
                        self.content.insert(alias.to_string(), entry);
                    }
                    self.tag(alias, EntryKind::Module);
                }
            }
            None => tracing::warn!(
                "Relative re-export in {} climbs above the stub root",
                self.display_namespace()
            ),
        }
    }

    fn copy_entries(&mut self, module: &str, entries: &[Entry], re_export: &ReExportDecl) {
        for imported in &re_export.names {
            let alias = imported.bound_name();
            if self.content.contains_key(alias) {
                continue;
            }
            let entry = match entries.iter().find(|e| e.ac_result == imported.name) {
                Some(source) => {
                    let mut copy = source.clone();
                    copy.ac_result = alias.to_string();
                    copy
                }
                None => {
                    tracing::debug!("{} not found in {}", imported.name, module);
                    Entry::module_placeholder(alias)
                }
            };
            self.content.insert(alias.to_string(), entry);
        }

        if re_export.wildcard {
            for source in entries.iter().filter(|e| is_public(&e.ac_result)) {
                if !self.content.contains_key(&source.ac_result) {
                    self.content.insert(source.ac_result.clone(), source.clone());
                }
            }
        }
    }

    fn fresh_entry(&self, name: &str, docstring: &Rendered) -> Entry {
        let qualified = qualify(&self.namespace, name);
        let mut entry = Entry::new(name, self.manifest.version_of(&qualified));
        entry.documentation = match docstring {
            Some(Ok(doc)) => doc.clone(),
            Some(Err(e)) => {
                tracing::warn!("{}: {}", qualified, e);
                String::new()
            }
            None => String::new(),
        };
        entry
    }

    fn tag(&mut self, name: &str, kind: EntryKind) {
        if let Some(entry) = self.content.get_mut(name) {
            entry.kinds.insert(kind);
        }
    }

    fn display_namespace(&self) -> &str {
        if self.namespace.is_empty() {
            "<top level>"
        } else {
            &self.namespace
        }
    }
}

/// Names a wildcard import brings in
fn is_public(name: &str) -> bool {
    !name.starts_with('_')
}
