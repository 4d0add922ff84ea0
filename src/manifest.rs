//! Version manifest: hierarchical version tiers and the per-module summary
//!
//! The `versions` tree is hand-maintained and only ever read here. The
//! `modules` map is regenerated on every extractor run.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, StubscanError};
use crate::fs_utils::write_atomic;
use crate::schema::to_json_pretty;

/// Version assumed for any path the tree does not mention
pub const DEFAULT_VERSION: i64 = 1;

/// A node of the `versions` tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VersionNode {
    /// Overrides the version of everything below this path
    Tier(i64),
    Branch(IndexMap<String, VersionNode>),
}

/// Summary of one module, written under `modules`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSummary {
    #[serde(rename = "type")]
    pub kind: String,
    pub documentation: Option<String>,
    pub version: i64,
}

impl ModuleSummary {
    pub fn new(documentation: Option<String>, version: i64) -> Self {
        Self {
            kind: "module".to_string(),
            documentation,
            version,
        }
    }
}

/// The version manifest document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VersionManifest {
    #[serde(default)]
    pub versions: IndexMap<String, VersionNode>,

    #[serde(default)]
    pub modules: IndexMap<String, ModuleSummary>,

    /// Any other top-level keys, kept as-is on rewrite
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VersionManifest {
    /// Load the manifest; a missing or malformed file is fatal
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| StubscanError::ManifestUnreadable {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_json(&content).map_err(|e| match e {
            StubscanError::InvalidJson { message, .. } => StubscanError::ManifestUnreadable {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| StubscanError::InvalidJson {
            context: "version manifest".to_string(),
            message: e.to_string(),
        })
    }

    /// Write the manifest back, replacing the file atomically
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = to_json_pretty(self)?;
        write_atomic(path, json.as_bytes()).map_err(|e| StubscanError::IoError {
            path: path.to_path_buf(),
            message: format!("Failed to write manifest: {}", e),
        })
    }

    /// Resolve the version tier of a dotted path.
    ///
    /// The walk follows one segment at a time; the first integer reached wins,
    /// and a missing segment (or a walk that ends on a branch) yields
    /// [`DEFAULT_VERSION`].
    pub fn version_of(&self, dotted_path: &str) -> i64 {
        let mut level = &self.versions;
        for segment in dotted_path.split('.') {
            match level.get(segment) {
                Some(VersionNode::Tier(version)) => return *version,
                Some(VersionNode::Branch(children)) => level = children,
                None => return DEFAULT_VERSION,
            }
        }
        DEFAULT_VERSION
    }

    /// Version of `name` declared inside `namespace` (empty for top level)
    pub fn version_in(&self, namespace: &str, name: &str) -> i64 {
        self.version_of(&qualify(namespace, name))
    }

    /// Drop every module summary ahead of a fresh extraction
    pub fn clear_modules(&mut self) {
        self.modules.clear();
    }

    /// Record a module summary; the top-level namespace is never recorded
    pub fn record_module(&mut self, module: &str, documentation: Option<String>, version: i64) {
        if module.is_empty() {
            return;
        }
        self.modules
            .insert(module.to_string(), ModuleSummary::new(documentation, version));
    }
}

/// Join a namespace and a name with `.`, treating the empty namespace as top level
pub fn qualify(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", namespace, name)
    }
}
