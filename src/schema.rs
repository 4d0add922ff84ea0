//! Registry data structures shared by the extractor and the enricher
//!
//! These types are the JSON interchange contract consumed by the autocomplete
//! engine. Field names follow the wire format (`camelCase`), and unknown
//! fields on an entry are carried through untouched.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, StubscanError};

/// Module path → ordered entries. The empty path is the top-level namespace.
pub type Registry = IndexMap<String, Vec<Entry>>;

/// A registry held as untyped JSON, so values this crate does not rewrite
/// keep their exact input form (absent stays absent, `null` stays `null`)
pub type RegistryDocument = IndexMap<String, Vec<Value>>;

/// Parameter names treated as an implicit receiver
pub const RECEIVER_NAMES: &[&str] = &["self", "cls"];

// ============================================================================
// Parameters and signatures
// ============================================================================

/// One declared parameter inside a [`Signature`]
///
/// Absent fields are serialized as `null`; consumers rely on the keys existing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,

    /// Literal default rendered as text
    #[serde(rename = "defaultValue", default)]
    pub default_value: Option<String>,

    /// Textual rendering of the declared annotation
    #[serde(rename = "argType", default)]
    pub arg_type: Option<String>,
}

impl Parameter {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn is_receiver(&self) -> bool {
        RECEIVER_NAMES.contains(&self.name.as_str())
    }
}

/// A variadic collector (`*args` / `**kwargs`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarParameter {
    pub name: String,

    #[serde(rename = "argType", default)]
    pub arg_type: Option<String>,
}

/// Structured call shape of a callable
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    #[serde(default)]
    pub positional_only_args: Vec<Parameter>,
    #[serde(default)]
    pub positional_or_keyword_args: Vec<Parameter>,
    #[serde(default)]
    pub var_args: Option<VarParameter>,
    #[serde(default)]
    pub keyword_only_args: Vec<Parameter>,
    #[serde(default)]
    pub var_kwargs: Option<VarParameter>,
    #[serde(default)]
    pub first_param_is_self_or_cls: bool,
}

impl Signature {
    /// Full ordered positional list (`positionalOnlyArgs + positionalOrKeywordArgs`)
    pub fn positional(&self) -> impl Iterator<Item = &Parameter> {
        self.positional_only_args
            .iter()
            .chain(self.positional_or_keyword_args.iter())
    }

    /// Move a receiver that was classified as positional-or-keyword to the
    /// front of `positionalOnlyArgs`.
    ///
    /// Only applies when `firstParamIsSelfOrCls` is set; running it twice is a no-op.
    pub fn hoist_receiver(&mut self) {
        if !self.first_param_is_self_or_cls {
            return;
        }
        let leading_receiver = self
            .positional_or_keyword_args
            .first()
            .is_some_and(Parameter::is_receiver);
        if leading_receiver {
            let receiver = self.positional_or_keyword_args.remove(0);
            self.positional_only_args.insert(0, receiver);
        }
    }
}

/// Legacy flat parameter record used when no [`Signature`] can be derived
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamHint {
    pub name: String,

    #[serde(
        rename = "defaultValue",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub default_value: Option<String>,

    /// Receiver that should not be shown in the documented call
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hide: bool,
}

impl ParamHint {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

// ============================================================================
// Entries
// ============================================================================

/// Role a symbol plays in its namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Function,
    Type,
    Variable,
    Module,
}

/// Insertion-ordered set of [`EntryKind`], serialized as a JSON list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KindSet(Vec<EntryKind>);

impl KindSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of(kinds: &[EntryKind]) -> Self {
        let mut set = Self::new();
        for kind in kinds {
            set.insert(*kind);
        }
        set
    }

    /// Add a kind, keeping the first insertion position if already present
    pub fn insert(&mut self, kind: EntryKind) {
        if !self.0.contains(&kind) {
            self.0.push(kind);
        }
    }

    pub fn contains(&self, kind: EntryKind) -> bool {
        self.0.contains(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntryKind> {
        self.0.iter()
    }

    /// A type that is also callable: its callable face is the constructor
    pub fn is_constructor(&self) -> bool {
        self.contains(EntryKind::Type) && self.contains(EntryKind::Function)
    }
}

/// One declared symbol inside a module
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Simple name offered as the completion result
    #[serde(rename = "acResult")]
    pub ac_result: String,

    #[serde(rename = "type", default)]
    pub kinds: KindSet,

    #[serde(default)]
    pub documentation: String,

    #[serde(default = "default_version")]
    pub version: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<Signature>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<ParamHint>>,

    /// Declared type name of an annotated module-level variable
    #[serde(rename = "varType", default, skip_serializing_if = "Option::is_none")]
    pub var_type: Option<String>,

    /// Fields this crate does not model, passed through verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_version() -> i64 {
    1
}

impl Entry {
    pub fn new(name: impl Into<String>, version: i64) -> Self {
        Self {
            ac_result: name.into(),
            version,
            ..Default::default()
        }
    }

    /// Placeholder for a re-exported name whose source could not be resolved
    pub fn module_placeholder(name: impl Into<String>) -> Self {
        let mut entry = Self::new(name, 1);
        entry.kinds.insert(EntryKind::Module);
        entry
    }

    pub fn is_function(&self) -> bool {
        self.kinds.contains(EntryKind::Function)
    }

    /// Whether a signature or legacy parameter list is already attached
    pub fn has_call_shape(&self) -> bool {
        self.signature.is_some() || self.params.is_some()
    }
}

// ============================================================================
// JSON transport
// ============================================================================

/// Parse a registry document, reporting malformed input as fatal
pub fn registry_from_str(json: &str, context: &str) -> Result<Registry> {
    serde_json::from_str(json).map_err(|e| StubscanError::InvalidJson {
        context: context.to_string(),
        message: e.to_string(),
    })
}

/// Parse a registry document without normalizing its entries
pub fn document_from_str(json: &str, context: &str) -> Result<RegistryDocument> {
    serde_json::from_str(json).map_err(|e| StubscanError::InvalidJson {
        context: context.to_string(),
        message: e.to_string(),
    })
}

/// Typed view of a raw document. Every entry must be a valid [`Entry`].
pub fn registry_from_document(document: &RegistryDocument, context: &str) -> Result<Registry> {
    let mut registry = Registry::with_capacity(document.len());
    for (module, values) in document {
        let entries = values
            .iter()
            .enumerate()
            .map(|(i, value)| {
                Entry::deserialize(value).map_err(|e| StubscanError::InvalidJson {
                    context: format!("{} (`{}` entry {})", context, module, i),
                    message: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        registry.insert(module.clone(), entries);
    }
    Ok(registry)
}

/// Convert a value to JSON, reporting failure as an output error
pub fn to_json_value<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| StubscanError::InvalidJson {
        context: "output".to_string(),
        message: e.to_string(),
    })
}

/// Render any serializable document with 4-space indentation
pub fn to_json_pretty<T: Serialize>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| StubscanError::InvalidJson {
            context: "output".to_string(),
            message: e.to_string(),
        })?;
    String::from_utf8(buf).map_err(|e| StubscanError::InvalidJson {
        context: "output".to_string(),
        message: e.to_string(),
    })
}
