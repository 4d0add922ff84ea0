//! Live environment interface
//!
//! The enricher never talks to an interpreter directly; it asks a
//! [`LiveEnvironment`] for introspection results. The production
//! implementation is [`super::python::PythonProcess`]; tests script one.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::LiveError;

/// How a live parameter may be passed (mirrors `inspect.Parameter.kind`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LiveParamKind {
    PositionalOnly,
    PositionalOrKeyword,
    VarPositional,
    KeywordOnly,
    VarKeyword,
}

/// One parameter reported by structured signature introspection
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LiveParameter {
    pub name: String,
    pub kind: LiveParamKind,
    /// `repr` of the default, if any
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub annotation: Option<String>,
}

impl LiveParameter {
    pub fn new(name: &str, kind: LiveParamKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            default: None,
            annotation: None,
        }
    }
}

/// Legacy argument specification (`inspect.getfullargspec`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ArgSpec {
    pub args: Vec<String>,
    /// `str` of each default, aligned to the end of `args`
    #[serde(default)]
    pub defaults: Vec<String>,
    #[serde(default)]
    pub varargs: Option<String>,
    #[serde(default)]
    pub varkw: Option<String>,
    #[serde(default)]
    pub kwonlyargs: Vec<String>,
    /// `str` of each keyword-only default, by name
    #[serde(default)]
    pub kwonlydefaults: IndexMap<String, String>,
    /// Formatted annotation of each parameter, by name
    #[serde(default)]
    pub annotations: IndexMap<String, String>,
}

/// What a live symbol is, as far as receiver detection cares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Type,
    /// Declared `@staticmethod` on its owning type
    StaticMethod,
    Routine,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SymbolInfo {
    pub kind: SymbolKind,
    /// `__qualname__`, when the object has one
    #[serde(default)]
    pub qualname: Option<String>,
}

/// Introspection queries against a live interpreter.
///
/// `module` is the importable module name and `path` a dotted attribute path
/// inside it. Every query fails independently; a failure never poisons later
/// queries unless the environment itself went away.
pub trait LiveEnvironment {
    /// Make `module` available to the other queries
    fn import_module(&mut self, module: &str) -> Result<(), LiveError>;

    /// Cleaned docstring of a symbol (`inspect.getdoc`)
    fn documentation(&mut self, module: &str, path: &str) -> Result<String, LiveError>;

    /// Structured signature (`inspect.signature`)
    fn signature(&mut self, module: &str, path: &str) -> Result<Vec<LiveParameter>, LiveError>;

    /// Legacy argument spec (`inspect.getfullargspec`)
    fn argspec(&mut self, module: &str, path: &str) -> Result<ArgSpec, LiveError>;

    fn describe(&mut self, module: &str, path: &str) -> Result<SymbolInfo, LiveError>;

    /// Plain-text rendered help page (`pydoc.render_doc`)
    fn render_doc(&mut self, module: &str, path: &str) -> Result<String, LiveError>;
}
